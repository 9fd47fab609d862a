//! Notification service for event push notifications.
//!
//! Event edits produce two kinds of notification: a fresh invitation for
//! newly chosen users and an "event updated" message for users who were
//! already invited. Delivery is best-effort and never fails the edit.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::models::{Event, RosterDelta};

/// Notification type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    EventInvitation,
    EventUpdated,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::EventInvitation => write!(f, "event_invitation"),
            NotificationType::EventUpdated => write!(f, "event_updated"),
        }
    }
}

/// Payload delivered to one user about one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventNotificationPayload {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub event_name: String,
    pub event_title: String,
    /// `YYYY-MM-DD`
    pub event_date: String,
    /// `HH:MM`
    pub event_time: String,
}

impl EventNotificationPayload {
    pub fn for_event(notification_type: NotificationType, event: &Event, user_id: Uuid) -> Self {
        Self {
            notification_type,
            user_id,
            event_id: event.id,
            event_name: event.kind.label().to_string(),
            event_title: event.title.clone(),
            event_date: event.event_date.format("%Y-%m-%d").to_string(),
            event_time: event.start_time.format("%H:%M").to_string(),
        }
    }
}

/// Result of a notification send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationResult {
    /// Notification was handed to the gateway.
    Sent,
    /// Sending failed (non-blocking).
    Failed(String),
    /// Notifications are disabled.
    Skipped,
}

/// Tally of a dispatch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Notification service trait for sending push notifications.
#[async_trait::async_trait]
pub trait NotificationService: Send + Sync {
    /// Tell a user they have been invited to an event.
    async fn send_event_invitation(&self, payload: EventNotificationPayload) -> NotificationResult;

    /// Tell an existing invitee that the event details changed.
    async fn send_event_updated(&self, payload: EventNotificationPayload) -> NotificationResult;
}

/// Invitation notifications for every user in `user_ids`.
pub fn plan_invitation_notifications(
    event: &Event,
    user_ids: &[Uuid],
) -> Vec<EventNotificationPayload> {
    user_ids
        .iter()
        .map(|id| EventNotificationPayload::for_event(NotificationType::EventInvitation, event, *id))
        .collect()
}

/// Notifications for an applied roster edit.
///
/// Removed and unlisted users get nothing.
pub fn plan_roster_notifications(event: &Event, delta: &RosterDelta) -> Vec<EventNotificationPayload> {
    let mut payloads = plan_invitation_notifications(event, &delta.add);
    payloads.extend(delta.notify_updated.iter().map(|id| {
        EventNotificationPayload::for_event(NotificationType::EventUpdated, event, *id)
    }));
    payloads
}

/// Sends every payload in order, logging failures instead of returning them.
pub async fn dispatch(
    service: &dyn NotificationService,
    payloads: Vec<EventNotificationPayload>,
) -> DispatchSummary {
    let mut summary = DispatchSummary::default();

    for payload in payloads {
        let user_id = payload.user_id;
        let event_id = payload.event_id;
        let notification_type = payload.notification_type;

        let result = match notification_type {
            NotificationType::EventInvitation => service.send_event_invitation(payload).await,
            NotificationType::EventUpdated => service.send_event_updated(payload).await,
        };

        match result {
            NotificationResult::Sent => summary.sent += 1,
            NotificationResult::Skipped => summary.skipped += 1,
            NotificationResult::Failed(reason) => {
                tracing::warn!(
                    user_id = %user_id,
                    event_id = %event_id,
                    notification_type = %notification_type,
                    error = %reason,
                    "Failed to send event notification"
                );
                summary.failed += 1;
            }
        }
    }

    summary
}

/// Mock notification service for development and testing.
///
/// Logs notifications and keeps a copy of every payload it accepted.
#[derive(Debug, Clone, Default)]
pub struct MockNotificationService {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
    sent: Arc<Mutex<Vec<EventNotificationPayload>>>,
}

impl MockNotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock service that simulates failures.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Payloads accepted so far.
    pub fn sent(&self) -> Vec<EventNotificationPayload> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    fn record(&self, payload: EventNotificationPayload) -> NotificationResult {
        if self.simulate_failure {
            tracing::warn!(
                user_id = %payload.user_id,
                event_id = %payload.event_id,
                "Mock notification service simulating failure"
            );
            return NotificationResult::Failed("Simulated failure".to_string());
        }

        tracing::info!(
            user_id = %payload.user_id,
            event_id = %payload.event_id,
            notification_type = %payload.notification_type,
            event_title = %payload.event_title,
            "Mock: Would send event notification"
        );

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(payload);
        }
        NotificationResult::Sent
    }
}

#[async_trait::async_trait]
impl NotificationService for MockNotificationService {
    async fn send_event_invitation(&self, payload: EventNotificationPayload) -> NotificationResult {
        self.record(payload)
    }

    async fn send_event_updated(&self, payload: EventNotificationPayload) -> NotificationResult {
        self.record(payload)
    }
}
