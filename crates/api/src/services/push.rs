//! Push gateway notification service.
//!
//! Posts event notification payloads to an HTTP push gateway, which owns
//! device tokens and platform delivery.

use std::time::Duration;

use domain::services::{EventNotificationPayload, NotificationResult, NotificationService};
use reqwest::{Client, StatusCode};

use crate::config::NotificationsConfig;

/// Error type for push gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Gateway rejected notification ({status}): {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("Gateway unavailable ({status}): {body}")]
    Unavailable { status: StatusCode, body: String },

    #[error("Push notifications are not enabled")]
    NotEnabled,
}

/// Notification service backed by the push gateway.
pub struct PushGatewayService {
    client: Client,
    config: NotificationsConfig,
}

impl PushGatewayService {
    pub fn new(config: NotificationsConfig) -> Result<Self, PushError> {
        if !config.enabled {
            return Err(PushError::NotEnabled);
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/notifications", self.config.gateway_url.trim_end_matches('/'))
    }

    /// Delay before retry `attempt` (1-based): 100ms, 200ms, 400ms, ...
    fn backoff(attempt: u32) -> Duration {
        Duration::from_millis(100u64 << (attempt.saturating_sub(1)).min(6))
    }

    /// Posts one payload, retrying transport errors and 5xx responses.
    async fn post(&self, payload: &EventNotificationPayload) -> Result<(), PushError> {
        let url = self.endpoint();
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tokio::time::sleep(Self::backoff(attempt)).await;
            }

            let mut request = self.client.post(&url).json(payload);
            if !self.config.api_key.is_empty() {
                request = request.bearer_auth(&self.config.api_key);
            }

            match request.send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::debug!(
                        user_id = %payload.user_id,
                        attempt = attempt,
                        "Push gateway accepted notification"
                    );
                    return Ok(());
                }
                Ok(resp) => {
                    let status = resp.status();
                    let body = resp.text().await.unwrap_or_default();
                    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(PushError::Unavailable { status, body });
                        continue;
                    }
                    return Err(PushError::Rejected { status, body });
                }
                Err(e) => {
                    last_error = Some(PushError::HttpError(e));
                }
            }
        }

        Err(last_error.unwrap_or(PushError::NotEnabled))
    }

    async fn deliver(&self, payload: EventNotificationPayload) -> NotificationResult {
        match self.post(&payload).await {
            Ok(()) => {
                tracing::info!(
                    user_id = %payload.user_id,
                    event_id = %payload.event_id,
                    notification_type = %payload.notification_type,
                    "Event notification sent"
                );
                NotificationResult::Sent
            }
            Err(e) => NotificationResult::Failed(e.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl NotificationService for PushGatewayService {
    async fn send_event_invitation(&self, payload: EventNotificationPayload) -> NotificationResult {
        self.deliver(payload).await
    }

    async fn send_event_updated(&self, payload: EventNotificationPayload) -> NotificationResult {
        self.deliver(payload).await
    }
}
