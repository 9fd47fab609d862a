//! Domain services for Team Manager.
//!
//! Services contain business logic that operates on domain models.

pub mod notification;

pub use notification::{
    dispatch, plan_invitation_notifications, plan_roster_notifications, DispatchSummary,
    EventNotificationPayload, MockNotificationService, NotificationResult, NotificationService,
    NotificationType,
};
