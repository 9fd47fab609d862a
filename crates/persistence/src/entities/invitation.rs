//! Event invitation entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Invitation, InvitationStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for invitation_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "invitation_status", rename_all = "lowercase")]
pub enum InvitationStatusDb {
    Pending,
    Sent,
    Accepted,
    Declined,
    Maybe,
}

impl From<InvitationStatusDb> for InvitationStatus {
    fn from(db_status: InvitationStatusDb) -> Self {
        match db_status {
            InvitationStatusDb::Pending => InvitationStatus::Pending,
            InvitationStatusDb::Sent => InvitationStatus::Sent,
            InvitationStatusDb::Accepted => InvitationStatus::Accepted,
            InvitationStatusDb::Declined => InvitationStatus::Declined,
            InvitationStatusDb::Maybe => InvitationStatus::Maybe,
        }
    }
}

impl From<InvitationStatus> for InvitationStatusDb {
    fn from(status: InvitationStatus) -> Self {
        match status {
            InvitationStatus::Pending => InvitationStatusDb::Pending,
            InvitationStatus::Sent => InvitationStatusDb::Sent,
            InvitationStatus::Accepted => InvitationStatusDb::Accepted,
            InvitationStatus::Declined => InvitationStatusDb::Declined,
            InvitationStatus::Maybe => InvitationStatusDb::Maybe,
        }
    }
}

/// Database row mapping for the event_invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct EventInvitationEntity {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub invited_by: Uuid,
    pub invited_at: DateTime<Utc>,
    pub status: InvitationStatusDb,
}

impl From<EventInvitationEntity> for Invitation {
    fn from(entity: EventInvitationEntity) -> Self {
        Self {
            event_id: entity.event_id,
            user_id: entity.user_id,
            invited_by: entity.invited_by,
            invited_at: entity.invited_at,
            status: entity.status.into(),
        }
    }
}
