//! Event entity (database row mapping).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use domain::models::{Event, EventKind};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for event_kind that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "event_kind", rename_all = "lowercase")]
pub enum EventKindDb {
    Match,
    Training,
    Social,
}

impl From<EventKindDb> for EventKind {
    fn from(db_kind: EventKindDb) -> Self {
        match db_kind {
            EventKindDb::Match => EventKind::Match,
            EventKindDb::Training => EventKind::Training,
            EventKindDb::Social => EventKind::Social,
        }
    }
}

impl From<EventKind> for EventKindDb {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Match => EventKindDb::Match,
            EventKind::Training => EventKindDb::Training,
            EventKind::Social => EventKindDb::Social,
        }
    }
}

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
    pub team_id: Uuid,
    pub kind: EventKindDb,
    pub title: String,
    pub opponent: Option<String>,
    pub location: Option<String>,
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub meet_time: NaiveTime,
    pub answer_by: NaiveDate,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventEntity> for Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            team_id: entity.team_id,
            kind: entity.kind.into(),
            title: entity.title,
            opponent: entity.opponent,
            location: entity.location,
            event_date: entity.event_date,
            start_time: entity.start_time,
            meet_time: entity.meet_time,
            answer_by: entity.answer_by,
            notes: entity.notes,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
