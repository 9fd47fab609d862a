//! Event squad entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::SquadEntry;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the event_squads table.
#[derive(Debug, Clone, FromRow)]
pub struct EventSquadEntity {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub selected_by: Uuid,
    pub selected_at: DateTime<Utc>,
    pub position: Option<String>,
    pub squad_role: Option<String>,
    pub selection_notes: Option<String>,
}

impl From<EventSquadEntity> for SquadEntry {
    fn from(entity: EventSquadEntity) -> Self {
        Self {
            event_id: entity.event_id,
            user_id: entity.user_id,
            selected_by: entity.selected_by,
            selected_at: entity.selected_at,
            position: entity.position,
            squad_role: entity.squad_role,
            selection_notes: entity.selection_notes,
        }
    }
}
