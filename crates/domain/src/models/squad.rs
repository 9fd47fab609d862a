//! Squad selection domain models.
//!
//! A squad entry records that an admin picked a user to play in an event.
//! It is tracked independently of the user's RSVP.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Maximum number of user ids accepted per list in one squad update.
pub const MAX_SQUAD_BATCH: u64 = 200;

/// One user's confirmed selection for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SquadEntry {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub selected_by: Uuid,
    pub selected_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squad_role: Option<String>,
    /// Pre-match message attached when the user was selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_notes: Option<String>,
}

/// Where a user stands in an event's squad selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SquadSelection {
    /// No one has been selected for the event yet.
    NoDecision,
    /// A squad exists and this user is not in it.
    NotSelected,
    /// This user is in the squad.
    Selected,
}

impl SquadSelection {
    pub fn for_user(entries: &[SquadEntry], user_id: Uuid) -> Self {
        if entries.is_empty() {
            SquadSelection::NoDecision
        } else if entries.iter().any(|e| e.user_id == user_id) {
            SquadSelection::Selected
        } else {
            SquadSelection::NotSelected
        }
    }

    /// Numeric form (0/1/2) still used by older clients.
    pub fn as_code(&self) -> u8 {
        match self {
            SquadSelection::NoDecision => 0,
            SquadSelection::NotSelected => 1,
            SquadSelection::Selected => 2,
        }
    }

    /// Label shown on the event card instead of RSVP buttons.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            SquadSelection::NoDecision => None,
            SquadSelection::NotSelected => Some("Not this time"),
            SquadSelection::Selected => Some("You're in"),
        }
    }
}

/// Outcome of a squad upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SquadChange {
    pub added_count: u64,
    pub removed_count: u64,
    pub total_count: i64,
    pub did_change: bool,
}

impl SquadChange {
    pub fn new(added_count: u64, removed_count: u64, total_count: i64) -> Self {
        Self {
            added_count,
            removed_count,
            total_count,
            did_change: added_count > 0 || removed_count > 0,
        }
    }
}

/// Request to add and remove users from an event's squad.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpsertSquadRequest {
    #[serde(default)]
    #[validate(length(max = 200, message = "Cannot add more than 200 users at once"))]
    pub add_user_ids: Vec<Uuid>,

    #[serde(default)]
    #[validate(length(max = 200, message = "Cannot remove more than 200 users at once"))]
    pub remove_user_ids: Vec<Uuid>,

    /// Attached to newly selected users only.
    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

/// Request to set a selected user's position or role.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateSquadEntryRequest {
    #[validate(custom(function = "shared::validation::validate_position"))]
    pub position: Option<String>,

    #[validate(length(min = 1, max = 40, message = "Squad role must be 1-40 characters"))]
    pub squad_role: Option<String>,
}

/// Response for listing an event's squad.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListSquadResponse {
    pub data: Vec<SquadEntry>,
    pub total: usize,
}

impl ListSquadResponse {
    pub fn new(data: Vec<SquadEntry>) -> Self {
        let total = data.len();
        Self { data, total }
    }
}
