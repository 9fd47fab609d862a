//! Per-user view of an event card.

use serde::Serialize;
use uuid::Uuid;

use super::invitation::{Invitation, InvitationStatus, RsvpResponse};
use super::squad::{SquadEntry, SquadSelection};

/// What one user sees on one event card.
///
/// Once the squad has been picked the RSVP buttons are replaced by the
/// selection label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventCardState {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: Option<InvitationStatus>,
    pub rsvp: RsvpResponse,
    pub selection: SquadSelection,
    pub selection_code: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_label: Option<&'static str>,
    pub shows_rsvp_controls: bool,
}

impl EventCardState {
    pub fn build(
        event_id: Uuid,
        user_id: Uuid,
        invitation: Option<&Invitation>,
        squad: &[SquadEntry],
    ) -> Self {
        let status = invitation.map(|i| i.status);
        let selection = SquadSelection::for_user(squad, user_id);

        Self {
            event_id,
            user_id,
            status,
            rsvp: status.map(|s| s.rsvp()).unwrap_or(RsvpResponse::None),
            selection,
            selection_code: selection.as_code(),
            selection_label: selection.label(),
            shows_rsvp_controls: status.is_some() && selection == SquadSelection::NoDecision,
        }
    }
}
