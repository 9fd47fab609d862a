//! Invitation domain models: the per-event RSVP ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Status of one user's invitation to one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Sent,
    Accepted,
    Declined,
    Maybe,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Sent => "sent",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Declined => "declined",
            InvitationStatus::Maybe => "maybe",
        }
    }

    /// Maps an RSVP response onto the status persisted in the ledger.
    ///
    /// This is the only place the write path translates RSVP answers;
    /// an absent or unrecognised answer always yields `Pending`.
    pub fn from_rsvp(response: Option<RsvpResponse>) -> Self {
        match response {
            Some(RsvpResponse::Yes) => InvitationStatus::Accepted,
            Some(RsvpResponse::Maybe) => InvitationStatus::Maybe,
            Some(RsvpResponse::No) => InvitationStatus::Declined,
            Some(RsvpResponse::None) | None => InvitationStatus::Pending,
        }
    }

    /// Maps a persisted status back to the RSVP vocabulary shown to users.
    pub fn rsvp(&self) -> RsvpResponse {
        match self {
            InvitationStatus::Accepted => RsvpResponse::Yes,
            InvitationStatus::Maybe => RsvpResponse::Maybe,
            InvitationStatus::Declined => RsvpResponse::No,
            InvitationStatus::Pending | InvitationStatus::Sent => RsvpResponse::None,
        }
    }

    /// Returns true once the invitee has answered.
    pub fn has_responded(&self) -> bool {
        !matches!(self, InvitationStatus::Pending | InvitationStatus::Sent)
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InvitationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(InvitationStatus::Pending),
            "sent" => Ok(InvitationStatus::Sent),
            "accepted" => Ok(InvitationStatus::Accepted),
            "declined" => Ok(InvitationStatus::Declined),
            "maybe" => Ok(InvitationStatus::Maybe),
            _ => Err(format!("Invalid invitation status: {}", s)),
        }
    }
}

/// The user-facing RSVP vocabulary.
///
/// Deserialisation is lenient: any value other than `yes`, `no` or `maybe`
/// becomes `None`, which maps to a pending invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum RsvpResponse {
    Yes,
    No,
    Maybe,
    None,
}

impl RsvpResponse {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpResponse::Yes => "yes",
            RsvpResponse::No => "no",
            RsvpResponse::Maybe => "maybe",
            RsvpResponse::None => "none",
        }
    }

    /// Parses an RSVP label, falling back to `None` for anything unknown.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "yes" => RsvpResponse::Yes,
            "no" => RsvpResponse::No,
            "maybe" => RsvpResponse::Maybe,
            _ => RsvpResponse::None,
        }
    }
}

impl From<String> for RsvpResponse {
    fn from(label: String) -> Self {
        RsvpResponse::from_label(&label)
    }
}

impl fmt::Display for RsvpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One user's invitation to one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Invitation {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub invited_by: Uuid,
    pub invited_at: DateTime<Utc>,
    pub status: InvitationStatus,
}

impl Invitation {
    pub fn rsvp(&self) -> RsvpResponse {
        self.status.rsvp()
    }
}

/// Per-bucket RSVP tally, derived from the ledger on every read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RsvpCounts {
    pub yes: usize,
    pub no: usize,
    pub maybe: usize,
    pub none: usize,
    pub total: usize,
}

impl RsvpCounts {
    pub fn tally<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = InvitationStatus>,
    {
        statuses
            .into_iter()
            .fold(RsvpCounts::default(), |mut counts, status| {
                match status.rsvp() {
                    RsvpResponse::Yes => counts.yes += 1,
                    RsvpResponse::No => counts.no += 1,
                    RsvpResponse::Maybe => counts.maybe += 1,
                    RsvpResponse::None => counts.none += 1,
                }
                counts.total += 1;
                counts
            })
    }

    pub fn from_invitations(invitations: &[Invitation]) -> Self {
        Self::tally(invitations.iter().map(|i| i.status))
    }
}

/// Request body for an invitee answering an invitation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RespondRequest {
    #[serde(default)]
    pub response: Option<RsvpResponse>,
}

impl RespondRequest {
    pub fn status(&self) -> InvitationStatus {
        InvitationStatus::from_rsvp(self.response)
    }
}

/// Request body for an admin setting an invitation status directly.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SetInvitationStatusRequest {
    pub status: InvitationStatus,
}

/// Response after an invitation status change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationStatusResponse {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: InvitationStatus,
    pub rsvp: RsvpResponse,
    pub invited_at: DateTime<Utc>,
}

impl From<Invitation> for InvitationStatusResponse {
    fn from(invitation: Invitation) -> Self {
        Self {
            event_id: invitation.event_id,
            user_id: invitation.user_id,
            status: invitation.status,
            rsvp: invitation.status.rsvp(),
            invited_at: invitation.invited_at,
        }
    }
}

/// Response for listing an event's invitations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListInvitationsResponse {
    pub data: Vec<Invitation>,
    pub counts: RsvpCounts,
}

impl ListInvitationsResponse {
    pub fn new(data: Vec<Invitation>) -> Self {
        let counts = RsvpCounts::from_invitations(&data);
        Self { data, counts }
    }
}
