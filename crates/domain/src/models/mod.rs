//! Domain models for Team Manager.

pub mod card;
pub mod event;
pub mod invitation;
pub mod roster;
pub mod squad;

pub use card::EventCardState;
pub use event::{Event, EventFields, EventKind, EventRequest};
pub use invitation::{Invitation, InvitationStatus, RsvpCounts, RsvpResponse};
pub use roster::{compute_roster_delta, compute_roster_edit, RosterDelta, RosterSelection};
pub use squad::{SquadChange, SquadEntry, SquadSelection};
