//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod event;
pub mod invitation;
pub mod squad;

pub use event::{EventEntity, EventKindDb};
pub use invitation::{EventInvitationEntity, InvitationStatusDb};
pub use squad::EventSquadEntity;
