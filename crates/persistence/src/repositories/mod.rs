//! Repository implementations for database operations.

pub mod event;
pub mod invitation;
pub mod squad;

pub use event::EventRepository;
pub use invitation::InvitationRepository;
pub use squad::{SquadRepository, SquadUpsertCounts};
