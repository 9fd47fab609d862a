//! Domain layer for the Team Manager backend.
//!
//! This crate contains:
//! - Domain models (Event, Invitation, SquadEntry)
//! - The roster delta calculator used when an event is edited
//! - Notification planning and the notification service seam

pub mod models;
pub mod services;
