//! Persistence layer for Team Manager backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations for events, invitations and squads

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
