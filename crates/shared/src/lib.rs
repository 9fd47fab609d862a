//! Shared utilities and common types for the Team Manager backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT access-token verification
//! - Event form validation rules

pub mod jwt;
pub mod validation;
