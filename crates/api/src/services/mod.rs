//! External service integrations.

pub mod push;

pub use push::{PushError, PushGatewayService};
