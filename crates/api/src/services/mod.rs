//! Application services.

pub mod auth;

pub use auth::{AccessDecision, AuthorizationService};
