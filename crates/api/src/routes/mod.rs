//! Request handlers.
//!
//! Handlers are thin: validate the payload, check the capability,
//! call a repository, shape the response.

pub mod clubs;
pub mod health;
pub mod members;
pub mod memberships;
