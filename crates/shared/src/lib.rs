//! Shared utilities and common types for the Clubhouse backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Pagination cursor encoding/decoding
//! - JWT claim validation
//! - Common validation logic

pub mod cursor;
pub mod jwt;
pub mod validation;
