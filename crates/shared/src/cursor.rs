//! Cursor-based pagination utilities.
//!
//! A cursor is an opaque, URL-safe base64 encoding of a small JSON
//! object holding the index key of the last row a listing returned.
//! Decoding failures are typed so callers can reject a bad cursor as
//! client error rather than a generic failure.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Error type for cursor operations.
#[derive(Debug, Error)]
pub enum CursorError {
    #[error("Invalid cursor encoding")]
    InvalidEncoding,
    #[error("Invalid cursor format")]
    InvalidFormat,
}

/// Cursor into the club name index: `(normalized name, club id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCursor {
    /// Normalized club name of the last returned row.
    pub name: String,
    /// Club id of the last returned row (tie-breaker).
    pub id: String,
}

/// Cursor into the club-member index: `(role#user sort key, club id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberCursor {
    /// Sort key (`<role>#<user-id>`) of the last returned row.
    pub member: String,
    /// Club id the listing is scoped to.
    pub id: String,
}

/// Encodes a cursor value as URL-safe base64 JSON.
pub fn encode_cursor<T: Serialize>(cursor: &T) -> String {
    // Serializing a plain struct of strings cannot fail.
    let raw = serde_json::to_vec(cursor).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(raw)
}

/// Decodes a cursor previously produced by [`encode_cursor`].
pub fn decode_cursor<T: DeserializeOwned>(cursor: &str) -> Result<T, CursorError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(cursor)
        .map_err(|_| CursorError::InvalidEncoding)?;

    serde_json::from_slice(&decoded).map_err(|_| CursorError::InvalidFormat)
}
