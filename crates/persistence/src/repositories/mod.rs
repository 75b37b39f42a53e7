//! Repository implementations.
//!
//! Repositories own the mapping between domain models and store
//! records, including every derived index record. Store-level
//! conflicts are translated into domain errors here; availability
//! failures propagate as internal errors.

pub mod club;
pub mod membership;
pub mod user_directory;

pub use club::ClubRepository;
pub use membership::MembershipRepository;
pub use user_directory::StoreUserDirectory;

use domain::{DomainError, DomainResult};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value as JsonValue;

use crate::store::StoreError;

/// Default page size for cursor-paginated listings.
pub(crate) const DEFAULT_PAGE_SIZE: usize = 20;

/// Upper bound on requested page sizes.
pub(crate) const MAX_PAGE_SIZE: usize = 100;

/// Serializes a record payload.
pub(crate) fn encode_item<T: Serialize>(value: &T) -> DomainResult<JsonValue> {
    serde_json::to_value(value)
        .map_err(|e| DomainError::internal(format!("Failed to encode record: {}", e)))
}

/// Deserializes a record payload.
pub(crate) fn decode_item<T: DeserializeOwned>(item: JsonValue) -> DomainResult<T> {
    serde_json::from_value(item)
        .map_err(|e| DomainError::internal(format!("Corrupt record: {}", e)))
}

/// Maps a store failure that callers do not treat specially.
pub(crate) fn store_internal(err: StoreError) -> DomainError {
    DomainError::internal(err.to_string())
}
