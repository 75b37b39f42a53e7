//! Domain services for the Clubhouse backend.
//!
//! Services contain business logic that operates on domain models.

pub mod capability_cache;

pub use capability_cache::{CapabilityCache, Clock, ManualClock, SystemClock, DEFAULT_TTL};
