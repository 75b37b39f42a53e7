//! TTL-bounded cache of resolved capabilities.
//!
//! Keyed by (user id, system role). The cache is a per-process
//! performance optimization, never a source of truth: entries are
//! valid for at most one TTL, expired entries are rejected on read
//! even before the periodic sweep removes them, and role changes are
//! handled by explicit invalidation.
//!
//! The cache owns no timer. It is constructed with a [`Clock`] and
//! the process owner schedules [`CapabilityCache::sweep`] explicitly,
//! so tests drive expiry with a fake clock instead of sleeping.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use uuid::Uuid;

use crate::models::capability::{system_role_capabilities, Capability};
use crate::models::principal::{Principal, SystemRole};

/// Default time-to-live for cached capability sets.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Source of the current time, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now = *now + ChronoDuration::from_std(by).expect("duration out of range");
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock poisoned")
    }
}

struct CacheEntry {
    capabilities: HashSet<Capability>,
    expires_at: DateTime<Utc>,
}

/// TTL cache of system-scope capability sets.
pub struct CapabilityCache {
    ttl: ChronoDuration,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<(Uuid, SystemRole), CacheEntry>>,
    misses: AtomicU64,
}

impl CapabilityCache {
    /// Create a cache with an explicit TTL and clock.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl: ChronoDuration::from_std(ttl).expect("TTL out of range"),
            clock,
            entries: RwLock::new(HashMap::new()),
            misses: AtomicU64::new(0),
        }
    }

    /// Create a cache with the default TTL and the wall clock.
    pub fn with_system_clock() -> Self {
        Self::new(DEFAULT_TTL, Arc::new(SystemClock))
    }

    /// Returns the principal's system-scope capabilities, from cache
    /// when present and not expired, resolving and storing otherwise.
    pub fn resolve(&self, principal: &Principal) -> HashSet<Capability> {
        let key = (principal.user_id, principal.role);
        let now = self.clock.now();

        {
            let entries = self.entries.read().expect("cache lock poisoned");
            if let Some(entry) = entries.get(&key) {
                // Expired entries are rejected here even if the sweep
                // has not run yet.
                if entry.expires_at > now {
                    return entry.capabilities.clone();
                }
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let capabilities = system_role_capabilities(principal.role);

        let mut entries = self.entries.write().expect("cache lock poisoned");
        entries.insert(
            key,
            CacheEntry {
                capabilities: capabilities.clone(),
                expires_at: now + self.ttl,
            },
        );

        capabilities
    }

    /// Removes every entry for the user, regardless of the role the
    /// entry was cached under. Returns the number of entries removed.
    pub fn invalidate(&self, user_id: Uuid) -> usize {
        let mut entries = self.entries.write().expect("cache lock poisoned");
        let before = entries.len();
        entries.retain(|(cached_user, _), _| *cached_user != user_id);
        before - entries.len()
    }

    /// Evicts all expired entries. Returns the number evicted.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().expect("cache lock poisoned");
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        let evicted = before - entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Swept expired capability cache entries");
        }
        evicted
    }

    /// Number of cached entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.read().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of resolver invocations (cache misses) so far.
    pub fn miss_count(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}
