//! Periodic eviction of expired capability cache entries.
//!
//! A liveness optimization only: expired entries are also rejected on
//! read, so a missed sweep never serves stale capabilities.

use domain::services::CapabilityCache;
use std::sync::Arc;
use std::time::Duration;

use super::scheduler::Job;

/// Sweeps the capability cache once per TTL.
pub struct CapabilitySweepJob {
    cache: Arc<CapabilityCache>,
    period: Duration,
}

impl CapabilitySweepJob {
    pub fn new(cache: Arc<CapabilityCache>, period: Duration) -> Self {
        Self { cache, period }
    }
}

#[async_trait::async_trait]
impl Job for CapabilitySweepJob {
    fn name(&self) -> &'static str {
        "capability_cache_sweep"
    }

    fn interval(&self) -> Duration {
        self.period
    }

    async fn execute(&self) -> Result<(), String> {
        let evicted = self.cache.sweep();
        tracing::debug!(evicted, remaining = self.cache.len(), "Capability cache swept");
        Ok(())
    }
}
