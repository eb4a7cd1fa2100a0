use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use crate::domain::SourcePlatform;

/// Wall-clock source, in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// Addresses already relayed from one source platform.
///
/// Records are keyed by address and hold the first-seen timestamp. They are
/// never persisted; a restart forgets everything.
pub struct TrackedAddressStore {
    platform: SourcePlatform,
    clock: Arc<dyn Clock>,
    records: Mutex<HashMap<String, u64>>,
}

impl TrackedAddressStore {
    pub fn new(platform: SourcePlatform) -> Self {
        Self::with_clock(platform, Arc::new(SystemClock))
    }

    pub fn with_clock(platform: SourcePlatform, clock: Arc<dyn Clock>) -> Self {
        Self {
            platform,
            clock,
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn platform(&self) -> SourcePlatform {
        self.platform
    }

    fn records(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        // A poisoned map is still a valid map; nothing here can leave it half-written.
        self.records.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn is_tracked(&self, address: &str) -> bool {
        self.records().contains_key(address)
    }

    /// Insert `address` stamped with the current time, unless already present.
    pub fn record_if_absent(&self, address: &str) {
        let now = self.clock.now_ms();
        self.records().entry(address.to_string()).or_insert(now);
    }

    pub fn first_seen(&self, address: &str) -> Option<u64> {
        self.records().get(address).copied()
    }

    /// Drop every record whose age is strictly greater than `max_age`.
    /// Returns the number of records removed.
    pub fn evict_older_than(&self, max_age: Duration) -> usize {
        let now = self.clock.now_ms();
        let max_age_ms = u64::try_from(max_age.as_millis()).unwrap_or(u64::MAX);
        let mut records = self.records();
        let before = records.len();
        records.retain(|_, ts| now.saturating_sub(*ts) <= max_age_ms);
        before - records.len()
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}
