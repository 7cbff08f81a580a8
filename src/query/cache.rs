//! Explicit query cache shared by reads and optimistic writes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::ports::Clock;

/// Cache keys. Each maps to one backend collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// `["tasks"]`
    Tasks,
    /// `["statuses"]`
    Statuses,
    /// `["developers"]`
    Developers,
    /// `["skills"]`
    Skills,
}

impl QueryKey {
    /// Every key, in a fixed order.
    pub const ALL: [Self; 4] = [Self::Tasks, Self::Statuses, Self::Developers, Self::Skills];

    /// Path segments identifying the key.
    #[must_use]
    pub fn segments(self) -> &'static [&'static str] {
        match self {
            Self::Tasks => &["tasks"],
            Self::Statuses => &["statuses"],
            Self::Developers => &["developers"],
            Self::Skills => &["skills"],
        }
    }

    /// How long a successful read stays fresh. Tasks are always stale.
    #[must_use]
    pub fn stale_time(self) -> Duration {
        match self {
            Self::Tasks => Duration::zero(),
            Self::Statuses | Self::Developers | Self::Skills => Duration::minutes(5),
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    data: Value,
    updated_at: DateTime<Utc>,
    invalidated: bool,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<QueryKey, CacheEntry>,
    generations: HashMap<QueryKey, u64>,
    fetches: HashMap<QueryKey, FetchOutcome>,
}

/// How the latest completed fetch of a key ended.
#[derive(Debug, Default)]
struct FetchOutcome {
    count: u64,
    error: Option<String>,
}

/// Holds the last known data per [`QueryKey`].
///
/// Values are stored as JSON so one cache can hold every collection type.
/// Fetch locks serialize concurrent reads of the same key so that a waiting
/// reader can reuse the result of the one in flight.
pub struct QueryCache {
    clock: Arc<dyn Clock>,
    state: Mutex<CacheState>,
    fetch_locks: HashMap<QueryKey, tokio::sync::Mutex<()>>,
}

impl QueryCache {
    /// Creates an empty cache stamping entries with `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let fetch_locks = QueryKey::ALL.iter().map(|key| (*key, tokio::sync::Mutex::new(()))).collect();
        Self { clock, state: Mutex::new(CacheState::default()), fetch_locks }
    }

    /// Cached data for `key`, fresh or not.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: QueryKey) -> Option<T> {
        let state = self.state.lock().expect("cache lock poisoned");
        let entry = state.entries.get(&key)?;
        match serde_json::from_value(entry.data.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = ?key.segments(), error = %e, "cached value has unexpected shape");
                None
            }
        }
    }

    /// Stores `value` under `key`, stamped now and marked fresh.
    pub fn set<T: Serialize>(&self, key: QueryKey, value: &T) {
        let data = match serde_json::to_value(value) {
            Ok(data) => data,
            Err(e) => {
                warn!(key = ?key.segments(), error = %e, "value not cacheable");
                return;
            }
        };
        let updated_at = self.clock.now();
        let mut state = self.state.lock().expect("cache lock poisoned");
        state.entries.insert(key, CacheEntry { data, updated_at, invalidated: false });
        *state.generations.entry(key).or_insert(0) += 1;
    }

    /// Marks `key` stale so the next read refetches. Data stays available.
    pub fn invalidate(&self, key: QueryKey) {
        let mut state = self.state.lock().expect("cache lock poisoned");
        if let Some(entry) = state.entries.get_mut(&key) {
            entry.invalidated = true;
        }
    }

    /// Whether `key` holds data young enough to skip a fetch.
    #[must_use]
    pub fn is_fresh(&self, key: QueryKey) -> bool {
        let stale_time = key.stale_time();
        if stale_time <= Duration::zero() {
            return false;
        }
        let updated_at = {
            let state = self.state.lock().expect("cache lock poisoned");
            match state.entries.get(&key) {
                Some(entry) if !entry.invalidated => entry.updated_at,
                _ => return false,
            }
        };
        self.clock.now() - updated_at < stale_time
    }

    /// Number of times `key` has been written.
    #[must_use]
    pub fn generation(&self, key: QueryKey) -> u64 {
        let state = self.state.lock().expect("cache lock poisoned");
        state.generations.get(&key).copied().unwrap_or(0)
    }

    /// Number of fetches of `key` that have completed, failed ones included.
    #[must_use]
    pub fn completed_fetches(&self, key: QueryKey) -> u64 {
        let state = self.state.lock().expect("cache lock poisoned");
        state.fetches.get(&key).map_or(0, |outcome| outcome.count)
    }

    /// Error of the latest completed fetch of `key`, if it failed.
    #[must_use]
    pub fn last_fetch_error(&self, key: QueryKey) -> Option<String> {
        let state = self.state.lock().expect("cache lock poisoned");
        state.fetches.get(&key).and_then(|outcome| outcome.error.clone())
    }

    pub(crate) fn record_fetch(&self, key: QueryKey, error: Option<String>) {
        let mut state = self.state.lock().expect("cache lock poisoned");
        let outcome = state.fetches.entry(key).or_default();
        outcome.count += 1;
        outcome.error = error;
    }

    pub(crate) fn fetch_lock(&self, key: QueryKey) -> &tokio::sync::Mutex<()> {
        &self.fetch_locks[&key]
    }
}
