//! In-memory key-value storage with expiry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::KeyValueStore;
use crate::AnalyticsError;
use crate::clock::{Clock, SystemClock};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Key-value store whose expiry is judged against an injected [`Clock`].
///
/// Expired entries are invisible to `get` but stay in the map until
/// [`cleanup_expired`](Self::cleanup_expired) runs or the key is written
/// again. Call it periodically in long-running processes to bound memory.
#[derive(Clone)]
pub struct InMemoryKeyValueStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Removes expired entries and returns how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        self.entries.write().map_or(0, |mut entries| {
            let before = entries.len();
            entries.retain(|_, entry| entry.expires_at > now);
            before.saturating_sub(entries.len())
        })
    }

    /// Writes a raw value without going through a typed repository.
    pub fn insert_raw(&self, key: &str, value: &str, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                key.to_owned(),
                Entry {
                    value: value.to_owned(),
                    expires_at,
                },
            );
        }
    }
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AnalyticsError> {
        let expires_at = self.clock.now() + ttl;

        self.entries
            .write()
            .map_err(|_| AnalyticsError::StoreUnavailable("Lock poisoned".to_owned()))?
            .insert(
                key.to_owned(),
                Entry {
                    value: value.to_owned(),
                    expires_at,
                },
            );

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AnalyticsError> {
        let now = self.clock.now();
        let entries = self
            .entries
            .read()
            .map_err(|_| AnalyticsError::StoreUnavailable("Lock poisoned".to_owned()))?;

        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone()))
    }
}
