//! First-seen timestamps per session.

use async_trait::async_trait;
use chrono::Duration;

use crate::AnalyticsError;
use crate::config::TimestampConfig;
use crate::store::KeyValueStore;

/// Remembers when a session was first seen, in Unix seconds.
#[async_trait]
pub trait TimestampRepository: Send + Sync {
    /// Stores `epoch_seconds` for `session_id`, overwriting any previous
    /// value and restarting its expiry.
    async fn record_first_timestamp(
        &self,
        session_id: &str,
        epoch_seconds: i64,
    ) -> Result<(), AnalyticsError>;

    /// Returns the stored timestamp.
    ///
    /// `NotFound` when the key is missing or has expired, `ParseError` when
    /// the stored value is not an integer.
    async fn get_first_timestamp(&self, session_id: &str) -> Result<i64, AnalyticsError>;
}

/// [`TimestampRepository`] keyed directly by session id in a [`KeyValueStore`].
#[derive(Clone)]
pub struct KeyValueTimestampRepository<K: KeyValueStore> {
    store: K,
    ttl: Duration,
}

impl<K: KeyValueStore> KeyValueTimestampRepository<K> {
    pub fn new(store: K) -> Self {
        Self::with_config(store, &TimestampConfig::default())
    }

    pub fn with_config(store: K, config: &TimestampConfig) -> Self {
        Self {
            store,
            ttl: config.ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[async_trait]
impl<K: KeyValueStore> TimestampRepository for KeyValueTimestampRepository<K> {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn record_first_timestamp(
        &self,
        session_id: &str,
        epoch_seconds: i64,
    ) -> Result<(), AnalyticsError> {
        self.store
            .set_ex(session_id, &epoch_seconds.to_string(), self.ttl)
            .await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn get_first_timestamp(&self, session_id: &str) -> Result<i64, AnalyticsError> {
        let raw = self
            .store
            .get(session_id)
            .await?
            .ok_or_else(|| AnalyticsError::NotFound(format!("timestamp {session_id}")))?;

        raw.trim().parse::<i64>().map_err(|e| {
            log::warn!(
                target: "analytics_sessions::timestamp",
                "msg=\"stored timestamp is not an integer\" session_id=\"{session_id}\" error=\"{e}\""
            );
            AnalyticsError::ParseError(format!("timestamp {session_id}: {e}"))
        })
    }
}
