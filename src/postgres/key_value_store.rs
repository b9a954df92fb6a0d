use async_trait::async_trait;
use chrono::Duration;
use sqlx::PgPool;

use crate::AnalyticsError;
use crate::store::KeyValueStore;

/// `PostgreSQL`-backed key-value store with per-key expiry.
///
/// Expired rows are invisible to `get`; call
/// [`cleanup_expired`](Self::cleanup_expired) periodically to prevent table
/// growth.
///
/// # Table Schema
///
/// ```sql
/// CREATE TABLE key_values (
///     key VARCHAR(255) PRIMARY KEY,
///     value TEXT NOT NULL,
///     expires_at TIMESTAMPTZ NOT NULL
/// );
/// ```
#[derive(Clone)]
pub struct PostgresKeyValueStore {
    pool: PgPool,
}

impl PostgresKeyValueStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Deletes expired rows and returns how many were removed.
    pub async fn cleanup_expired(&self) -> Result<u64, AnalyticsError> {
        let result = sqlx::query("DELETE FROM key_values WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| unavailable("key_value_cleanup", &e))?;

        Ok(result.rows_affected())
    }
}

fn unavailable(operation: &str, e: &sqlx::Error) -> AnalyticsError {
    log::error!(target: "analytics_sessions::postgres", "msg=\"database error\", operation=\"{operation}\", error=\"{e}\"");
    AnalyticsError::StoreUnavailable(e.to_string())
}

#[async_trait]
impl KeyValueStore for PostgresKeyValueStore {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, value), err))]
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AnalyticsError> {
        let ttl_interval = format!("{} milliseconds", ttl.num_milliseconds());

        sqlx::query(
            r"
            INSERT INTO key_values (key, value, expires_at)
            VALUES ($1, $2, NOW() + $3::interval)
            ON CONFLICT (key) DO UPDATE SET
                value = EXCLUDED.value,
                expires_at = EXCLUDED.expires_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(&ttl_interval)
        .execute(&self.pool)
        .await
        .map_err(|e| unavailable("key_value_set", &e))?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn get(&self, key: &str) -> Result<Option<String>, AnalyticsError> {
        sqlx::query_scalar("SELECT value FROM key_values WHERE key = $1 AND expires_at > NOW()")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unavailable("key_value_get", &e))
    }
}
