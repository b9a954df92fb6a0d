mod document_store;
mod key_value_store;
pub mod migrations;

pub use document_store::PostgresDocumentStore;
pub use key_value_store::PostgresKeyValueStore;

use sqlx::PgPool;

use crate::config::AnalyticsConfig;
use crate::session::{DocumentSessionRepository, KeyValueTimestampRepository};

/// Creates both repositories over one connection pool.
pub fn create_repositories(
    pool: PgPool,
    config: &AnalyticsConfig,
) -> (
    DocumentSessionRepository<PostgresDocumentStore>,
    KeyValueTimestampRepository<PostgresKeyValueStore>,
) {
    (
        DocumentSessionRepository::new(PostgresDocumentStore::with_config(
            pool.clone(),
            &config.sessions,
        )),
        KeyValueTimestampRepository::with_config(PostgresKeyValueStore::new(pool), &config.timestamps),
    )
}
