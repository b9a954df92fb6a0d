//! Database migrations for the `PostgreSQL` backends.
//!
//! # Example
//!
//! ```rust,ignore
//! use analytics_sessions::postgres::migrations;
//! use sqlx::PgPool;
//!
//! async fn setup_database(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//!     migrations::run(pool).await
//! }
//! ```

use sqlx::PgPool;

/// Creates the tables used by the `PostgreSQL` backends:
/// - `documents`
/// - `key_values`
pub async fn run(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
