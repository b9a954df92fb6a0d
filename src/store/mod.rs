//! Storage collaborators used by the session layer.
//!
//! The session repository talks to a [`DocumentStore`] (a collection of
//! JSON documents with filtered find, count and insert) and the timestamp
//! repository to a [`KeyValueStore`] (`SET key value EX seconds` / `GET key`).
//! Implement these traits to plug in your own driver.
//!
//! | Backend | Document | Key-value |
//! |---------|----------|-----------|
//! | In-memory | [`InMemoryDocumentStore`] | [`InMemoryKeyValueStore`] |
//! | `PostgreSQL` (feature `sqlx_postgres`) | `PostgresDocumentStore` | `PostgresKeyValueStore` |

mod filter;
mod memory;
mod memory_kv;

use async_trait::async_trait;
use chrono::Duration;

use crate::AnalyticsError;

pub use filter::{Condition, Filter};
pub use memory::InMemoryDocumentStore;
pub use memory_kv::InMemoryKeyValueStore;

/// A stored document.
pub type Document = serde_json::Value;

/// Order in which `find` yields matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Whatever order the store produces without a sort.
    #[default]
    Natural,
    /// Most recently inserted first. Only meaningful when the store reports
    /// [`InsertionOrder::Reliable`].
    NewestFirst,
}

/// Whether a store can sort by insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionOrder {
    /// Natural order is insertion order and `Order::NewestFirst` is honoured.
    Reliable,
    /// No monotonic order field is guaranteed.
    Unspecified,
}

/// Skip/limit/order applied to a find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FindOptions {
    pub skip: u64,
    /// `None` returns every remaining match.
    pub limit: Option<u64>,
    pub order: Order,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn newest_first(mut self) -> Self {
        self.order = Order::NewestFirst;
        self
    }
}

/// A collection of JSON documents.
///
/// `find` returns a fully drained result, so implementations backed by a
/// server-side cursor must exhaust or close it before returning, on error
/// paths too.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns matching documents after applying `options`.
    async fn find(
        &self,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<Vec<Document>, AnalyticsError>;

    /// Returns the first match after applying `options`.
    async fn find_one(
        &self,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<Option<Document>, AnalyticsError> {
        let documents = self.find(filter, options.limit(1)).await?;
        Ok(documents.into_iter().next())
    }

    async fn count(&self, filter: &Filter) -> Result<u64, AnalyticsError>;

    /// Appends a document. No uniqueness is enforced.
    async fn insert_one(&self, document: Document) -> Result<(), AnalyticsError>;

    fn insertion_order(&self) -> InsertionOrder {
        InsertionOrder::Unspecified
    }
}

/// String key-value store with per-key expiry.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value and expiry.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AnalyticsError>;

    /// Returns the live value, or `None` when missing or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, AnalyticsError>;
}
