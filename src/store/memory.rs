//! In-memory document storage.
//!
//! Suitable for development, testing, and single-instance deployments.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::{Document, DocumentStore, Filter, FindOptions, InsertionOrder, Order};
use crate::AnalyticsError;

/// Stores documents in an insertion-ordered `Vec` behind a `RwLock`.
///
/// Clones share the same collection.
#[derive(Clone)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<Vec<Document>>>,
    insertion_order: InsertionOrder,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(Vec::new())),
            insertion_order: InsertionOrder::Reliable,
        }
    }

    /// A store that does not advertise its insertion order, for callers
    /// that must work against drivers without a monotonic order field.
    pub fn without_insertion_order() -> Self {
        Self {
            insertion_order: InsertionOrder::Unspecified,
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.documents.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find(
        &self,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<Vec<Document>, AnalyticsError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| AnalyticsError::StoreError("Lock poisoned".to_owned()))?;

        let limit = options.limit.map_or(usize::MAX, to_usize);
        let matching = documents.iter().filter(|doc| filter.matches(doc));

        let found = match options.order {
            Order::Natural => matching
                .skip(to_usize(options.skip))
                .take(limit)
                .cloned()
                .collect(),
            Order::NewestFirst => matching
                .rev()
                .skip(to_usize(options.skip))
                .take(limit)
                .cloned()
                .collect(),
        };

        Ok(found)
    }

    async fn count(&self, filter: &Filter) -> Result<u64, AnalyticsError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| AnalyticsError::StoreError("Lock poisoned".to_owned()))?;

        let count = documents.iter().filter(|doc| filter.matches(doc)).count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn insert_one(&self, document: Document) -> Result<(), AnalyticsError> {
        self.documents
            .write()
            .map_err(|_| AnalyticsError::WriteError("Lock poisoned".to_owned()))?
            .push(document);

        Ok(())
    }

    fn insertion_order(&self) -> InsertionOrder {
        self.insertion_order
    }
}
