use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::AnalyticsError;
use crate::config::SessionStoreConfig;
use crate::store::{Condition, Document, DocumentStore, Filter, FindOptions, InsertionOrder, Order};

/// `PostgreSQL`-backed document collection.
///
/// Documents live in a shared JSONB table, partitioned by collection name.
/// `seq` records insertion order, so newest-first lookups are a single query.
///
/// String equality filters compare `body #>> '{path}'` as text, matching the
/// expression indexes created by the migrations. Time-range filters only
/// match RFC 3339 strings; other values at the path are non-matches, as in
/// [`Filter::matches`](crate::store::Filter::matches). A string shaped like a
/// timestamp but naming an impossible date (`2024-13-45T00:00:00Z`) still
/// fails the cast and surfaces as `StoreError`.
///
/// # Table Schema
///
/// ```sql
/// CREATE TABLE documents (
///     seq BIGSERIAL PRIMARY KEY,
///     collection VARCHAR(255) NOT NULL,
///     body JSONB NOT NULL,
///     inserted_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
    collection: String,
}

impl PostgresDocumentStore {
    /// Uses the default `sessions` collection.
    pub fn new(pool: PgPool) -> Self {
        Self::with_config(pool, &SessionStoreConfig::default())
    }

    pub fn with_config(pool: PgPool, config: &SessionStoreConfig) -> Self {
        Self {
            pool,
            collection: config.collection.clone(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

fn push_where<'a>(builder: &mut QueryBuilder<'a, Postgres>, collection: &'a str, filter: &Filter) {
    builder.push(" WHERE collection = ").push_bind(collection);

    for (path, condition) in filter.clauses() {
        match condition {
            // text comparison so the expression indexes on `#>>` apply
            Condition::Eq(Value::String(expected)) => {
                builder.push(" AND jsonb_typeof(body #> ");
                push_path(builder, path);
                builder.push(") = 'string' AND body #>> ");
                push_path(builder, path);
                builder.push(" = ").push_bind(expected.clone());
            }
            Condition::Eq(expected) => {
                builder.push(" AND body #> ");
                push_path(builder, path);
                builder.push(" = ").push_bind(Json(expected.clone()));
            }
            Condition::Gte(bound) => {
                push_timestamp(builder, path);
                builder.push(" >= ").push_bind(*bound);
            }
            Condition::Lt(bound) => {
                push_timestamp(builder, path);
                builder.push(" < ").push_bind(*bound);
            }
        }
    }
}

/// Shape of an RFC 3339 timestamp; values that fail it are never cast.
const TIMESTAMP_PATTERN: &str =
    "'^[0-9]{4}-[0-9]{2}-[0-9]{2}[Tt ][0-9]{2}:[0-9]{2}:[0-9]{2}(\\.[0-9]+)?([Zz]|[+-][0-9]{2}:[0-9]{2})$'";

/// Writes a dotted path as a `text[]` literal when every segment is a plain
/// identifier, otherwise binds it.
fn push_path(builder: &mut QueryBuilder<'_, Postgres>, path: &str) {
    let plain = path
        .split('.')
        .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));

    if plain {
        builder.push(format!("'{{{}}}'", path.replace('.', ",")));
    } else {
        let segments: Vec<String> = path.split('.').map(ToOwned::to_owned).collect();
        builder.push_bind(segments);
    }
}

/// Pushes ` AND <timestamp at path>`, NULL when the value is not a timestamp
/// string, so such documents never match instead of failing the query.
fn push_timestamp(builder: &mut QueryBuilder<'_, Postgres>, path: &str) {
    builder.push(" AND CASE WHEN jsonb_typeof(body #> ");
    push_path(builder, path);
    builder.push(") = 'string' AND body #>> ");
    push_path(builder, path);
    builder.push(format!(" ~ {TIMESTAMP_PATTERN} THEN (body #>> "));
    push_path(builder, path);
    builder.push(")::timestamptz END");
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn read_error(operation: &str, e: &sqlx::Error) -> AnalyticsError {
    log::error!(target: "analytics_sessions::postgres", "msg=\"database error\", operation=\"{operation}\", error=\"{e}\"");
    AnalyticsError::StoreError(e.to_string())
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, filter), err))]
    async fn find(
        &self,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<Vec<Document>, AnalyticsError> {
        let mut builder = QueryBuilder::new("SELECT body FROM documents");
        push_where(&mut builder, &self.collection, filter);

        builder.push(match options.order {
            Order::Natural => " ORDER BY seq ASC",
            Order::NewestFirst => " ORDER BY seq DESC",
        });
        if let Some(limit) = options.limit {
            builder.push(" LIMIT ").push_bind(to_i64(limit));
        }
        builder.push(" OFFSET ").push_bind(to_i64(options.skip));

        let rows = builder
            .build_query_scalar::<Json<Value>>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| read_error("document_find", &e))?;

        Ok(rows.into_iter().map(|Json(body)| body).collect())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, filter), err))]
    async fn count(&self, filter: &Filter) -> Result<u64, AnalyticsError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM documents");
        push_where(&mut builder, &self.collection, filter);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| read_error("document_count", &e))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn insert_one(&self, document: Document) -> Result<(), AnalyticsError> {
        sqlx::query("INSERT INTO documents (collection, body) VALUES ($1, $2)")
            .bind(&self.collection)
            .bind(Json(document))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                log::error!(target: "analytics_sessions::postgres", "msg=\"database error\", operation=\"document_insert\", error=\"{e}\"");
                AnalyticsError::WriteError(e.to_string())
            })?;

        Ok(())
    }

    fn insertion_order(&self) -> InsertionOrder {
        InsertionOrder::Reliable
    }
}
