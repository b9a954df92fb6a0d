//! Session repository trait.

use async_trait::async_trait;

use super::{Event, Session};
use crate::AnalyticsError;

/// Query and write surface over stored session documents.
///
/// Every read is scoped by the requesting user, and by website or session
/// id; documents belonging to other users are never returned.
///
/// Implementations:
/// - [`DocumentSessionRepository`](super::DocumentSessionRepository): any [`DocumentStore`](crate::DocumentStore)
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Returns the first document for `(user_id, session_id)`.
    ///
    /// No secondary sort is applied; when several documents share the id,
    /// callers must not rely on which one comes back.
    async fn get_session(&self, user_id: &str, session_id: &str)
    -> Result<Session, AnalyticsError>;

    /// Returns the most recently inserted document for each id, in input
    /// order.
    ///
    /// Fails with `NotFound` if any id has no documents.
    async fn get_all_sessions(
        &self,
        user_id: &str,
        website_id: &str,
        session_ids: &[String],
    ) -> Result<Vec<Session>, AnalyticsError>;

    /// Distinct session ids for a website, in first-seen order.
    async fn get_all_session_ids(
        &self,
        user_id: &str,
        website_id: &str,
    ) -> Result<Vec<String>, AnalyticsError>;

    /// Distinct session ids whose `time_report` falls within the current UTC
    /// day.
    async fn get_session_ids_today(
        &self,
        user_id: &str,
        website_id: &str,
    ) -> Result<Vec<String>, AnalyticsError>;

    /// Number of documents stored for `(user_id, session_id)`.
    async fn get_session_count(&self, user_id: &str, session_id: &str)
    -> Result<u64, AnalyticsError>;

    /// Appends one document built from `session`'s fields and `event`.
    ///
    /// Repeated inserts under one session id are expected.
    async fn insert_session(&self, session: &Session, event: Event) -> Result<(), AnalyticsError>;

    /// Events of `(user_id, session_id)` in store order, skipping `skip`
    /// documents and returning at most `limit` (`0` means no limit).
    async fn get_events_paged(
        &self,
        user_id: &str,
        session_id: &str,
        limit: u64,
        skip: u64,
    ) -> Result<Vec<Event>, AnalyticsError>;
}
