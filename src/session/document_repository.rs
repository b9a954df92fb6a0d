//! [`SessionRepository`] over a [`DocumentStore`].

use std::sync::Arc;

use async_trait::async_trait;

use super::repository::SessionRepository;
use super::{
    Event, ID_PATH, Metadata, Session, TIME_REPORT_PATH, USER_ID_PATH, WEBSITE_ID_PATH,
};
use crate::clock::{Clock, DayWindow, SystemClock};
use crate::dedup::remove_duplicates;
use crate::store::{Document, DocumentStore, Filter, FindOptions, InsertionOrder};
use crate::AnalyticsError;

/// Session repository backed by any document store.
///
/// # Latest-document lookups
///
/// [`get_all_sessions`](SessionRepository::get_all_sessions) needs the most
/// recently inserted document per session id. When the store reports
/// [`InsertionOrder::Reliable`] this is a single newest-first query. Otherwise
/// the repository counts the matches and re-issues the filter with
/// `skip = count - 1`. That pair is not atomic: an insert for the same id
/// landing between the two queries shifts the offset and yields the
/// next-to-last document instead.
#[derive(Clone)]
pub struct DocumentSessionRepository<D: DocumentStore> {
    store: D,
    clock: Arc<dyn Clock>,
}

impl<D: DocumentStore> DocumentSessionRepository<D> {
    pub fn new(store: D) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Uses `clock` to decide what "today" is.
    pub fn with_clock(store: D, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &D {
        &self.store
    }

    async fn latest(&self, filter: &Filter, session_id: &str) -> Result<Session, AnalyticsError> {
        let document = match self.store.insertion_order() {
            InsertionOrder::Reliable => {
                self.store
                    .find_one(filter, FindOptions::new().newest_first())
                    .await?
            }
            InsertionOrder::Unspecified => {
                let count = self.store.count(filter).await?;
                if count == 0 {
                    return Err(not_found(session_id));
                }
                self.store
                    .find_one(filter, FindOptions::new().skip(count - 1))
                    .await?
            }
        };

        document.map(decode).transpose()?.ok_or_else(|| not_found(session_id))
    }

    async fn scan_ids(&self, filter: &Filter) -> Result<Vec<String>, AnalyticsError> {
        let documents = self.store.find(filter, FindOptions::new()).await?;

        let ids = documents
            .into_iter()
            .map(|doc| decode(doc).map(|session| session.metadata.id))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(remove_duplicates(ids))
    }
}

fn user_session(user_id: &str, session_id: &str) -> Filter {
    Filter::new()
        .eq(USER_ID_PATH, user_id)
        .eq(ID_PATH, session_id)
}

fn user_website(user_id: &str, website_id: &str) -> Filter {
    Filter::new()
        .eq(USER_ID_PATH, user_id)
        .eq(WEBSITE_ID_PATH, website_id)
}

fn not_found(session_id: &str) -> AnalyticsError {
    log::debug!(
        target: "analytics_sessions::session",
        "msg=\"session not found\" session_id=\"{session_id}\""
    );
    AnalyticsError::NotFound(format!("session {session_id}"))
}

fn decode(document: Document) -> Result<Session, AnalyticsError> {
    serde_json::from_value(document).map_err(|e| {
        log::error!(
            target: "analytics_sessions::session",
            "msg=\"session document decode failed\" error=\"{e}\""
        );
        AnalyticsError::StoreError(format!("decode session: {e}"))
    })
}

#[async_trait]
impl<D: DocumentStore> SessionRepository for DocumentSessionRepository<D> {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn get_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Session, AnalyticsError> {
        let document = self
            .store
            .find_one(&user_session(user_id, session_id), FindOptions::new())
            .await?
            .ok_or_else(|| not_found(session_id))?;

        decode(document)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, session_ids), err))]
    async fn get_all_sessions(
        &self,
        user_id: &str,
        website_id: &str,
        session_ids: &[String],
    ) -> Result<Vec<Session>, AnalyticsError> {
        let mut sessions = Vec::with_capacity(session_ids.len());

        for session_id in session_ids {
            let filter = user_website(user_id, website_id).eq(ID_PATH, session_id.as_str());
            sessions.push(self.latest(&filter, session_id).await?);
        }

        Ok(sessions)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn get_all_session_ids(
        &self,
        user_id: &str,
        website_id: &str,
    ) -> Result<Vec<String>, AnalyticsError> {
        self.scan_ids(&user_website(user_id, website_id)).await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn get_session_ids_today(
        &self,
        user_id: &str,
        website_id: &str,
    ) -> Result<Vec<String>, AnalyticsError> {
        let today = DayWindow::containing(self.clock.now());
        let filter = user_website(user_id, website_id)
            .gte(TIME_REPORT_PATH, today.start)
            .lt(TIME_REPORT_PATH, today.end);

        self.scan_ids(&filter).await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn get_session_count(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<u64, AnalyticsError> {
        self.store.count(&user_session(user_id, session_id)).await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn insert_session(&self, session: &Session, event: Event) -> Result<(), AnalyticsError> {
        let meta = &session.metadata;
        let document = Session {
            metadata: Metadata {
                id: meta.id.clone(),
                user_id: meta.user_id.clone(),
                website_id: meta.website_id.clone(),
                country: meta.country.clone(),
                city: meta.city.clone(),
                device: meta.device.clone(),
                os: meta.os.clone(),
                browser: meta.browser.clone(),
                version: meta.version.clone(),
                created_at: meta.created_at,
            },
            duration: session.duration,
            event,
            time_report: session.time_report,
        };

        let document = serde_json::to_value(&document)
            .map_err(|e| AnalyticsError::WriteError(format!("encode session: {e}")))?;

        self.store.insert_one(document).await?;

        log::debug!(
            target: "analytics_sessions::session",
            "msg=\"session event stored\" session_id=\"{}\" website_id=\"{}\"",
            meta.id,
            meta.website_id
        );

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn get_events_paged(
        &self,
        user_id: &str,
        session_id: &str,
        limit: u64,
        skip: u64,
    ) -> Result<Vec<Event>, AnalyticsError> {
        let mut options = FindOptions::new().skip(skip);
        if limit > 0 {
            options = options.limit(limit);
        }

        let documents = self
            .store
            .find(&user_session(user_id, session_id), options)
            .await?;

        documents
            .into_iter()
            .map(|doc| decode(doc).map(|session| session.event))
            .collect()
    }
}
