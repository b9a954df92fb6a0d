use crate::config::SessionStoreConfig;
use crate::{AnalyticsError, Event, SessionRepository};

/// Pages through the events of one session.
pub struct EventPageAction<S: SessionRepository> {
    sessions: S,
    max_page_size: u64,
}

impl<S: SessionRepository> EventPageAction<S> {
    pub fn new(sessions: S) -> Self {
        Self::with_config(sessions, &SessionStoreConfig::default())
    }

    pub fn with_config(sessions: S, config: &SessionStoreConfig) -> Self {
        EventPageAction {
            sessions,
            max_page_size: config.max_page_size.max(1),
        }
    }

    /// Returns page `page` (1-based) of `per_page` events.
    ///
    /// `page` 0 is treated as 1 and `per_page` is clamped to
    /// `[1, max_page_size]`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "event_page", skip(self), err)
    )]
    pub async fn execute(
        &self,
        user_id: &str,
        session_id: &str,
        page: u64,
        per_page: u64,
    ) -> Result<Vec<Event>, AnalyticsError> {
        let per_page = per_page.clamp(1, self.max_page_size);
        let skip = page.max(1).saturating_sub(1).saturating_mul(per_page);

        self.sessions
            .get_events_paged(user_id, session_id, per_page, skip)
            .await
    }
}
