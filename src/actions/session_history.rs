use crate::{AnalyticsError, Session, SessionRepository};

/// Lists a website's sessions as their most recent documents.
pub struct SessionHistoryAction<S: SessionRepository> {
    sessions: S,
}

impl<S: SessionRepository> SessionHistoryAction<S> {
    pub fn new(sessions: S) -> Self {
        SessionHistoryAction { sessions }
    }

    /// Sessions with at least one event reported during the current UTC day.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "session_history_today", skip(self), err)
    )]
    pub async fn today(&self, user_id: &str, website_id: &str) -> Result<Vec<Session>, AnalyticsError> {
        let ids = self.sessions.get_session_ids_today(user_id, website_id).await?;
        self.latest(user_id, website_id, &ids).await
    }

    /// Every session ever recorded for the website.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "session_history_all_time", skip(self), err)
    )]
    pub async fn all_time(
        &self,
        user_id: &str,
        website_id: &str,
    ) -> Result<Vec<Session>, AnalyticsError> {
        let ids = self.sessions.get_all_session_ids(user_id, website_id).await?;
        self.latest(user_id, website_id, &ids).await
    }

    async fn latest(
        &self,
        user_id: &str,
        website_id: &str,
        ids: &[String],
    ) -> Result<Vec<Session>, AnalyticsError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.sessions.get_all_sessions(user_id, website_id, ids).await
    }
}
