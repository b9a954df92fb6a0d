use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::{AnalyticsError, Event, Session, SessionRepository, TimestampRepository};

/// Stores one tracked event, stamping it with the session's elapsed time.
///
/// The first event of a session seeds its first-seen timestamp. Later events
/// read that timestamp back to compute `duration`. If the timestamp expired
/// the current time is written again, so the duration restarts at zero.
pub struct RecordEventAction<S: SessionRepository, T: TimestampRepository> {
    sessions: S,
    timestamps: T,
    clock: Arc<dyn Clock>,
}

impl<S: SessionRepository, T: TimestampRepository> RecordEventAction<S, T> {
    pub fn new(sessions: S, timestamps: T) -> Self {
        Self::with_clock(sessions, timestamps, Arc::new(SystemClock))
    }

    pub fn with_clock(sessions: S, timestamps: T, clock: Arc<dyn Clock>) -> Self {
        RecordEventAction {
            sessions,
            timestamps,
            clock,
        }
    }

    /// Records `event` against `session` and returns the stored document.
    ///
    /// `duration` and `time_report` on the input are ignored.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "record_event", skip_all, err)
    )]
    pub async fn execute(&self, session: &Session, event: Event) -> Result<Session, AnalyticsError> {
        let meta = &session.metadata;
        let now = self.clock.now();

        let seen = self.sessions.get_session_count(&meta.user_id, &meta.id).await?;
        if seen == 0 {
            self.timestamps
                .record_first_timestamp(&meta.id, now.timestamp())
                .await?;
        }

        let first = match self.timestamps.get_first_timestamp(&meta.id).await {
            Ok(first) => first,
            Err(AnalyticsError::NotFound(_)) => {
                self.timestamps
                    .record_first_timestamp(&meta.id, now.timestamp())
                    .await?;
                now.timestamp()
            }
            Err(e) => return Err(e),
        };

        let mut stored = session.clone();
        stored.duration = now
            .timestamp()
            .saturating_sub(first)
            .max(0)
            .saturating_mul(1000);
        stored.time_report = now;

        self.sessions.insert_session(&stored, event.clone()).await?;
        stored.event = event;

        log::info!(
            target: "analytics_sessions",
            "msg=\"event recorded\" session_id=\"{}\" duration_ms={}",
            meta.id,
            stored.duration
        );

        Ok(stored)
    }
}
