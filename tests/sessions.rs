//! Session recording and history over the in-memory backends.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

use analytics_sessions::actions::{EventPageAction, RecordEventAction, SessionHistoryAction};
use analytics_sessions::session::{DocumentSessionRepository, KeyValueTimestampRepository};
use analytics_sessions::store::{InMemoryDocumentStore, InMemoryKeyValueStore};
use analytics_sessions::{
    AnalyticsError, Clock, Event, ManualClock, Metadata, Session, SessionRepository,
    TimestampRepository,
};

struct Harness {
    clock: ManualClock,
    sessions: DocumentSessionRepository<InMemoryDocumentStore>,
    timestamps: KeyValueTimestampRepository<InMemoryKeyValueStore>,
}

impl Harness {
    fn new(store: InMemoryDocumentStore, now: DateTime<Utc>) -> Self {
        let clock = ManualClock::new(now);
        let shared: Arc<dyn Clock> = Arc::new(clock.clone());
        Harness {
            sessions: DocumentSessionRepository::with_clock(store, shared.clone()),
            timestamps: KeyValueTimestampRepository::new(InMemoryKeyValueStore::with_clock(
                shared,
            )),
            clock,
        }
    }

    fn recorder(
        &self,
    ) -> RecordEventAction<
        DocumentSessionRepository<InMemoryDocumentStore>,
        KeyValueTimestampRepository<InMemoryKeyValueStore>,
    > {
        RecordEventAction::with_clock(
            self.sessions.clone(),
            self.timestamps.clone(),
            Arc::new(self.clock.clone()),
        )
    }
}

fn visit(user: &str, website: &str, id: &str) -> Session {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Session {
        metadata: Metadata {
            id: id.to_owned(),
            user_id: user.to_owned(),
            website_id: website.to_owned(),
            country: "NL".to_owned(),
            city: "Utrecht".to_owned(),
            device: "desktop".to_owned(),
            os: "Linux".to_owned(),
            browser: "Firefox".to_owned(),
            version: "125".to_owned(),
            created_at: created,
        },
        duration: 0,
        event: Event::default(),
        time_report: created,
    }
}

fn pageview(path: &str) -> Event {
    Event::new(json!({"type": "pageview", "path": path}))
}

#[tokio::test]
async fn test_visit_lifecycle() {
    let start = Utc.with_ymd_and_hms(2024, 4, 10, 23, 58, 0).unwrap();
    let h = Harness::new(InMemoryDocumentStore::new(), start);
    let recorder = h.recorder();

    recorder.execute(&visit("u1", "w1", "s1"), pageview("/")).await.unwrap();
    h.clock.advance(Duration::minutes(1));
    recorder.execute(&visit("u1", "w1", "s1"), pageview("/pricing")).await.unwrap();
    recorder.execute(&visit("u1", "w1", "s2"), pageview("/blog")).await.unwrap();
    // crosses midnight
    h.clock.advance(Duration::minutes(2));
    recorder.execute(&visit("u1", "w1", "s1"), pageview("/signup")).await.unwrap();

    assert_eq!(h.timestamps.get_first_timestamp("s1").await.unwrap(), start.timestamp());
    assert_eq!(h.sessions.get_session_count("u1", "s1").await.unwrap(), 3);
    assert_eq!(h.sessions.get_all_session_ids("u1", "w1").await.unwrap(), vec!["s1", "s2"]);
    assert_eq!(h.sessions.get_session_ids_today("u1", "w1").await.unwrap(), vec!["s1"]);

    let history = SessionHistoryAction::new(h.sessions.clone());
    let all = history.all_time("u1", "w1").await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].event, pageview("/signup"));
    assert_eq!(all[0].duration, 180_000);
    assert_eq!(all[1].event, pageview("/blog"));

    let pages = EventPageAction::new(h.sessions.clone());
    let first = pages.execute("u1", "s1", 1, 2).await.unwrap();
    assert_eq!(first, vec![pageview("/"), pageview("/pricing")]);
    let second = pages.execute("u1", "s1", 2, 2).await.unwrap();
    assert_eq!(second, vec![pageview("/signup")]);
}

#[tokio::test]
async fn test_latest_lookup_without_insertion_order() {
    let now = Utc.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap();
    let h = Harness::new(InMemoryDocumentStore::without_insertion_order(), now);
    let recorder = h.recorder();

    for path in ["/a", "/b", "/c"] {
        recorder.execute(&visit("u1", "w1", "s1"), pageview(path)).await.unwrap();
        h.clock.advance(Duration::seconds(10));
    }

    let latest = h
        .sessions
        .get_all_sessions("u1", "w1", &["s1".to_owned()])
        .await
        .unwrap();
    assert_eq!(latest[0].event, pageview("/c"));
    assert_eq!(latest[0].duration, 20_000);
}

#[tokio::test]
async fn test_users_are_isolated() {
    let now = Utc.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap();
    let h = Harness::new(InMemoryDocumentStore::new(), now);
    let recorder = h.recorder();

    recorder.execute(&visit("u1", "w1", "s1"), pageview("/")).await.unwrap();

    assert!(h.sessions.get_all_session_ids("u2", "w1").await.unwrap().is_empty());
    assert_eq!(h.sessions.get_session_count("u2", "s1").await.unwrap(), 0);
    assert!(matches!(
        h.sessions.get_session("u2", "s1").await,
        Err(AnalyticsError::NotFound(_))
    ));
    assert!(h
        .sessions
        .get_events_paged("u2", "s1", 10, 0)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_concurrent_inserts_are_all_counted() {
    let now = Utc.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap();
    let h = Harness::new(InMemoryDocumentStore::new(), now);

    let mut handles = Vec::new();
    for n in 0..20 {
        let sessions = h.sessions.clone();
        handles.push(tokio::spawn(async move {
            sessions
                .insert_session(&visit("u1", "w1", "s1"), Event::new(json!({"n": n})))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(h.sessions.get_session_count("u1", "s1").await.unwrap(), 20);
    assert_eq!(h.sessions.get_events_paged("u1", "s1", 0, 0).await.unwrap().len(), 20);
}
