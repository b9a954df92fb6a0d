//! Session documents and the repositories that read and write them.
//!
//! Every recorded event is stored as its own [`Session`] document carrying
//! the visit's metadata and exactly one [`Event`]. A logical session is
//! therefore the set of documents sharing `meta_data.id`, ordered by
//! insertion. This layout matches data already written by earlier versions
//! of the service.

mod document_repository;
mod repository;
mod timestamp;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use document_repository::DocumentSessionRepository;
pub use repository::SessionRepository;
pub use timestamp::{KeyValueTimestampRepository, TimestampRepository};

pub(crate) const ID_PATH: &str = "meta_data.id";
pub(crate) const USER_ID_PATH: &str = "meta_data.user_id";
pub(crate) const WEBSITE_ID_PATH: &str = "meta_data.website_id";
pub(crate) const TIME_REPORT_PATH: &str = "time_report";

/// Descriptive fields of a visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Session id, generated by the tracking client. Not unique on its own.
    pub id: String,
    pub user_id: String,
    pub website_id: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub browser: String,
    #[serde(default)]
    pub version: String,
    pub created_at: DateTime<Utc>,
}

/// One stored session document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "meta_data")]
    pub metadata: Metadata,
    /// Elapsed milliseconds since the session's first event.
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub event: Event,
    /// Timestamp used for day-window queries.
    pub time_report: DateTime<Utc>,
}

/// A recorded interaction. The payload is passed through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event(Value);

impl Event {
    pub fn new(payload: Value) -> Self {
        Self(payload)
    }

    pub fn payload(&self) -> &Value {
        &self.0
    }

    pub fn into_payload(self) -> Value {
        self.0
    }

    /// Returns a top-level field of the payload.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

impl From<Value> for Event {
    fn from(payload: Value) -> Self {
        Self(payload)
    }
}
