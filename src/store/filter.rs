use chrono::{DateTime, Utc};
use serde_json::Value;

use super::Document;

/// A single predicate on a dotted document path.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Value),
    /// Timestamp at path is at or after the bound.
    Gte(DateTime<Utc>),
    /// Timestamp at path is strictly before the bound.
    Lt(DateTime<Utc>),
}

/// Conjunction of path conditions.
///
/// ```rust
/// use analytics_sessions::store::Filter;
/// use serde_json::json;
///
/// let filter = Filter::new()
///     .eq("meta_data.user_id", "u1")
///     .eq("meta_data.id", "s1");
///
/// assert!(filter.matches(&json!({"meta_data": {"user_id": "u1", "id": "s1"}})));
/// assert!(!filter.matches(&json!({"meta_data": {"user_id": "u2", "id": "s1"}})));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Condition)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn eq(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((path.into(), Condition::Eq(value.into())));
        self
    }

    #[must_use]
    pub fn gte(mut self, path: impl Into<String>, bound: DateTime<Utc>) -> Self {
        self.clauses.push((path.into(), Condition::Gte(bound)));
        self
    }

    #[must_use]
    pub fn lt(mut self, path: impl Into<String>, bound: DateTime<Utc>) -> Self {
        self.clauses.push((path.into(), Condition::Lt(bound)));
        self
    }

    pub fn clauses(&self) -> &[(String, Condition)] {
        &self.clauses
    }

    /// Evaluates the filter against a document.
    ///
    /// Timestamp conditions expect an RFC 3339 string at the path; anything
    /// else does not match.
    pub fn matches(&self, document: &Document) -> bool {
        self.clauses.iter().all(|(path, condition)| {
            let Some(value) = lookup(document, path) else {
                return false;
            };
            match condition {
                Condition::Eq(expected) => value == expected,
                Condition::Gte(bound) => as_timestamp(value).is_some_and(|at| at >= *bound),
                Condition::Lt(bound) => as_timestamp(value).is_some_and(|at| at < *bound),
            }
        })
    }
}

/// Resolves a dotted path such as `meta_data.user_id`.
pub(crate) fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, segment| current.get(segment))
}

fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|at| at.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_lookup_nested_path() {
        let doc = json!({"meta_data": {"id": "s1"}});
        assert_eq!(lookup(&doc, "meta_data.id"), Some(&json!("s1")));
        assert_eq!(lookup(&doc, "meta_data.user_id"), None);
        assert_eq!(lookup(&doc, "missing.id"), None);
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(Filter::new().matches(&json!({})));
    }

    #[test]
    fn test_time_range() {
        let midnight = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let filter = Filter::new()
            .gte("time_report", midnight)
            .lt("time_report", midnight + Duration::days(1));

        let at = |t: DateTime<Utc>| json!({ "time_report": t.to_rfc3339() });

        assert!(filter.matches(&at(midnight)));
        assert!(filter.matches(&at(midnight + Duration::hours(23))));
        assert!(!filter.matches(&at(midnight + Duration::days(1))));
        assert!(!filter.matches(&at(midnight - Duration::seconds(1))));
    }

    #[test]
    fn test_time_condition_on_non_timestamp() {
        let filter = Filter::new().gte("time_report", Utc::now());
        assert!(!filter.matches(&json!({"time_report": 12})));
        assert!(!filter.matches(&json!({"time_report": "yesterday"})));
    }

    #[test]
    fn test_eq_is_type_sensitive() {
        let filter = Filter::new().eq("meta_data.user_id", "7");
        assert!(!filter.matches(&json!({"meta_data": {"user_id": 7}})));
    }
}
