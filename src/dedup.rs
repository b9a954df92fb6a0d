//! Order-preserving deduplication of identifier lists.

use std::collections::HashSet;

/// Returns each value once, in the order it was first seen.
///
/// Scans over session documents yield one id per stored event; this collapses
/// them into the logical list of sessions.
///
/// ```rust
/// use analytics_sessions::remove_duplicates;
///
/// let ids = remove_duplicates(["a", "b", "a", "c", "b"].map(String::from));
/// assert_eq!(ids, vec!["a", "b", "c"]);
/// ```
pub fn remove_duplicates<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
