//! Recency window calculation.
//!
//! Partition attempts by word, rank each partition newest first by
//! `(timestamp, sequence_id)`, keep the first [`RECENT_WINDOW`] entries and
//! count outcomes. Stores that can push this into a query (the SQLite store
//! uses a window function) only need [`RECENT_WINDOW`]; the in-memory store
//! runs [`tally_recent`] directly.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use crate::model::{AttemptRecord, RecentPerformance};
use crate::traits::RecencyStats;

/// Number of most recent attempts per word that count as "recent".
pub const RECENT_WINDOW: usize = 20;

/// Count outcomes within each word's recency window.
///
/// When `words` is given, attempts for other words are dropped before
/// partitioning.
pub fn tally_recent<'a, I>(attempts: I, words: Option<&[String]>) -> RecencyStats
where
    I: IntoIterator<Item = &'a AttemptRecord>,
{
    let scope: Option<HashSet<&str>> = words.map(|ws| ws.iter().map(String::as_str).collect());

    let mut partitions: HashMap<&str, Vec<&AttemptRecord>> = HashMap::new();
    for attempt in attempts {
        if let Some(scope) = &scope {
            if !scope.contains(attempt.word.as_str()) {
                continue;
            }
        }
        partitions
            .entry(attempt.word.as_str())
            .or_default()
            .push(attempt);
    }

    partitions
        .into_iter()
        .map(|(word, mut entries)| {
            entries.sort_by_key(|a| Reverse((a.timestamp, a.sequence_id)));
            let mut perf = RecentPerformance::default();
            for attempt in entries.into_iter().take(RECENT_WINDOW) {
                if attempt.is_correct {
                    perf.recent_correct += 1;
                } else {
                    perf.recent_mistake += 1;
                }
            }
            (word.to_string(), perf)
        })
        .collect()
}
