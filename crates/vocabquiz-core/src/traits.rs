//! Core trait definitions for persistence and vocabulary sources.
//!
//! The store traits are implemented by [`crate::memory::MemoryStore`] and by
//! the SQLite store in `vocabquiz-store`; vocabulary sources live in
//! `vocabquiz-sources`.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{AttemptRecord, RecentPerformance, WordAggregate, WordEntry};

/// Per-word outcome counts within the recency window.
pub type RecencyStats = HashMap<String, RecentPerformance>;

// ---------------------------------------------------------------------------
// Store traits
// ---------------------------------------------------------------------------

/// Append-only log of every answered question.
#[async_trait]
pub trait AttemptLog: Send + Sync {
    /// Append one attempt stamped with the current time.
    async fn append(&self, word: &str, is_correct: bool) -> Result<AttemptRecord>;

    /// Outcome counts over each word's most recent attempts.
    ///
    /// `None` covers every word with at least one attempt. Words without
    /// attempts are absent from the result rather than zero-filled.
    async fn recent_performance(&self, words: Option<&[String]>) -> Result<RecencyStats>;

    /// Delete every attempt.
    async fn reset_log(&self) -> Result<()>;
}

/// Per-word lifetime counters.
#[async_trait]
pub trait AggregateStore: Send + Sync {
    /// Atomically create or increment the counter matching `is_correct`.
    async fn record_result(&self, word: &str, is_correct: bool) -> Result<WordAggregate>;

    /// Rows for the given words. Words never attempted are absent.
    async fn aggregates_for(&self, words: &[String]) -> Result<HashMap<String, WordAggregate>>;

    /// Every row, ordered by word.
    async fn all_aggregates(&self) -> Result<Vec<WordAggregate>>;

    /// Delete every row.
    async fn reset_aggregates(&self) -> Result<()>;
}

/// A consistent read of both tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Aggregate rows in scope, ordered by word.
    pub aggregates: Vec<WordAggregate>,
    /// Recency counts for the same scope.
    pub recent: RecencyStats,
}

impl StatsSnapshot {
    pub fn aggregate(&self, word: &str) -> Option<&WordAggregate> {
        self.aggregates.iter().find(|a| a.word == word)
    }
}

/// The full persistence contract the quiz engine needs.
///
/// Implementations must make `record_attempt`, `snapshot` and `reset_all`
/// each behave as a single transaction across the log and the aggregates.
#[async_trait]
pub trait StatsStore: AttemptLog + AggregateStore {
    /// Human-readable backend name (e.g. "sqlite").
    fn backend(&self) -> &str;

    /// Append to the log and bump the aggregate in one transaction.
    async fn record_attempt(&self, word: &str, is_correct: bool) -> Result<WordAggregate>;

    /// Read aggregates and recency for `words` (or everything) together.
    async fn snapshot(&self, words: Option<&[String]>) -> Result<StatsSnapshot>;

    /// Clear the log and the aggregates together.
    async fn reset_all(&self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Vocabulary source trait
// ---------------------------------------------------------------------------

/// Supplies word pools by identifier.
pub trait VocabularySource: Send + Sync {
    /// Identifiers of the available vocabulary sets.
    fn list_sets(&self) -> Result<Vec<String>>;

    /// Load one set. Fails with `VocabularyNotFound` for unknown identifiers.
    fn load_words(&self, id: &str) -> Result<Vec<WordEntry>>;
}

/// Load several sets and concatenate them in order.
pub fn load_pool<S>(source: &S, ids: &[String]) -> Result<Vec<WordEntry>>
where
    S: VocabularySource + ?Sized,
{
    let mut pool = Vec::new();
    for id in ids {
        let id = id.trim();
        if id.is_empty() {
            continue;
        }
        pool.extend(source.load_words(id)?);
    }
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuizError;

    struct FixedSource;

    impl VocabularySource for FixedSource {
        fn list_sets(&self) -> Result<Vec<String>> {
            Ok(vec!["fruit".into(), "colors".into()])
        }

        fn load_words(&self, id: &str) -> Result<Vec<WordEntry>> {
            match id {
                "fruit" => Ok(vec![
                    WordEntry::new("apple", "蘋果"),
                    WordEntry::new("banana", "香蕉"),
                ]),
                "colors" => Ok(vec![WordEntry::new("red", "紅")]),
                other => Err(QuizError::VocabularyNotFound(other.to_string())),
            }
        }
    }

    #[test]
    fn load_pool_concatenates_in_order() {
        let pool = load_pool(&FixedSource, &["colors".into(), " fruit ".into()]).unwrap();
        let words: Vec<&str> = pool.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["red", "apple", "banana"]);
    }

    #[test]
    fn load_pool_skips_blank_ids() {
        let pool = load_pool(&FixedSource, &["".into(), "colors".into()]).unwrap();
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn load_pool_surfaces_not_found() {
        let err = load_pool(&FixedSource, &["fruit".into(), "verbs".into()]).unwrap_err();
        assert!(matches!(err, QuizError::VocabularyNotFound(id) if id == "verbs"));
    }
}
