//! Display statistics: lifetime and recent ratios per word.
//!
//! Ratios are percentages rounded to one decimal and are 0 when a word has no
//! attempts in the relevant range.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{DisplayStats, RecentPerformance, SortDirection, StatsSortKey, WordAggregate};
use crate::traits::StatsStore;

/// Percentage of `correct` answers, rounded to one decimal with ties to even
/// (1 of 16 is 6.25%, reported as 6.2).
///
/// Returns 0 when there are no answers at all.
pub fn ratio(correct: u32, mistake: u32) -> f64 {
    let total = u64::from(correct) + u64::from(mistake);
    if total == 0 {
        return 0.0;
    }
    let pct = correct as f64 / total as f64 * 100.0;
    (pct * 10.0).round_ties_even() / 10.0
}

/// Merge a word's aggregate row and recency counts, defaulting either to zero.
pub fn display_stats(
    word: &str,
    aggregate: Option<&WordAggregate>,
    recent: Option<&RecentPerformance>,
) -> DisplayStats {
    let (correct_count, mistake_count) =
        aggregate.map_or((0, 0), |a| (a.correct_count, a.mistake_count));
    let recent = recent.copied().unwrap_or_default();

    DisplayStats {
        word: word.to_string(),
        correct_count,
        mistake_count,
        ratio: ratio(correct_count, mistake_count),
        recent_correct: recent.recent_correct,
        recent_mistake: recent.recent_mistake,
        recent_ratio: ratio(recent.recent_correct, recent.recent_mistake),
    }
}

/// Order display rows by `key`. Ties fall back to the word, ascending.
pub fn sort_stats(stats: &mut [DisplayStats], key: StatsSortKey, direction: SortDirection) {
    stats.sort_by(|a, b| {
        let primary = match key {
            StatsSortKey::Word => a.word.cmp(&b.word),
            StatsSortKey::CorrectCount => a.correct_count.cmp(&b.correct_count),
            StatsSortKey::MistakeCount => a.mistake_count.cmp(&b.mistake_count),
            StatsSortKey::Ratio => a.ratio.total_cmp(&b.ratio),
            StatsSortKey::RecentCorrect => a.recent_correct.cmp(&b.recent_correct),
            StatsSortKey::RecentMistake => a.recent_mistake.cmp(&b.recent_mistake),
            StatsSortKey::RecentRatio => a.recent_ratio.total_cmp(&b.recent_ratio),
        };
        let primary = match direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        if primary == Ordering::Equal {
            a.word.cmp(&b.word)
        } else {
            primary
        }
    });
}

/// Totals across a set of display rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub words_tracked: usize,
    pub total_correct: u64,
    pub total_mistakes: u64,
    /// Overall percentage correct across every attempt.
    pub overall_ratio: f64,
}

/// Summarize display rows into overall totals.
pub fn summarize(stats: &[DisplayStats]) -> StatsSummary {
    let total_correct: u64 = stats.iter().map(|s| u64::from(s.correct_count)).sum();
    let total_mistakes: u64 = stats.iter().map(|s| u64::from(s.mistake_count)).sum();
    let total = total_correct + total_mistakes;
    let overall_ratio = if total == 0 {
        0.0
    } else {
        (total_correct as f64 / total as f64 * 1000.0).round() / 10.0
    };

    StatsSummary {
        words_tracked: stats.len(),
        total_correct,
        total_mistakes,
        overall_ratio,
    }
}

/// Turns store contents into display rows.
#[derive(Clone)]
pub struct StatsReporter {
    store: Arc<dyn StatsStore>,
}

impl StatsReporter {
    pub fn new(store: Arc<dyn StatsStore>) -> Self {
        Self { store }
    }

    /// Display rows for `words`, one per distinct word.
    ///
    /// Words that were never attempted get all-zero rows.
    pub async fn stats_for(&self, words: &[String]) -> Result<BTreeMap<String, DisplayStats>> {
        let unique: Vec<String> = words
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if unique.is_empty() {
            return Ok(BTreeMap::new());
        }

        let snapshot = self.store.snapshot(Some(&unique)).await?;
        Ok(unique
            .into_iter()
            .map(|word| {
                let stats = display_stats(
                    &word,
                    snapshot.aggregate(&word),
                    snapshot.recent.get(&word),
                );
                (word, stats)
            })
            .collect())
    }

    /// Display rows for every word with an aggregate row, ordered by word.
    pub async fn all_stats(&self) -> Result<Vec<DisplayStats>> {
        let snapshot = self.store.snapshot(None).await?;
        Ok(snapshot
            .aggregates
            .iter()
            .map(|a| display_stats(&a.word, Some(a), snapshot.recent.get(&a.word)))
            .collect())
    }

    /// Clear the attempt log and the aggregates together.
    pub async fn reset_all(&self) -> Result<()> {
        self.store.reset_all().await?;
        tracing::info!(backend = self.store.backend(), "statistics reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::memory::MemoryStore;
    use crate::traits::AttemptLog;

    fn row(word: &str, correct: u32, mistake: u32, recent_ratio: f64) -> DisplayStats {
        DisplayStats {
            word: word.into(),
            correct_count: correct,
            mistake_count: mistake,
            ratio: ratio(correct, mistake),
            recent_correct: 0,
            recent_mistake: 0,
            recent_ratio,
        }
    }

    #[test]
    fn ratio_rounding() {
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(0, 3), 0.0);
        assert_eq!(ratio(3, 0), 100.0);
        assert_eq!(ratio(1, 2), 33.3);
        assert_eq!(ratio(2, 1), 66.7);
        assert_eq!(ratio(1, 15), 6.2);
        assert_eq!(ratio(3, 13), 18.8);
        assert_eq!(ratio(1, 7), 12.5);
        assert_eq!(ratio(5, 3), 62.5);
    }

    #[test]
    fn display_defaults_to_zero() {
        let stats = display_stats("ghost", None, None);
        assert_eq!(stats.correct_count, 0);
        assert_eq!(stats.mistake_count, 0);
        assert_eq!(stats.ratio, 0.0);
        assert_eq!(stats.recent_ratio, 0.0);
    }

    #[test]
    fn display_merges_both_sources() {
        let aggregate = WordAggregate {
            word: "apple".into(),
            correct_count: 30,
            mistake_count: 10,
            last_review_time: Utc::now(),
        };
        let recent = RecentPerformance {
            recent_correct: 15,
            recent_mistake: 5,
        };
        let stats = display_stats("apple", Some(&aggregate), Some(&recent));
        assert_eq!(stats.ratio, 75.0);
        assert_eq!(stats.recent_correct, 15);
        assert_eq!(stats.recent_ratio, 75.0);
    }

    #[test]
    fn sort_by_ratio_descending_then_word() {
        let mut stats = vec![
            row("b", 1, 1, 0.0),
            row("c", 3, 0, 0.0),
            row("a", 2, 2, 0.0),
        ];
        sort_stats(&mut stats, StatsSortKey::Ratio, SortDirection::Descending);
        let order: Vec<&str> = stats.iter().map(|s| s.word.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn sort_ascending_by_recent_ratio() {
        let mut stats = vec![row("x", 0, 0, 90.0), row("y", 0, 0, 10.0)];
        sort_stats(&mut stats, StatsSortKey::RecentRatio, SortDirection::Ascending);
        assert_eq!(stats[0].word, "y");
    }

    #[test]
    fn summary_totals() {
        let summary = summarize(&[row("a", 3, 1, 0.0), row("b", 0, 4, 0.0)]);
        assert_eq!(summary.words_tracked, 2);
        assert_eq!(summary.total_correct, 3);
        assert_eq!(summary.total_mistakes, 5);
        assert_eq!(summary.overall_ratio, 37.5);
        assert_eq!(summarize(&[]).overall_ratio, 0.0);
    }

    #[tokio::test]
    async fn stats_for_collapses_duplicates_and_defaults() {
        let store = Arc::new(MemoryStore::new());
        store.record_attempt("apple", false).await.unwrap();
        store.record_attempt("apple", true).await.unwrap();
        let reporter = StatsReporter::new(store);

        let stats = reporter
            .stats_for(&["apple".into(), "apple".into(), "kiwi".into()])
            .await
            .unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats["apple"].ratio, 50.0);
        assert_eq!(stats["apple"].recent_mistake, 1);
        assert_eq!(stats["kiwi"], display_stats("kiwi", None, None));
    }

    #[tokio::test]
    async fn reset_then_everything_empty() {
        let store = Arc::new(MemoryStore::new());
        store.record_attempt("apple", true).await.unwrap();
        let reporter = StatsReporter::new(store.clone());

        reporter.reset_all().await.unwrap();
        assert!(reporter.all_stats().await.unwrap().is_empty());
        assert!(store.recent_performance(None).await.unwrap().is_empty());
    }
}
