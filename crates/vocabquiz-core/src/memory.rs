//! In-memory store for tests and throwaway sessions.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::model::{AttemptRecord, WordAggregate};
use crate::recency::tally_recent;
use crate::traits::{AggregateStore, AttemptLog, RecencyStats, StatsSnapshot, StatsStore};

#[derive(Debug, Default)]
struct MemoryState {
    attempts: Vec<AttemptRecord>,
    aggregates: BTreeMap<String, WordAggregate>,
    next_sequence: i64,
    last_timestamp: Option<DateTime<Utc>>,
}

impl MemoryState {
    /// Current time, never earlier than the newest stored attempt.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamped = match self.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_timestamp = Some(stamped);
        stamped
    }

    fn append(&mut self, word: &str, is_correct: bool, at: DateTime<Utc>) -> AttemptRecord {
        self.next_sequence += 1;
        let record = AttemptRecord {
            sequence_id: self.next_sequence,
            word: word.to_string(),
            is_correct,
            timestamp: at,
        };
        self.attempts.push(record.clone());
        record
    }

    fn bump(&mut self, word: &str, is_correct: bool, at: DateTime<Utc>) -> WordAggregate {
        let row = self
            .aggregates
            .entry(word.to_string())
            .or_insert_with(|| WordAggregate {
                word: word.to_string(),
                correct_count: 0,
                mistake_count: 0,
                last_review_time: at,
            });
        if is_correct {
            row.correct_count = row.correct_count.saturating_add(1);
        } else {
            row.mistake_count = row.mistake_count.saturating_add(1);
        }
        row.last_review_time = at;
        row.clone()
    }

    fn aggregates_in(&self, words: Option<&[String]>) -> Vec<WordAggregate> {
        match words {
            None => self.aggregates.values().cloned().collect(),
            Some(words) => {
                let mut rows: Vec<WordAggregate> = words
                    .iter()
                    .filter_map(|w| self.aggregates.get(w).cloned())
                    .collect();
                rows.sort_by(|a, b| a.word.cmp(&b.word));
                rows.dedup_by(|a, b| a.word == b.word);
                rows
            }
        }
    }
}

/// A [`StatsStore`] that keeps everything in process memory.
///
/// Every operation takes one lock, so each call is atomic with respect to the
/// others.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attempts currently in the log.
    pub async fn attempt_count(&self) -> usize {
        self.state.lock().await.attempts.len()
    }
}

#[async_trait]
impl AttemptLog for MemoryStore {
    async fn append(&self, word: &str, is_correct: bool) -> Result<AttemptRecord> {
        let mut state = self.state.lock().await;
        let at = state.tick();
        Ok(state.append(word, is_correct, at))
    }

    async fn recent_performance(&self, words: Option<&[String]>) -> Result<RecencyStats> {
        let state = self.state.lock().await;
        Ok(tally_recent(&state.attempts, words))
    }

    async fn reset_log(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.attempts.clear();
        Ok(())
    }
}

#[async_trait]
impl AggregateStore for MemoryStore {
    async fn record_result(&self, word: &str, is_correct: bool) -> Result<WordAggregate> {
        let mut state = self.state.lock().await;
        let at = state.tick();
        Ok(state.bump(word, is_correct, at))
    }

    async fn aggregates_for(&self, words: &[String]) -> Result<HashMap<String, WordAggregate>> {
        let state = self.state.lock().await;
        Ok(state
            .aggregates_in(Some(words))
            .into_iter()
            .map(|a| (a.word.clone(), a))
            .collect())
    }

    async fn all_aggregates(&self) -> Result<Vec<WordAggregate>> {
        let state = self.state.lock().await;
        Ok(state.aggregates_in(None))
    }

    async fn reset_aggregates(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.aggregates.clear();
        Ok(())
    }
}

#[async_trait]
impl StatsStore for MemoryStore {
    fn backend(&self) -> &str {
        "memory"
    }

    async fn record_attempt(&self, word: &str, is_correct: bool) -> Result<WordAggregate> {
        let mut state = self.state.lock().await;
        let at = state.tick();
        state.append(word, is_correct, at);
        Ok(state.bump(word, is_correct, at))
    }

    async fn snapshot(&self, words: Option<&[String]>) -> Result<StatsSnapshot> {
        let state = self.state.lock().await;
        Ok(StatsSnapshot {
            aggregates: state.aggregates_in(words),
            recent: tally_recent(&state.attempts, words),
        })
    }

    async fn reset_all(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.attempts.clear();
        state.aggregates.clear();
        Ok(())
    }
}
