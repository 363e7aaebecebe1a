//! SQLite-backed statistics store.
//!
//! Two tables: `exam_attempts` is the append-only attempt log and `word_stats`
//! holds one counter row per word. Timestamps are stored as microseconds since
//! the Unix epoch. Every write runs in a `BEGIN IMMEDIATE` transaction and
//! every multi-table read runs in a single read transaction.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use tokio::sync::Mutex;

use vocabquiz_core::error::Result;
use vocabquiz_core::model::{AttemptRecord, RecentPerformance, WordAggregate};
use vocabquiz_core::recency::RECENT_WINDOW;
use vocabquiz_core::traits::{AggregateStore, AttemptLog, RecencyStats, StatsSnapshot, StatsStore};

use crate::error::{StoreError, StoreResult};

/// Upper bound on bound parameters per statement when filtering by word.
const MAX_BOUND_WORDS: usize = 500;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS word_stats (
        word TEXT PRIMARY KEY,
        correct_count INTEGER NOT NULL DEFAULT 0,
        mistake_count INTEGER NOT NULL DEFAULT 0,
        last_review_time INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS exam_attempts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        word TEXT NOT NULL,
        is_correct INTEGER NOT NULL,
        timestamp INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_exam_attempts_word_recent
        ON exam_attempts(word, timestamp DESC, id DESC);
"#;

const UPSERT_AGGREGATE: &str = r#"
    INSERT INTO word_stats (word, correct_count, mistake_count, last_review_time)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(word) DO UPDATE SET
        correct_count = correct_count + excluded.correct_count,
        mistake_count = mistake_count + excluded.mistake_count,
        last_review_time = excluded.last_review_time
    RETURNING word, correct_count, mistake_count, last_review_time
"#;

/// A [`StatsStore`] persisted in a SQLite database.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    location: String,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    ///
    /// The parent directory is created if missing. `busy_timeout` bounds how
    /// long a write waits for another process holding the database lock.
    pub async fn open<P: AsRef<Path>>(path: P, busy_timeout: Duration) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let conn = Connection::open(&path)?;
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        Self::init_schema(&conn)?;

        tracing::info!(path = %path.display(), "opened sqlite store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location: path.display().to_string(),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location: ":memory:".to_string(),
        })
    }

    fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(SCHEMA)
    }

    /// Where the database lives (`:memory:` for in-memory stores).
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Number of rows in the attempt log.
    pub async fn attempt_count(&self) -> StoreResult<u64> {
        let conn = self.conn.lock().await;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM exam_attempts", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

// ---------------------------------------------------------------------------
// Statement helpers. All of them run on a connection or an open transaction.
// ---------------------------------------------------------------------------

/// Current time in micros, clamped so it never precedes a stored timestamp.
fn next_timestamp(conn: &Connection) -> StoreResult<i64> {
    let now = Utc::now().timestamp_micros();
    let latest: Option<i64> = conn.query_row(
        "SELECT MAX(m) FROM (
            SELECT MAX(timestamp) AS m FROM exam_attempts
            UNION ALL
            SELECT MAX(last_review_time) FROM word_stats
        )",
        [],
        |row| row.get(0),
    )?;
    Ok(latest.map_or(now, |latest| latest.max(now)))
}

fn to_time(micros: i64) -> StoreResult<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros).ok_or(StoreError::TimestampOutOfRange(micros))
}

fn insert_attempt(
    conn: &Connection,
    word: &str,
    is_correct: bool,
    at: i64,
) -> StoreResult<AttemptRecord> {
    conn.execute(
        "INSERT INTO exam_attempts (word, is_correct, timestamp) VALUES (?1, ?2, ?3)",
        params![word, is_correct, at],
    )?;
    Ok(AttemptRecord {
        sequence_id: conn.last_insert_rowid(),
        word: word.to_string(),
        is_correct,
        timestamp: to_time(at)?,
    })
}

fn upsert_aggregate(
    conn: &Connection,
    word: &str,
    is_correct: bool,
    at: i64,
) -> StoreResult<WordAggregate> {
    let (correct, mistake) = if is_correct { (1u32, 0u32) } else { (0, 1) };
    let (word, correct_count, mistake_count, micros) = conn.query_row(
        UPSERT_AGGREGATE,
        params![word, correct, mistake, at],
        aggregate_columns,
    )?;
    Ok(WordAggregate {
        word,
        correct_count,
        mistake_count,
        last_review_time: to_time(micros)?,
    })
}

type AggregateColumns = (String, u32, u32, i64);

fn aggregate_columns(row: &Row<'_>) -> rusqlite::Result<AggregateColumns> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Aggregate rows for `words` (or all rows), ordered by word.
fn select_aggregates(conn: &Connection, words: Option<&[String]>) -> StoreResult<Vec<WordAggregate>> {
    let mut raw: Vec<AggregateColumns> = Vec::new();
    match words {
        None => {
            let mut stmt = conn.prepare(
                "SELECT word, correct_count, mistake_count, last_review_time
                 FROM word_stats ORDER BY word",
            )?;
            let rows = stmt.query_map([], aggregate_columns)?;
            for row in rows {
                raw.push(row?);
            }
        }
        Some(words) => {
            for chunk in words.chunks(MAX_BOUND_WORDS) {
                let sql = format!(
                    "SELECT word, correct_count, mistake_count, last_review_time
                     FROM word_stats WHERE word IN ({})",
                    placeholders(chunk.len())
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params_from_iter(chunk.iter()), aggregate_columns)?;
                for row in rows {
                    raw.push(row?);
                }
            }
            raw.sort_by(|a, b| a.0.cmp(&b.0));
            raw.dedup_by(|a, b| a.0 == b.0);
        }
    }

    raw.into_iter()
        .map(|(word, correct_count, mistake_count, micros)| {
            Ok(WordAggregate {
                word,
                correct_count,
                mistake_count,
                last_review_time: to_time(micros)?,
            })
        })
        .collect()
}

/// Window query over each word's most recent attempts.
fn recency_sql(filter_len: Option<usize>) -> String {
    let filter = filter_len
        .map(|n| format!("WHERE word IN ({})", placeholders(n)))
        .unwrap_or_default();
    format!(
        "SELECT word, SUM(is_correct), COUNT(*) - SUM(is_correct)
         FROM (
             SELECT word, is_correct,
                    ROW_NUMBER() OVER (
                        PARTITION BY word ORDER BY timestamp DESC, id DESC
                    ) AS rn
             FROM exam_attempts
             {filter}
         )
         WHERE rn <= {RECENT_WINDOW}
         GROUP BY word"
    )
}

fn select_recent(
    conn: &Connection,
    words: Option<&[String]>,
) -> StoreResult<RecencyStats> {
    let mut stats = RecencyStats::new();
    let mut collect = |sql: &str, bound: &[String]| -> StoreResult<()> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(bound.iter()), |row| {
            Ok((
                row.get::<_, String>(0)?,
                RecentPerformance {
                    recent_correct: row.get(1)?,
                    recent_mistake: row.get(2)?,
                },
            ))
        })?;
        for row in rows {
            let (word, perf) = row?;
            stats.insert(word, perf);
        }
        Ok(())
    };

    match words {
        None => collect(&recency_sql(None), &[])?,
        Some(words) => {
            for chunk in words.chunks(MAX_BOUND_WORDS) {
                collect(&recency_sql(Some(chunk.len())), chunk)?;
            }
        }
    }

    tracing::debug!(
        scoped = words.map(<[String]>::len),
        words = stats.len(),
        "queried recency window"
    );
    Ok(stats)
}

// ---------------------------------------------------------------------------
// Trait implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl AttemptLog for SqliteStore {
    async fn append(&self, word: &str, is_correct: bool) -> Result<AttemptRecord> {
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;
        let at = next_timestamp(&tx)?;
        let record = insert_attempt(&tx, word, is_correct, at)?;
        tx.commit().map_err(StoreError::from)?;
        Ok(record)
    }

    async fn recent_performance(&self, words: Option<&[String]>) -> Result<RecencyStats> {
        let conn = self.conn.lock().await;
        Ok(select_recent(&conn, words)?)
    }

    async fn reset_log(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM exam_attempts", [])
            .map_err(StoreError::from)?;
        Ok(())
    }
}

#[async_trait]
impl AggregateStore for SqliteStore {
    async fn record_result(&self, word: &str, is_correct: bool) -> Result<WordAggregate> {
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;
        let at = next_timestamp(&tx)?;
        let aggregate = upsert_aggregate(&tx, word, is_correct, at)?;
        tx.commit().map_err(StoreError::from)?;
        Ok(aggregate)
    }

    async fn aggregates_for(&self, words: &[String]) -> Result<HashMap<String, WordAggregate>> {
        let conn = self.conn.lock().await;
        Ok(select_aggregates(&conn, Some(words))?
            .into_iter()
            .map(|a| (a.word.clone(), a))
            .collect())
    }

    async fn all_aggregates(&self) -> Result<Vec<WordAggregate>> {
        let conn = self.conn.lock().await;
        Ok(select_aggregates(&conn, None)?)
    }

    async fn reset_aggregates(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM word_stats", [])
            .map_err(StoreError::from)?;
        Ok(())
    }
}

#[async_trait]
impl StatsStore for SqliteStore {
    fn backend(&self) -> &str {
        "sqlite"
    }

    async fn record_attempt(&self, word: &str, is_correct: bool) -> Result<WordAggregate> {
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;
        let at = next_timestamp(&tx)?;
        insert_attempt(&tx, word, is_correct, at)?;
        let aggregate = upsert_aggregate(&tx, word, is_correct, at)?;
        tx.commit().map_err(StoreError::from)?;
        Ok(aggregate)
    }

    async fn snapshot(&self, words: Option<&[String]>) -> Result<StatsSnapshot> {
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Deferred)
            .map_err(StoreError::from)?;
        let aggregates = select_aggregates(&tx, words)?;
        let recent = select_recent(&tx, words)?;
        tx.commit().map_err(StoreError::from)?;
        Ok(StatsSnapshot { aggregates, recent })
    }

    async fn reset_all(&self) -> Result<()> {
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;
        tx.execute_batch("DELETE FROM exam_attempts; DELETE FROM word_stats;")
            .map_err(StoreError::from)?;
        tx.commit().map_err(StoreError::from)?;
        tracing::info!(location = %self.location, "cleared attempt log and aggregates");
        Ok(())
    }
}
