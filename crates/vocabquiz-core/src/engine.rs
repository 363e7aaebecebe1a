//! Quiz engine orchestrator.
//!
//! Ties a [`StatsStore`] to the exam composer and the stats reporter: reads one
//! snapshot per exam, records submissions attempt by attempt, and recomputes
//! display figures afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::composer::{compose_exam, ExamParams};
use crate::error::Result;
use crate::model::{DisplayStats, Grade, Question, SubmittedResult, WordEntry};
use crate::statistics::StatsReporter;
use crate::traits::StatsStore;

/// Configuration for the quiz engine.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Fixed RNG seed. `None` seeds from the OS on every exam.
    pub seed: Option<u64>,
}

/// Outcome of recording one submitted exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    /// Number of results written.
    pub recorded: usize,
    pub correct: usize,
    pub mistakes: usize,
    /// Rounded percentage of correct answers, 0 for an empty submission.
    pub score: u32,
    pub grade: Grade,
    /// Fresh display stats for every submitted word.
    pub updated_stats: BTreeMap<String, DisplayStats>,
}

/// The adaptive quiz engine.
#[derive(Clone)]
pub struct QuizEngine {
    store: Arc<dyn StatsStore>,
    reporter: StatsReporter,
    config: EngineConfig,
}

impl QuizEngine {
    pub fn new(store: Arc<dyn StatsStore>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: Arc<dyn StatsStore>, config: EngineConfig) -> Self {
        let reporter = StatsReporter::new(Arc::clone(&store));
        Self {
            store,
            reporter,
            config,
        }
    }

    pub fn store(&self) -> &Arc<dyn StatsStore> {
        &self.store
    }

    pub fn reporter(&self) -> &StatsReporter {
        &self.reporter
    }

    /// Compose an exam from `pool`, using the configured seed if any.
    pub async fn generate_exam(
        &self,
        pool: &[WordEntry],
        params: &ExamParams,
    ) -> Result<Vec<Question>> {
        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.generate_exam_with_rng(pool, params, &mut rng).await
    }

    /// Compose an exam drawing randomness from `rng`.
    pub async fn generate_exam_with_rng<R>(
        &self,
        pool: &[WordEntry],
        params: &ExamParams,
        rng: &mut R,
    ) -> Result<Vec<Question>>
    where
        R: Rng + ?Sized + Send,
    {
        params.validate()?;
        if pool.is_empty() || params.num_questions == 0 {
            return Ok(Vec::new());
        }

        let words: Vec<String> = pool
            .iter()
            .map(|e| e.word.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let snapshot = self.store.snapshot(Some(&words)).await?;

        let exam = compose_exam(pool, &snapshot, params, rng)?;
        tracing::debug!(
            pool = pool.len(),
            distinct = words.len(),
            questions = exam.len(),
            "generated exam"
        );
        Ok(exam)
    }

    /// Record every result, then report the updated stats for those words.
    ///
    /// Each result is its own transaction; a storage failure part-way leaves
    /// the earlier results recorded.
    pub async fn submit(&self, results: &[SubmittedResult]) -> Result<SubmissionSummary> {
        let mut correct = 0usize;
        for result in results {
            self.store
                .record_attempt(&result.word, result.is_correct)
                .await?;
            if result.is_correct {
                correct += 1;
            }
        }

        let recorded = results.len();
        let mistakes = recorded - correct;
        let score = exam_score(correct, recorded);

        let words: Vec<String> = results.iter().map(|r| r.word.clone()).collect();
        let updated_stats = self.reporter.stats_for(&words).await?;

        tracing::info!(
            backend = self.store.backend(),
            recorded,
            correct,
            score,
            "recorded submission"
        );

        Ok(SubmissionSummary {
            recorded,
            correct,
            mistakes,
            score,
            grade: Grade::from_score(score),
            updated_stats,
        })
    }

    pub async fn stats_for(&self, words: &[String]) -> Result<BTreeMap<String, DisplayStats>> {
        self.reporter.stats_for(words).await
    }

    pub async fn all_stats(&self) -> Result<Vec<DisplayStats>> {
        self.reporter.all_stats().await
    }

    pub async fn reset_all(&self) -> Result<()> {
        self.reporter.reset_all().await
    }
}

/// Percentage of correct answers, rounded half up.
pub fn exam_score(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (correct as f64 / total as f64 * 100.0).round() as u32
}
