//! Exam composition.
//!
//! Splits the pool into new and review words, samples targets (uniformly for
//! new words, weighted by recent mistakes for review words, both with
//! replacement) and wraps each target in a multiple-choice question.

use std::collections::{HashMap, HashSet};

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};
use crate::model::{Question, WordEntry};
use crate::traits::StatsSnapshot;

/// Maximum number of wrong options per question.
pub const MAX_DISTRACTORS: usize = 3;

/// Tunable exam parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamParams {
    /// How many questions to emit.
    pub num_questions: usize,
    /// Share of questions reserved for never-attempted words, in `[0, 1]`.
    pub new_ratio: f64,
    /// Extra weight per recent mistake for review words, `>= 0`.
    pub mistake_weight: f64,
}

impl Default for ExamParams {
    fn default() -> Self {
        Self {
            num_questions: 10,
            new_ratio: 0.2,
            mistake_weight: 5.0,
        }
    }
}

impl ExamParams {
    /// Build parameters from the percentage form used at the boundary
    /// (`new_ratio_percent` in `[0, 100]`).
    pub fn from_percent(
        num_questions: usize,
        new_ratio_percent: f64,
        mistake_weight: f64,
    ) -> Result<Self> {
        if !new_ratio_percent.is_finite() || !(0.0..=100.0).contains(&new_ratio_percent) {
            return Err(QuizError::invalid(
                "new_ratio",
                format!("must be a percentage within [0, 100], got {new_ratio_percent}"),
            ));
        }
        let params = Self {
            num_questions,
            new_ratio: new_ratio_percent / 100.0,
            mistake_weight,
        };
        params.validate()?;
        Ok(params)
    }

    /// Reject out-of-range values instead of clamping them.
    pub fn validate(&self) -> Result<()> {
        if !self.new_ratio.is_finite() || !(0.0..=1.0).contains(&self.new_ratio) {
            return Err(QuizError::invalid(
                "new_ratio",
                format!("must be within [0, 1], got {}", self.new_ratio),
            ));
        }
        if !self.mistake_weight.is_finite() || self.mistake_weight < 0.0 {
            return Err(QuizError::invalid(
                "mistake_weight",
                format!("must be a finite value >= 0, got {}", self.mistake_weight),
            ));
        }
        Ok(())
    }

    /// Number of slots reserved for new words.
    pub fn target_new_count(&self) -> usize {
        (self.num_questions as f64 * self.new_ratio).floor() as usize
    }
}

/// Selection weight `1 + recent_mistakes * mistake_weight`, divided through
/// by `max(1, mistake_weight)` so it stays finite for any finite weight.
fn review_weight(recent_mistakes: u32, mistake_weight: f64) -> f64 {
    let scale = mistake_weight.max(1.0);
    1.0 / scale + f64::from(recent_mistakes) * (mistake_weight / scale)
}

/// Rescale so the largest weight is 1. Proportions are unchanged and the
/// total is bounded by the number of weights.
fn normalize_weights(weights: &mut [f64]) {
    let max = weights.iter().copied().fold(0.0, f64::max);
    if max > 0.0 {
        for w in weights.iter_mut() {
            *w /= max;
        }
    }
}

/// Compose an exam from `pool` using the stats in `snapshot`.
///
/// The result has exactly `num_questions` entries when the pool is non-empty
/// and none otherwise. Targets may repeat.
pub fn compose_exam<R>(
    pool: &[WordEntry],
    snapshot: &StatsSnapshot,
    params: &ExamParams,
    rng: &mut R,
) -> Result<Vec<Question>>
where
    R: Rng + ?Sized,
{
    params.validate()?;
    if pool.is_empty() || params.num_questions == 0 {
        return Ok(Vec::new());
    }

    let attempted: HashMap<&str, u32> = snapshot
        .aggregates
        .iter()
        .map(|a| (a.word.as_str(), a.total_attempts()))
        .collect();

    let mut new_words = Vec::new();
    let mut review_words = Vec::new();
    let mut review_weights = Vec::new();
    for entry in pool {
        let lifetime = attempted.get(entry.word.as_str()).copied().unwrap_or(0);
        if lifetime == 0 {
            new_words.push(entry);
        } else {
            let recent_mistakes = snapshot
                .recent
                .get(&entry.word)
                .map_or(0, |p| p.recent_mistake);
            review_words.push(entry);
            review_weights.push(review_weight(recent_mistakes, params.mistake_weight));
        }
    }
    normalize_weights(&mut review_weights);

    let review_index = if review_words.is_empty() {
        None
    } else {
        Some(WeightedIndex::new(&review_weights).map_err(|e| {
            QuizError::invalid("mistake_weight", format!("cannot weight review words: {e}"))
        })?)
    };

    let target_new = params.target_new_count();
    tracing::debug!(
        new = new_words.len(),
        review = review_words.len(),
        target_new,
        "classified exam pool"
    );

    let mut targets: Vec<(&WordEntry, bool)> = Vec::with_capacity(params.num_questions);
    let mut new_picks = 0usize;
    for _ in 0..params.num_questions {
        let prefer_new = !new_words.is_empty() && (review_words.is_empty() || new_picks < target_new);
        match &review_index {
            Some(index) if !prefer_new => {
                targets.push((review_words[index.sample(rng)], false));
            }
            _ => {
                // Only reachable with a non-empty new pool: the pool is
                // non-empty, so an empty review pool implies new words exist.
                let picked = new_words[rng.gen_range(0..new_words.len())];
                new_picks += 1;
                targets.push((picked, true));
            }
        }
    }

    Ok(targets
        .into_iter()
        .map(|(target, is_new)| build_question(target, is_new, pool, rng))
        .collect())
}

/// Wrap `target` with up to [`MAX_DISTRACTORS`] distinct wrong options.
fn build_question<R>(target: &WordEntry, is_new: bool, pool: &[WordEntry], rng: &mut R) -> Question
where
    R: Rng + ?Sized,
{
    let mut seen = HashSet::new();
    let candidates: Vec<&WordEntry> = pool
        .iter()
        .filter(|e| e.word != target.word)
        .filter(|e| seen.insert(*e))
        .collect();

    let mut options = Vec::with_capacity(MAX_DISTRACTORS + 1);
    options.push(target.clone());
    options.extend(
        candidates
            .choose_multiple(rng, MAX_DISTRACTORS)
            .map(|e| WordEntry::clone(e)),
    );
    options.shuffle(rng);

    Question {
        word: target.word.clone(),
        correct_translation: target.translation.clone(),
        options,
        is_new,
    }
}
