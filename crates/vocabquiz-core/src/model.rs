//! Core data model types for vocabquiz.
//!
//! These are the shapes that flow between the vocabulary source, the stores,
//! the exam composer and the reporting layer.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single vocabulary item supplied by a vocabulary source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordEntry {
    /// The word being learned.
    pub word: String,
    /// Its translation (what the learner has to pick).
    pub translation: String,
}

impl WordEntry {
    pub fn new(word: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            translation: translation.into(),
        }
    }
}

/// One answered question, as stored in the attempt log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Monotonic identifier, used to break timestamp ties.
    pub sequence_id: i64,
    pub word: String,
    pub is_correct: bool,
    pub timestamp: DateTime<Utc>,
}

/// Lifetime counters for a single word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordAggregate {
    pub word: String,
    pub correct_count: u32,
    pub mistake_count: u32,
    pub last_review_time: DateTime<Utc>,
}

impl WordAggregate {
    /// Total number of recorded attempts.
    pub fn total_attempts(&self) -> u32 {
        self.correct_count.saturating_add(self.mistake_count)
    }
}

/// Outcome counts within a word's recency window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentPerformance {
    pub recent_correct: u32,
    pub recent_mistake: u32,
}

impl RecentPerformance {
    pub fn total(&self) -> u32 {
        self.recent_correct + self.recent_mistake
    }
}

/// Merged lifetime and recent figures for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayStats {
    pub word: String,
    pub correct_count: u32,
    pub mistake_count: u32,
    /// Lifetime percentage correct, one decimal, 0 when never attempted.
    pub ratio: f64,
    pub recent_correct: u32,
    pub recent_mistake: u32,
    /// Percentage correct within the recency window.
    pub recent_ratio: f64,
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// The word being tested.
    pub word: String,
    /// The translation the learner must choose.
    pub correct_translation: String,
    /// Options in presentation order. Exactly one carries `word`.
    pub options: Vec<WordEntry>,
    /// Whether the word had never been attempted when the exam was composed.
    #[serde(default)]
    pub is_new: bool,
}

impl Question {
    /// Grade a chosen option.
    pub fn is_correct_choice(&self, choice: &WordEntry) -> bool {
        choice.translation == self.correct_translation
    }

    /// Index of the correct option within `options`.
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o.word == self.word)
    }
}

/// A learner's answer to one question, as submitted for recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedResult {
    pub word: String,
    pub is_correct: bool,
}

impl SubmittedResult {
    pub fn new(word: impl Into<String>, is_correct: bool) -> Self {
        Self {
            word: word.into(),
            is_correct,
        }
    }
}

/// Coarse verdict on a submitted exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Excellent,
    Good,
    KeepTrying,
}

impl Grade {
    /// Band an exam score (0–100).
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => Grade::Excellent,
            60..=79 => Grade::Good,
            _ => Grade::KeepTrying,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Excellent => write!(f, "Excellent!"),
            Grade::Good => write!(f, "Good job"),
            Grade::KeepTrying => write!(f, "Keep trying"),
        }
    }
}

/// Per-word mastery band derived from a ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryLevel {
    Strong,
    Fair,
    Weak,
}

impl MasteryLevel {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 80.0 {
            MasteryLevel::Strong
        } else if ratio >= 50.0 {
            MasteryLevel::Fair
        } else {
            MasteryLevel::Weak
        }
    }
}

impl fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MasteryLevel::Strong => write!(f, "strong"),
            MasteryLevel::Fair => write!(f, "fair"),
            MasteryLevel::Weak => write!(f, "weak"),
        }
    }
}

/// Column used to order display statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsSortKey {
    Word,
    #[default]
    CorrectCount,
    MistakeCount,
    Ratio,
    RecentCorrect,
    RecentMistake,
    RecentRatio,
}

impl fmt::Display for StatsSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatsSortKey::Word => "word",
            StatsSortKey::CorrectCount => "correct_count",
            StatsSortKey::MistakeCount => "mistake_count",
            StatsSortKey::Ratio => "ratio",
            StatsSortKey::RecentCorrect => "recent_correct",
            StatsSortKey::RecentMistake => "recent_mistake",
            StatsSortKey::RecentRatio => "recent_ratio",
        };
        f.write_str(name)
    }
}

impl FromStr for StatsSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "word" => Ok(StatsSortKey::Word),
            "correct_count" | "correct" => Ok(StatsSortKey::CorrectCount),
            "mistake_count" | "mistakes" => Ok(StatsSortKey::MistakeCount),
            "ratio" => Ok(StatsSortKey::Ratio),
            "recent_correct" => Ok(StatsSortKey::RecentCorrect),
            "recent_mistake" | "recent_mistakes" => Ok(StatsSortKey::RecentMistake),
            "recent_ratio" => Ok(StatsSortKey::RecentRatio),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

/// Sort direction for [`StatsSortKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_display_and_parse() {
        assert_eq!(StatsSortKey::RecentRatio.to_string(), "recent_ratio");
        assert_eq!(
            "recent-ratio".parse::<StatsSortKey>().unwrap(),
            StatsSortKey::RecentRatio
        );
        assert_eq!(
            "Mistakes".parse::<StatsSortKey>().unwrap(),
            StatsSortKey::MistakeCount
        );
        assert!("streak".parse::<StatsSortKey>().is_err());
        assert_eq!(StatsSortKey::default(), StatsSortKey::CorrectCount);
    }

    #[test]
    fn grade_bands() {
        assert_eq!(Grade::from_score(100), Grade::Excellent);
        assert_eq!(Grade::from_score(80), Grade::Excellent);
        assert_eq!(Grade::from_score(79), Grade::Good);
        assert_eq!(Grade::from_score(60), Grade::Good);
        assert_eq!(Grade::from_score(59), Grade::KeepTrying);
        assert_eq!(Grade::from_score(0), Grade::KeepTrying);
    }

    #[test]
    fn mastery_bands() {
        assert_eq!(MasteryLevel::from_ratio(80.0), MasteryLevel::Strong);
        assert_eq!(MasteryLevel::from_ratio(50.0), MasteryLevel::Fair);
        assert_eq!(MasteryLevel::from_ratio(49.9), MasteryLevel::Weak);
    }

    #[test]
    fn question_grading() {
        let q = Question {
            word: "apple".into(),
            correct_translation: "蘋果".into(),
            options: vec![WordEntry::new("banana", "香蕉"), WordEntry::new("apple", "蘋果")],
            is_new: true,
        };
        assert!(q.is_correct_choice(&WordEntry::new("apple", "蘋果")));
        assert!(!q.is_correct_choice(&WordEntry::new("banana", "香蕉")));
        assert_eq!(q.correct_index(), Some(1));
    }

    #[test]
    fn question_deserializes_without_is_new() {
        let json = r#"{"word":"a","correct_translation":"b","options":[{"word":"a","translation":"b"}]}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert!(!q.is_new);
        assert_eq!(q.options.len(), 1);
    }
}
