//! vocabquiz-core: adaptive exam composition and per-word statistics.
//!
//! This crate defines the data model, the store and vocabulary-source traits,
//! the recency window, the exam composer and the stats reporter that the rest
//! of vocabquiz builds on. Storage backends and vocabulary sources live in
//! their own crates and are injected through the traits here.

pub mod composer;
pub mod engine;
pub mod error;
pub mod memory;
pub mod model;
pub mod recency;
pub mod statistics;
pub mod traits;

pub use composer::{compose_exam, ExamParams};
pub use engine::{EngineConfig, QuizEngine, SubmissionSummary};
pub use error::{QuizError, Result};
pub use memory::MemoryStore;
pub use model::*;
pub use statistics::StatsReporter;
pub use traits::{
    load_pool, AggregateStore, AttemptLog, RecencyStats, StatsSnapshot, StatsStore,
    VocabularySource,
};
