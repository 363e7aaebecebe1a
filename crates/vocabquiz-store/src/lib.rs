//! vocabquiz-store: persistent statistics storage.
//!
//! Implements the `StatsStore` traits on top of SQLite and loads the
//! `vocabquiz.toml` configuration that decides which store to open.

pub mod config;
pub mod error;
pub mod sqlite;

pub use config::{load_config, load_config_from, open_store, ExamDefaults, StoreConfig, VocabquizConfig};
pub use error::StoreError;
pub use sqlite::SqliteStore;
