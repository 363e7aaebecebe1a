//! Subcommand implementations.

use std::path::PathBuf;

use anyhow::Result;

use vocabquiz_core::engine::{EngineConfig, QuizEngine};
use vocabquiz_core::traits::StatsStore;
use vocabquiz_sources::CsvDirectorySource;
use vocabquiz_store::{load_config_from, open_store, VocabquizConfig};

pub mod exam;
pub mod init;
pub mod reset;
pub mod sets;
pub mod stats;
pub mod submit;
pub mod words;

/// Split a comma-separated argument, dropping blank entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Configuration plus the vocabulary source it points at.
pub fn load(config_path: Option<PathBuf>) -> Result<(VocabquizConfig, CsvDirectorySource)> {
    let config = load_config_from(config_path.as_deref())?;
    let source = CsvDirectorySource::new(config.data_dir.clone());
    Ok((config, source))
}

/// Open the configured store and wrap it in an engine.
pub async fn engine(config: &VocabquizConfig, seed: Option<u64>) -> Result<QuizEngine> {
    let store = open_store(&config.store).await?;
    tracing::debug!(backend = store.backend(), ?seed, "opened stats store");
    Ok(QuizEngine::with_config(store, EngineConfig { seed }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_drops_blanks() {
        assert_eq!(split_list(" a.csv, ,b.csv,"), vec!["a.csv", "b.csv"]);
        assert!(split_list("").is_empty());
    }
}
