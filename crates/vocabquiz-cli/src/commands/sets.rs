//! The `vocabquiz sets` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use vocabquiz_core::traits::VocabularySource;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let (config, source) = super::load(config_path)?;
    let sets = source
        .list_sets()
        .with_context(|| format!("failed to list {}", config.data_dir.display()))?;

    if sets.is_empty() {
        println!(
            "No vocabulary sets in {}. Run `vocabquiz init` to create a sample.",
            config.data_dir.display()
        );
        return Ok(());
    }

    for set in &sets {
        println!("{set}");
    }
    Ok(())
}
