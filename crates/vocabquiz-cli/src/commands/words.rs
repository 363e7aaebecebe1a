//! The `vocabquiz words` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use vocabquiz_core::traits::load_pool;

pub fn execute(set: String, config_path: Option<PathBuf>) -> Result<()> {
    let ids = super::split_list(&set);
    anyhow::ensure!(!ids.is_empty(), "at least one vocabulary set is required");

    let (_, source) = super::load(config_path)?;
    let pool = load_pool(&source, &ids).context("failed to load vocabulary")?;

    let mut table = Table::new();
    table.set_header(vec!["Word", "Translation"]);
    for entry in &pool {
        table.add_row(vec![Cell::new(&entry.word), Cell::new(&entry.translation)]);
    }

    println!("{table}");
    println!("{} words", pool.len());
    Ok(())
}
