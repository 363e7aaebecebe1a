//! The `vocabquiz submit` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use vocabquiz_core::engine::SubmissionSummary;
use vocabquiz_core::model::SubmittedResult;

pub async fn execute(results_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let content = std::fs::read_to_string(&results_path)
        .with_context(|| format!("failed to read results: {}", results_path.display()))?;
    let results: Vec<SubmittedResult> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse results: {}", results_path.display()))?;
    anyhow::ensure!(!results.is_empty(), "results are required");

    let (config, _) = super::load(config_path)?;
    let engine = super::engine(&config, None).await?;
    let summary = engine.submit(&results).await?;

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &SubmissionSummary) {
    println!(
        "Recorded {} results: {} correct, {} mistakes",
        summary.recorded, summary.correct, summary.mistakes
    );
    println!("Score: {}% ({})", summary.score, summary.grade);

    let rows: Vec<_> = summary.updated_stats.values().cloned().collect();
    println!("\n{}", super::stats::stats_table(&rows));
}
