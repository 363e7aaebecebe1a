//! The `vocabquiz stats` command.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use comfy_table::{Cell, Table};

use vocabquiz_core::model::{DisplayStats, MasteryLevel, SortDirection, StatsSortKey};
use vocabquiz_core::statistics::{sort_stats, summarize};

pub async fn execute(
    words: Option<String>,
    sort: String,
    ascending: bool,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "table" | "json"),
        "unknown format: {format} (expected table or json)"
    );
    let key: StatsSortKey = sort.parse().map_err(|e: String| anyhow!(e))?;
    let direction = if ascending {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };

    let (config, _) = super::load(config_path)?;
    let engine = super::engine(&config, None).await?;

    let mut stats: Vec<DisplayStats> = match words {
        Some(words) => {
            let words = super::split_list(&words);
            engine.stats_for(&words).await?.into_values().collect()
        }
        None => engine.all_stats().await?,
    };
    sort_stats(&mut stats, key, direction);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    if stats.is_empty() {
        println!("No statistics recorded yet.");
        return Ok(());
    }

    println!("{}", stats_table(&stats));
    let summary = summarize(&stats);
    println!(
        "{} words, {} correct, {} mistakes, {:.1}% overall",
        summary.words_tracked, summary.total_correct, summary.total_mistakes, summary.overall_ratio
    );
    Ok(())
}

/// Render display rows as a table.
pub fn stats_table(stats: &[DisplayStats]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Word",
        "Correct",
        "Mistakes",
        "Ratio",
        "Recent Correct",
        "Recent Mistakes",
        "Recent Ratio",
        "Level",
    ]);

    for row in stats {
        table.add_row(vec![
            Cell::new(&row.word),
            Cell::new(row.correct_count),
            Cell::new(row.mistake_count),
            Cell::new(format!("{:.1}%", row.ratio)),
            Cell::new(row.recent_correct),
            Cell::new(row.recent_mistake),
            Cell::new(format!("{:.1}%", row.recent_ratio)),
            Cell::new(MasteryLevel::from_ratio(row.ratio)),
        ]);
    }
    table
}
