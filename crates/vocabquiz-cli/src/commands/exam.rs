//! The `vocabquiz exam` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vocabquiz_core::composer::ExamParams;
use vocabquiz_core::model::Question;
use vocabquiz_core::traits::load_pool;

/// Arguments for `vocabquiz exam`. Unset numbers fall back to `[exam]` config.
pub struct ExamArgs {
    pub sets: String,
    pub num_questions: Option<usize>,
    pub new_ratio: Option<f64>,
    pub mistake_weight: Option<f64>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
    pub format: String,
}

/// A generated exam as saved to disk.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExamSheet {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub sets: Vec<String>,
    pub params: ExamParams,
    pub questions: Vec<Question>,
}

pub async fn execute(args: ExamArgs, config_path: Option<PathBuf>) -> Result<()> {
    anyhow::ensure!(
        matches!(args.format.as_str(), "text" | "json"),
        "unknown format: {} (expected text or json)",
        args.format
    );
    let sets = super::split_list(&args.sets);
    anyhow::ensure!(!sets.is_empty(), "at least one vocabulary set is required");

    let (config, source) = super::load(config_path)?;
    let defaults = &config.exam;
    let params = ExamParams::from_percent(
        args.num_questions.unwrap_or(defaults.num_questions),
        args.new_ratio.unwrap_or(defaults.new_ratio_percent),
        args.mistake_weight.unwrap_or(defaults.mistake_weight),
    )?;

    let pool = load_pool(&source, &sets).context("failed to load vocabulary")?;
    let engine = super::engine(&config, args.seed.or(defaults.seed)).await?;
    let questions = engine.generate_exam(&pool, &params).await?;

    let sheet = ExamSheet {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        sets,
        params,
        questions,
    };

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&sheet)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write exam: {}", path.display()))?;
        eprintln!("Exam saved to {}", path.display());
    }

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&sheet)?),
        _ => print_text(&sheet),
    }
    Ok(())
}

fn print_text(sheet: &ExamSheet) {
    if sheet.questions.is_empty() {
        println!("No words available in {}.", sheet.sets.join(", "));
        return;
    }

    let new_count = sheet.questions.iter().filter(|q| q.is_new).count();
    println!(
        "Exam {} ({} questions, {} new)\n",
        sheet.id,
        sheet.questions.len(),
        new_count
    );
    for (n, question) in sheet.questions.iter().enumerate() {
        let tag = if question.is_new { " [new]" } else { "" };
        println!("{}. {}{}", n + 1, question.word, tag);
        for (label, option) in ('A'..='Z').zip(&question.options) {
            println!("   {label}) {}", option.translation);
        }
    }
}
