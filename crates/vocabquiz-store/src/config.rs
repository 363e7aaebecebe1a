//! Configuration loading and store factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use vocabquiz_core::composer::ExamParams;
use vocabquiz_core::memory::MemoryStore;
use vocabquiz_core::traits::StatsStore;

use crate::sqlite::SqliteStore;

/// Which statistics store to open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    Sqlite {
        #[serde(default = "default_db_path")]
        path: PathBuf,
        #[serde(default = "default_busy_timeout")]
        busy_timeout_ms: u64,
    },
    /// Nothing persists past the process.
    Memory,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Sqlite {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("vocab.db")
}
fn default_busy_timeout() -> u64 {
    5000
}

/// Default exam parameters, overridable per command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamDefaults {
    #[serde(default = "default_num_questions")]
    pub num_questions: usize,
    /// Share of new words, as a percentage in `[0, 100]`.
    #[serde(default = "default_new_ratio_percent")]
    pub new_ratio_percent: f64,
    #[serde(default = "default_mistake_weight")]
    pub mistake_weight: f64,
    /// Fixed RNG seed for reproducible exams.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_num_questions() -> usize {
    10
}
fn default_new_ratio_percent() -> f64 {
    20.0
}
fn default_mistake_weight() -> f64 {
    5.0
}

impl Default for ExamDefaults {
    fn default() -> Self {
        Self {
            num_questions: default_num_questions(),
            new_ratio_percent: default_new_ratio_percent(),
            mistake_weight: default_mistake_weight(),
            seed: None,
        }
    }
}

impl ExamDefaults {
    /// Validated composer parameters.
    pub fn params(&self) -> Result<ExamParams> {
        ExamParams::from_percent(self.num_questions, self.new_ratio_percent, self.mistake_weight)
            .context("invalid [exam] defaults")
    }
}

/// Top-level vocabquiz configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabquizConfig {
    /// Directory holding vocabulary CSV files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub exam: ExamDefaults,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for VocabquizConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            store: StoreConfig::default(),
            exam: ExamDefaults::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `vocabquiz.toml` in the current directory
/// 2. `~/.config/vocabquiz/config.toml`
///
/// Environment variable overrides: `VOCABQUIZ_DB`, `VOCABQUIZ_DATA_DIR`.
pub fn load_config() -> Result<VocabquizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<VocabquizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("vocabquiz.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<VocabquizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => VocabquizConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    resolve_config_paths(&mut config);
    Ok(config)
}

/// Apply `VOCABQUIZ_*` overrides using `lookup` to read variables.
fn apply_env_overrides<F>(config: &mut VocabquizConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(db) = lookup("VOCABQUIZ_DB") {
        match &mut config.store {
            StoreConfig::Sqlite { path, .. } => *path = PathBuf::from(db),
            StoreConfig::Memory => {
                config.store = StoreConfig::Sqlite {
                    path: PathBuf::from(db),
                    busy_timeout_ms: default_busy_timeout(),
                };
            }
        }
    }
    if let Some(dir) = lookup("VOCABQUIZ_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
}

fn resolve_config_paths(config: &mut VocabquizConfig) {
    config.data_dir = resolve_path(&config.data_dir);
    if let StoreConfig::Sqlite { path, .. } = &mut config.store {
        *path = resolve_path(path);
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("vocabquiz"))
}

/// Open the statistics store described by `config`.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn StatsStore>> {
    match config {
        StoreConfig::Sqlite {
            path,
            busy_timeout_ms,
        } => {
            let store = SqliteStore::open(path, Duration::from_millis(*busy_timeout_ms))
                .await
                .with_context(|| format!("failed to open database: {}", path.display()))?;
            Ok(Arc::new(store))
        }
        StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
