//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::generator::DEFAULT_MAX_DRAWS;
use crate::updater::ScoreWeights;

/// Environment variable that overrides `data_dir`.
pub const DATA_DIR_ENV: &str = "MATHQUEST_DATA_DIR";

/// Top-level mathquest configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathquestConfig {
    /// Directory holding `scores.json` and `history.jsonl`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Questions per session when none are requested.
    #[serde(default = "default_questions")]
    pub default_questions: usize,
    /// Graded submissions allowed per question.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Safety cap for rejection sampling.
    #[serde(default = "default_max_draws")]
    pub max_generation_draws: u32,
    #[serde(default)]
    pub weights: ScoreWeights,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./mathquest-data")
}
fn default_questions() -> usize {
    10
}
fn default_max_attempts() -> u32 {
    3
}
fn default_max_draws() -> u32 {
    DEFAULT_MAX_DRAWS
}

impl Default for MathquestConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_questions: default_questions(),
            max_attempts: default_max_attempts(),
            max_generation_draws: default_max_draws(),
            weights: ScoreWeights::default(),
        }
    }
}

impl MathquestConfig {
    pub fn scores_path(&self) -> PathBuf {
        self.data_dir.join("scores.json")
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("history.jsonl")
    }

    /// Config with everything defaulted except the data directory.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `mathquest.toml` in the current directory
/// 2. `~/.config/mathquest/config.toml`
///
/// `MATHQUEST_DATA_DIR` overrides the data directory.
pub fn load_config_from(path: Option<&Path>) -> Result<MathquestConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("mathquest.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            parse_config_file(&path)?
        }
        None => MathquestConfig::default(),
    };

    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        config.data_dir = PathBuf::from(dir);
    }
    validate(&config)?;
    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<MathquestConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<MathquestConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn validate(config: &MathquestConfig) -> Result<()> {
    if config.max_attempts == 0 {
        anyhow::bail!("max_attempts must be at least 1");
    }
    if config.max_generation_draws == 0 {
        anyhow::bail!("max_generation_draws must be at least 1");
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("mathquest"))
}

/// Starter config written by `mathquest init`.
pub const SAMPLE_CONFIG: &str = r#"# mathquest configuration

# Where scores.json and history.jsonl are kept.
data_dir = "./mathquest-data"

# Questions per practice session when --questions is not given.
default_questions = 10

# Tries per question before the answer is shown.
max_attempts = 3

# Cap on random draws when generating a single problem.
max_generation_draws = 5000

# Score delta weights. Higher scores mean the topic needs more practice.
[weights]
time = 0.05
attempts = 0.5
first_try = 0.3
"#;
