//! `quizrun.toml` loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizrun_core::QuizMode;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "quizrun.toml";

/// Top-level quizrun configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizrunConfig {
    /// Directory holding `manifest.json` and the bank CSV files.
    #[serde(default = "default_bank_dir")]
    pub bank_dir: PathBuf,
    /// Bank played when `--bank` is not given.
    #[serde(default)]
    pub default_bank: Option<String>,
    #[serde(default)]
    pub mode: QuizMode,
    /// Questions per session. The whole bank when unset.
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default = "default_true")]
    pub shuffle: bool,
    /// Strip "Câu N." markers when displaying questions.
    #[serde(default = "default_true")]
    pub clean_question_text: bool,
    /// Output directory for saved reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Report formats written after a session: json, html, markdown.
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
}

fn default_bank_dir() -> PathBuf {
    PathBuf::from("./banks")
}
fn default_true() -> bool {
    true
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizrun-results")
}
fn default_formats() -> Vec<String> {
    vec!["json".to_string()]
}

impl Default for QuizrunConfig {
    fn default() -> Self {
        Self {
            bank_dir: default_bank_dir(),
            default_bank: None,
            mode: QuizMode::default(),
            limit: None,
            shuffle: true,
            clean_question_text: true,
            output_dir: default_output_dir(),
            formats: default_formats(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. the explicit path, which must exist
/// 2. `quizrun.toml` in the current directory
/// 3. `~/.config/quizrun/config.toml`
///
/// Environment variable overrides: `QUIZRUN_BANK_DIR`, `QUIZRUN_MODE`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizrunConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(CONFIG_FILE);
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
            tracing::debug!(path = %path.display(), "loading config");
            toml::from_str::<QuizrunConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizrunConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    Ok(config)
}

/// Apply `QUIZRUN_*` overrides using `lookup` to read variables.
fn apply_env_overrides(
    config: &mut QuizrunConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(dir) = lookup("QUIZRUN_BANK_DIR").filter(|d| !d.is_empty()) {
        config.bank_dir = PathBuf::from(dir);
    }
    if let Some(mode) = lookup("QUIZRUN_MODE").filter(|m| !m.is_empty()) {
        config.mode = mode
            .parse()
            .map_err(anyhow::Error::msg)
            .context("invalid QUIZRUN_MODE")?;
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizrun"))
}
