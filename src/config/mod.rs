//! Project configuration
//!
//! Optional `stylometer.toml` at the working directory root. Every
//! value has a default; CLI flags override file values.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE: &str = "stylometer.toml";

fn default_snippet_len() -> usize {
    200
}

fn default_corpus_prefix() -> String {
    crate::corpus::DEFAULT_CORPUS_PREFIX.to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/processed")
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("models/gpt2")
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub aggregate: AggregateSection,
    #[serde(default)]
    pub paths: PathsSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregateSection {
    /// Character prefix of each document used during aggregation.
    /// Changing it changes every baseline statistic.
    #[serde(default = "default_snippet_len")]
    pub snippet_len: usize,
    /// Corpus prefix in document identifiers (`<prefix>_<genre>_`)
    #[serde(default = "default_corpus_prefix")]
    pub corpus_prefix: String,
}

impl Default for AggregateSection {
    fn default() -> Self {
        Self {
            snippet_len: default_snippet_len(),
            corpus_prefix: default_corpus_prefix(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    /// Processed-data directory holding the persisted genre table
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Directory holding the GPT-2 tokenizer and checkpoint
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            model_dir: default_model_dir(),
        }
    }
}

/// Load `stylometer.toml` from `root` when present; defaults otherwise.
pub fn load_project_config(root: &Path) -> Result<ProjectConfig> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        debug!("No {} found, using defaults", CONFIG_FILE);
        return Ok(ProjectConfig::default());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: ProjectConfig = toml::from_str(&content)
        .with_context(|| format!("invalid config in {}", path.display()))?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}
