//! Compare command implementation
//!
//! Loads (or builds) the genre baseline table, computes the full
//! feature vector for one user-supplied text including the GPT-2
//! perplexity term, and renders the aligned comparison.

use crate::compare;
use crate::config::ProjectConfig;
use crate::features::FeatureEngine;
use crate::lm::Gpt2Scorer;
use crate::nlp::Annotator;
use crate::reporters;
use crate::stats::AggregateOptions;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[allow(clippy::too_many_arguments)]
pub fn run(
    config: &ProjectConfig,
    workers: usize,
    text: Option<String>,
    file: Option<PathBuf>,
    corpus: Option<&Path>,
    data_dir: Option<PathBuf>,
    model_dir: Option<PathBuf>,
    format: &str,
) -> Result<()> {
    let text = match (text, file) {
        (Some(text), None) => text,
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => bail!("provide a text with --text or --file"),
        (Some(_), Some(_)) => unreachable!("clap rejects --text with --file"),
    };

    let data_dir = data_dir.unwrap_or_else(|| config.paths.data_dir.clone());
    let model_dir = model_dir.unwrap_or_else(|| config.paths.model_dir.clone());

    // Model load failure is fatal here; there is no degraded compare mode.
    let annotator = Arc::new(Annotator::new());
    let scorer = Arc::new(
        Gpt2Scorer::load(&model_dir)
            .with_context(|| format!("failed to load GPT-2 model from {}", model_dir.display()))?,
    );
    let engine = FeatureEngine::new(annotator).with_scorer(scorer);

    let opts = AggregateOptions {
        workers,
        snippet_len: config.aggregate.snippet_len,
        corpus_prefix: config.aggregate.corpus_prefix.clone(),
    };
    let table = compare::load_or_aggregate(&data_dir, corpus, &engine, &opts)?;
    let comparison = compare::compare_text(&text, table, &engine)?;

    let rendered = match format {
        "json" => reporters::json::render(&comparison)?,
        _ => reporters::text::render(&comparison)?,
    };
    println!("{rendered}");

    Ok(())
}
