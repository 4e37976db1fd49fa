//! Aggregate command implementation
//!
//! Builds the per-genre baseline table:
//! 1. Enumerate .conllu files under the corpus root
//! 2. Fan out per-file genre + fast-feature extraction to a worker pool
//! 3. Reduce to per-genre means
//! 4. Persist the table, overwriting any prior one

use crate::config::ProjectConfig;
use crate::features::FeatureEngine;
use crate::nlp::Annotator;
use crate::stats::{self, AggregateOptions};
use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

pub fn run(
    config: &ProjectConfig,
    workers: usize,
    corpus: &Path,
    snippet_len: Option<usize>,
    corpus_prefix: Option<String>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let opts = AggregateOptions {
        workers,
        snippet_len: snippet_len.unwrap_or(config.aggregate.snippet_len),
        corpus_prefix: corpus_prefix.unwrap_or_else(|| config.aggregate.corpus_prefix.clone()),
    };
    let data_dir = data_dir.unwrap_or_else(|| config.paths.data_dir.clone());

    let annotator = Arc::new(Annotator::new());
    let engine = FeatureEngine::new(annotator);

    let pb = ProgressBar::new(0);
    pb.set_style(ProgressStyle::default_bar());
    let progress = |done: usize, total: usize| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
    };

    let start = Instant::now();
    let (table, stats) =
        stats::aggregate_and_persist(corpus, &engine, &opts, &data_dir, Some(&progress))?;
    pb.finish_and_clear();

    println!(
        "{} {} genres from {} files ({} skipped) in {:.1}s",
        style("Aggregated").green().bold(),
        table.len(),
        stats.total_files,
        stats.skipped,
        start.elapsed().as_secs_f64()
    );
    println!(
        "Genre statistics saved to {}",
        stats::table_path(&data_dir).display()
    );

    Ok(())
}
