//! Comparison Driver
//!
//! Thin consumer of the genre table: loads the persisted baselines (or
//! triggers one aggregation run when none exist), computes the full
//! feature vector for one user text, and aligns the two per feature for
//! presentation.

use crate::features::{FeatureEngine, FeatureVector, FAST_FEATURES};
use crate::stats::{self, AggregateOptions, GenreStats};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// One user vector aligned against every genre baseline.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub user: FeatureVector,
    pub genres: GenreStats,
}

/// One presentation row: a feature, the user's value, and the
/// per-genre baseline values.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureRow {
    pub feature: &'static str,
    pub user: f64,
    pub baselines: Vec<(String, f64)>,
}

impl Comparison {
    /// Per-feature (genre-average, user-value) pairing in fast-key
    /// order, with the perplexity row last (it has no genre baseline).
    pub fn rows(&self) -> Vec<FeatureRow> {
        let user_values = self.user.fast_values();
        let mut rows: Vec<FeatureRow> = Vec::with_capacity(FAST_FEATURES.len() + 1);
        for (i, &feature) in FAST_FEATURES.iter().enumerate() {
            let baselines = self
                .genres
                .iter()
                .map(|(genre, vector)| (genre.clone(), vector.fast_values()[i]))
                .collect();
            rows.push(FeatureRow {
                feature,
                user: user_values[i],
                baselines,
            });
        }

        if let Some(ppl) = self.user.perplexity_gpt2 {
            rows.push(FeatureRow {
                feature: "perplexity_gpt2",
                user: ppl,
                baselines: Vec::new(),
            });
        }
        rows
    }
}

/// Load the persisted genre table, falling back to one full aggregation
/// run when it is absent. At most one computation per cold start; the
/// aggregation persists its result for the next run.
pub fn load_or_aggregate(
    data_dir: &Path,
    corpus_root: Option<&Path>,
    engine: &FeatureEngine,
    opts: &AggregateOptions,
) -> Result<GenreStats> {
    if let Some(table) = stats::load_table(data_dir)? {
        info!("Loaded genre baselines from {}", data_dir.display());
        return Ok(table);
    }

    let corpus_root = corpus_root.context(
        "no persisted genre table found and no --corpus directory given to build one",
    )?;
    info!("No persisted genre table; aggregating {}", corpus_root.display());
    let (table, _) = stats::aggregate_and_persist(corpus_root, engine, opts, data_dir, None)?;
    Ok(table)
}

/// Full feature vector for one user text, paired against the table.
pub fn compare_text(
    text: &str,
    table: GenreStats,
    engine: &FeatureEngine,
) -> Result<Comparison> {
    let user = engine.compute_full(text)?;
    Ok(Comparison {
        user,
        genres: table,
    })
}
