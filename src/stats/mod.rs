//! Genre Aggregator
//!
//! Drives the corpus extractor and the fast feature variant over every
//! annotated file in parallel, groups the tagged vectors by genre,
//! reduces them to per-genre arithmetic means, and persists the table.
//! The table is regenerated wholesale on every run.

pub mod pipeline;

pub use pipeline::PipelineStats;

use crate::corpus::{self, CorpusExtractor};
use crate::features::{FeatureEngine, FeatureVector, FAST_FEATURES};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// File name of the persisted table under the processed-data directory.
pub const GENRE_STATS_FILE: &str = "genre_stats.json";

/// Per-genre mean feature vectors over the fast-variant keys.
pub type GenreStats = BTreeMap<String, FeatureVector>;

/// Fatal aggregation conditions. Skips are not errors; an empty run is.
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("no .conllu input files found under '{0}'")]
    NoInputFiles(PathBuf),

    #[error("no usable documents: every input file was skipped")]
    NoUsableDocuments,

    #[error("invalid corpus prefix: {0}")]
    BadPrefix(String),

    #[error("failed to persist genre table: {0}")]
    Persist(#[from] std::io::Error),

    #[error("failed to serialize genre table: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Tunables for one aggregation run.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Worker threads for the per-file fan-out
    pub workers: usize,
    /// Character prefix of each document used for feature extraction.
    /// Changing this changes every baseline statistic.
    pub snippet_len: usize,
    /// Corpus prefix in document identifiers (`<prefix>_<genre>_`)
    pub corpus_prefix: String,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4),
            snippet_len: 200,
            corpus_prefix: corpus::DEFAULT_CORPUS_PREFIX.to_string(),
        }
    }
}

/// Compute per-genre mean feature vectors over every annotated file
/// under `corpus_root`.
///
/// Per-file work runs on a fork-join worker pool; a file without a
/// usable genre label is skipped with a warning, never a failure. An
/// empty file set or an empty result set is fatal.
pub fn aggregate(
    corpus_root: &Path,
    engine: &FeatureEngine,
    opts: &AggregateOptions,
    progress: Option<&(dyn Fn(usize, usize) + Sync)>,
) -> Result<(GenreStats, PipelineStats), AggregateError> {
    let extractor = CorpusExtractor::new(&opts.corpus_prefix)
        .map_err(|e| AggregateError::BadPrefix(e.to_string()))?;

    let files = corpus::find_corpus_files(corpus_root);
    info!("Files found: {}", files.len());
    if files.is_empty() {
        return Err(AggregateError::NoInputFiles(corpus_root.to_path_buf()));
    }

    let snippet_len = opts.snippet_len;
    let (tagged, stats) = pipeline::map_files_parallel(files, opts.workers, progress, |path| {
        process_file(path, &extractor, engine, snippet_len)
    });

    if stats.skipped > 0 {
        info!("Skipped {} of {} files", stats.skipped, stats.total_files);
    }
    if tagged.is_empty() {
        return Err(AggregateError::NoUsableDocuments);
    }

    Ok((genre_means(tagged), stats))
}

/// One worker unit: path -> optional (genre, fast feature vector).
/// Every per-file failure mode becomes a logged skip.
fn process_file(
    path: &Path,
    extractor: &CorpusExtractor,
    engine: &FeatureEngine,
    snippet_len: usize,
) -> Option<(String, FeatureVector)> {
    let genre = match extractor.extract_genre(path) {
        Ok(Some(genre)) => genre,
        Ok(None) => {
            warn!("Skipping file (no genre found): {}", path.display());
            return None;
        }
        Err(e) => {
            warn!("Skipping file ({}): {e}", path.display());
            return None;
        }
    };

    let text = match extractor.extract_text(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Skipping file ({}): {e}", path.display());
            return None;
        }
    };

    // Snippet truncation trades long-range stylistic signal for
    // throughput; counted in chars so multibyte text cannot split.
    let snippet: String = text.chars().take(snippet_len).collect();
    Some((genre, engine.compute_fast(&snippet)))
}

/// Group tagged vectors by genre and take the per-feature arithmetic
/// mean. A single-document genre keeps that document's values.
fn genre_means(tagged: Vec<(String, FeatureVector)>) -> GenreStats {
    let mut sums: BTreeMap<String, ([f64; FAST_FEATURES.len()], usize)> = BTreeMap::new();

    for (genre, vector) in tagged {
        let entry = sums.entry(genre).or_insert(([0.0; FAST_FEATURES.len()], 0));
        for (sum, value) in entry.0.iter_mut().zip(vector.fast_values()) {
            *sum += value;
        }
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(genre, (sums, count))| {
            let means = sums.map(|s| s / count as f64);
            (genre, FeatureVector::from_fast_values(means))
        })
        .collect()
}

/// Path of the persisted table under a processed-data directory.
pub fn table_path(data_dir: &Path) -> PathBuf {
    data_dir.join(GENRE_STATS_FILE)
}

/// Persist the table, overwriting any prior one.
pub fn save_table(table: &GenreStats, data_dir: &Path) -> Result<PathBuf, AggregateError> {
    fs::create_dir_all(data_dir)?;
    let path = table_path(data_dir);
    let json = serde_json::to_string_pretty(table)?;
    fs::write(&path, json)?;
    info!("Genre statistics saved to {}", path.display());
    Ok(path)
}

/// Load a previously persisted table. `Ok(None)` when none exists yet.
pub fn load_table(data_dir: &Path) -> Result<Option<GenreStats>, AggregateError> {
    let path = table_path(data_dir);
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(&path)?;
    Ok(Some(serde_json::from_str(&json)?))
}

/// Aggregate and persist in one step: the contract of an aggregation run.
pub fn aggregate_and_persist(
    corpus_root: &Path,
    engine: &FeatureEngine,
    opts: &AggregateOptions,
    data_dir: &Path,
    progress: Option<&(dyn Fn(usize, usize) + Sync)>,
) -> Result<(GenreStats, PipelineStats), AggregateError> {
    let (table, stats) = aggregate(corpus_root, engine, opts, progress)?;
    save_table(&table, data_dir)?;
    Ok((table, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::Annotator;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn engine() -> FeatureEngine {
        FeatureEngine::new(Arc::new(Annotator::new()))
    }

    fn opts() -> AggregateOptions {
        AggregateOptions {
            workers: 2,
            ..Default::default()
        }
    }

    fn write_doc(dir: &Path, name: &str, id: &str, text: &str) {
        let content = format!("# newdoc id = {id}\n# text = {text}\n");
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_no_input_files_is_fatal() {
        let dir = tempdir().unwrap();
        let err = aggregate(dir.path(), &engine(), &opts(), None).unwrap_err();
        assert!(matches!(err, AggregateError::NoInputFiles(_)));
    }

    #[test]
    fn test_all_skipped_is_fatal() {
        let dir = tempdir().unwrap();
        write_doc(dir.path(), "a.conllu", "NOTMATCHING", "Some text.");
        let err = aggregate(dir.path(), &engine(), &opts(), None).unwrap_err();
        assert!(matches!(err, AggregateError::NoUsableDocuments));
    }

    #[test]
    fn test_genre_mean_of_two_documents() {
        let dir = tempdir().unwrap();
        write_doc(dir.path(), "a.conllu", "AMALGUM_news_001", "The cat sat.");
        write_doc(
            dir.path(),
            "b.conllu",
            "AMALGUM_news_002",
            "The cat sat on the mat today.",
        );

        let eng = engine();
        let (table, stats) = aggregate(dir.path(), &eng, &opts(), None).unwrap();
        assert_eq!(stats.processed, 2);
        assert_eq!(table.len(), 1);

        let a = eng.compute_fast("The cat sat.");
        let b = eng.compute_fast("The cat sat on the mat today.");
        let news = &table["news"];
        for (i, (va, vb)) in a.fast_values().iter().zip(b.fast_values()).enumerate() {
            let expected = (va + vb) / 2.0;
            let got = news.fast_values()[i];
            assert!(
                (got - expected).abs() < 1e-12,
                "feature {} mean mismatch: {got} vs {expected}",
                FAST_FEATURES[i]
            );
        }
        // 4-token and 8-token sentences
        assert!((news.mean_sentence_length - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_document_genre_keeps_its_values() {
        let dir = tempdir().unwrap();
        write_doc(dir.path(), "a.conllu", "AMALGUM_bio_001", "Born long ago.");

        let eng = engine();
        let (table, _) = aggregate(dir.path(), &eng, &opts(), None).unwrap();
        assert_eq!(table["bio"], eng.compute_fast("Born long ago."));
    }

    #[test]
    fn test_skipped_file_does_not_shift_means() {
        let dir = tempdir().unwrap();
        write_doc(dir.path(), "a.conllu", "AMALGUM_news_001", "The cat sat.");
        write_doc(dir.path(), "b.conllu", "NOTMATCHING", "Completely different text!");
        // a file with no id line at all
        fs::write(dir.path().join("c.conllu"), "# text = Orphan text.\n").unwrap();

        let eng = engine();
        let (table, stats) = aggregate(dir.path(), &eng, &opts(), None).unwrap();
        assert_eq!(stats.skipped, 2);
        assert_eq!(table.len(), 1);
        assert_eq!(table["news"], eng.compute_fast("The cat sat."));
    }

    #[test]
    fn test_snippet_truncation_applies() {
        let dir = tempdir().unwrap();
        let long_text = "word ".repeat(100);
        write_doc(dir.path(), "a.conllu", "AMALGUM_news_001", long_text.trim());

        let eng = engine();
        let short_opts = AggregateOptions {
            workers: 1,
            snippet_len: 10,
            ..Default::default()
        };
        let (table, _) = aggregate(dir.path(), &eng, &short_opts, None).unwrap();
        let expected = eng.compute_fast(&long_text.trim().chars().take(10).collect::<String>());
        assert_eq!(table["news"], expected);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let corpus = dir.path().join("corpus");
        fs::create_dir(&corpus).unwrap();
        write_doc(&corpus, "a.conllu", "AMALGUM_news_001", "The cat sat.");

        let data_dir = dir.path().join("processed");
        let (table, _) =
            aggregate_and_persist(&corpus, &engine(), &opts(), &data_dir, None).unwrap();

        let loaded = load_table(&data_dir).unwrap().unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_load_missing_table_is_none() {
        let dir = tempdir().unwrap();
        assert!(load_table(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites_prior_table() {
        let dir = tempdir().unwrap();
        let mut first = GenreStats::new();
        first.insert("old".to_string(), FeatureVector::default());
        save_table(&first, dir.path()).unwrap();

        let mut second = GenreStats::new();
        second.insert("new".to_string(), FeatureVector::default());
        save_table(&second, dir.path()).unwrap();

        let loaded = load_table(dir.path()).unwrap().unwrap();
        assert!(loaded.contains_key("new"));
        assert!(!loaded.contains_key("old"));
    }
}
