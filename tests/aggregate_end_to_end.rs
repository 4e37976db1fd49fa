//! End-to-end aggregation over an on-disk corpus

use std::fs;
use std::path::Path;
use std::sync::Arc;

use stylometer::features::{FeatureEngine, FAST_FEATURES};
use stylometer::nlp::Annotator;
use stylometer::stats::{self, AggregateError, AggregateOptions};
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
    let content = format!(
        "# newdoc id = {id}\n# sent_id = {id}-1\n# text = {text}\n1\tX\tx\n"
    );
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn two_file_news_corpus_yields_one_mean_row() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("amalgum");
    let nested = corpus.join("news");
    fs::create_dir_all(&nested).unwrap();

    write_doc(&nested, "AMALGUM_news_001.conllu", "AMALGUM_news_001", "The cat sat.");
    write_doc(
        &nested,
        "AMALGUM_news_002.conllu",
        "AMALGUM_news_002",
        "The cat sat on the mat today.",
    );

    let data_dir = dir.path().join("processed");
    let eng = engine();
    let (table, stats) =
        stats::aggregate_and_persist(&corpus, &eng, &opts(), &data_dir, None).unwrap();

    assert_eq!(stats.total_files, 2);
    assert_eq!(stats.processed, 2);
    assert_eq!(table.len(), 1);

    // mean_sentence_length must equal the mean of the two per-file
    // sentence-token counts: (4 + 8) / 2 = 6
    let news = &table["news"];
    assert!((news.mean_sentence_length - 6.0).abs() < 1e-12);

    // every feature is the independent per-feature mean of the two docs
    let a = eng.compute_fast("The cat sat.");
    let b = eng.compute_fast("The cat sat on the mat today.");
    for (i, name) in FAST_FEATURES.iter().enumerate() {
        let expected = (a.fast_values()[i] + b.fast_values()[i]) / 2.0;
        assert!(
            (news.fast_values()[i] - expected).abs() < 1e-12,
            "{name} mismatch"
        );
    }

    // the table was persisted and round-trips
    let loaded = stats::load_table(&data_dir).unwrap().unwrap();
    assert_eq!(loaded, table);
}

#[test]
fn file_without_id_line_is_excluded_entirely() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir_all(&corpus).unwrap();

    write_doc(&corpus, "good.conllu", "AMALGUM_news_001", "The cat sat.");
    // no `# newdoc id =` line at all
    fs::write(
        corpus.join("orphan.conllu"),
        "# text = This text must not shift any mean.\n",
    )
    .unwrap();

    let eng = engine();
    let (table, stats) = stats::aggregate(&corpus, &eng, &opts(), None).unwrap();

    assert_eq!(stats.skipped, 1);
    assert_eq!(table.len(), 1);
    assert_eq!(table["news"], eng.compute_fast("The cat sat."));
}

#[test]
fn empty_corpus_directory_is_fatal() {
    let dir = tempdir().unwrap();
    let err = stats::aggregate(dir.path(), &engine(), &opts(), None).unwrap_err();
    assert!(matches!(err, AggregateError::NoInputFiles(_)));
}

#[test]
fn multiple_genres_get_independent_rows() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir_all(&corpus).unwrap();

    write_doc(&corpus, "a.conllu", "AMALGUM_news_001", "Officials said so.");
    write_doc(&corpus, "b.conllu", "AMALGUM_fiction_001", "Once there was a cat.");
    write_doc(&corpus, "c.conllu", "AMALGUM_bio_001", "Born in a small town.");

    let (table, stats) = stats::aggregate(&corpus, &engine(), &opts(), None).unwrap();
    assert_eq!(stats.processed, 3);
    let genres: Vec<&String> = table.keys().collect();
    assert_eq!(genres, vec!["bio", "fiction", "news"]);
}
