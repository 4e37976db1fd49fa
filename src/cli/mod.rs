//! CLI command definitions and handlers

mod aggregate;
mod compare;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().min(64))
        .unwrap_or(4)
}

/// Stylometer - stylistic text-feature statistics
///
/// 100% LOCAL - all corpus processing and model scoring run on your machine.
#[derive(Parser, Debug)]
#[command(name = "stylometer")]
#[command(
    version,
    about = "Compute stylistic text features and compare them against per-genre corpus baselines",
    long_about = "Stylometer computes a fixed vector of stylistic features (type-token ratio, \
lexical density, word and sentence statistics, POS entropy, Flesch readability, and GPT-2 \
perplexity) for a text and compares it against per-genre averages aggregated from an \
annotated reference corpus.",
    after_help = "\
Examples:
  stylometer aggregate --corpus data/raw/amalgum     Build the genre baseline table
  stylometer compare --text \"My writing sample.\"     Compare a text against the baselines
  stylometer compare --file draft.txt --format json  JSON output for scripting"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64, default: CPU count)
    #[arg(long, global = true, default_value_t = default_workers(), value_parser = parse_workers)]
    pub workers: usize,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Aggregate per-genre baseline statistics over an annotated corpus
    #[command(after_help = "\
Examples:
  stylometer aggregate --corpus data/raw/amalgum
  stylometer aggregate --corpus data/raw/amalgum --snippet-len 500
  stylometer aggregate --corpus mycorp --corpus-prefix MYCORP --data-dir out")]
    Aggregate {
        /// Corpus root: directory tree of .conllu files
        #[arg(long)]
        corpus: PathBuf,

        /// Character prefix of each document used for features (default: 200)
        #[arg(long)]
        snippet_len: Option<usize>,

        /// Corpus prefix in document identifiers (default: AMALGUM)
        #[arg(long)]
        corpus_prefix: Option<String>,

        /// Processed-data directory for the persisted table
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Compare one text's full feature vector against the genre baselines
    #[command(after_help = "\
Examples:
  stylometer compare --text \"The cat sat on the mat.\"
  stylometer compare --file essay.txt
  stylometer compare --file essay.txt --corpus data/raw/amalgum   Build baselines if missing
  stylometer compare --file essay.txt --format json")]
    Compare {
        /// The text to analyze
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// Read the text from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Corpus root, used only when no persisted table exists yet
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Processed-data directory holding the persisted table
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Directory holding the GPT-2 tokenizer and checkpoint
        #[arg(long)]
        model_dir: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

/// Dispatch a parsed CLI invocation.
pub fn run(cli: Cli) -> Result<()> {
    let config = crate::config::load_project_config(std::path::Path::new("."))?;

    match cli.command {
        Commands::Aggregate {
            corpus,
            snippet_len,
            corpus_prefix,
            data_dir,
        } => aggregate::run(
            &config,
            cli.workers,
            &corpus,
            snippet_len,
            corpus_prefix,
            data_dir,
        ),
        Commands::Compare {
            text,
            file,
            corpus,
            data_dir,
            model_dir,
            format,
        } => compare::run(
            &config,
            cli.workers,
            text,
            file,
            corpus.as_deref(),
            data_dir,
            model_dir,
            &format,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workers_bounds() {
        assert!(parse_workers("0").is_err());
        assert!(parse_workers("65").is_err());
        assert!(parse_workers("abc").is_err());
        assert_eq!(parse_workers("8"), Ok(8));
    }

    #[test]
    fn test_cli_parses_aggregate() {
        let cli = Cli::try_parse_from(["stylometer", "aggregate", "--corpus", "data/raw"]).unwrap();
        assert!(matches!(cli.command, Commands::Aggregate { .. }));
    }

    #[test]
    fn test_cli_rejects_text_and_file_together() {
        let result = Cli::try_parse_from([
            "stylometer", "compare", "--text", "hi", "--file", "a.txt",
        ]);
        assert!(result.is_err());
    }
}
