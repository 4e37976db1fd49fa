//! Corpus extraction from annotated-document (.conllu) files
//!
//! A corpus file is a line-oriented annotation format where lines
//! beginning with `# text = ` carry document text and lines beginning
//! with `# newdoc id =` carry a document identifier of the form
//! `<PREFIX>_<genre>_<doc>` from which the genre label is extracted.

use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Marker for text-bearing lines
const TEXT_MARKER: &str = "# text = ";
/// Marker for document-identifier lines
const ID_MARKER: &str = "# newdoc id =";
/// Default corpus prefix in document identifiers
pub const DEFAULT_CORPUS_PREFIX: &str = "AMALGUM";

/// One corpus record, materialized transiently during aggregation.
#[derive(Debug, Clone)]
pub struct Document {
    pub genre: String,
    pub raw_text: String,
}

/// Extractor handle holding the compiled genre pattern.
pub struct CorpusExtractor {
    genre_re: Regex,
}

impl CorpusExtractor {
    /// Build an extractor for identifiers of the form `<prefix>_<genre>_`.
    pub fn new(prefix: &str) -> Result<Self> {
        let pattern = format!("{}_([A-Za-z]+)_", regex::escape(prefix));
        let genre_re = Regex::new(&pattern).context("invalid corpus prefix pattern")?;
        Ok(Self { genre_re })
    }

    /// Pull out the raw text: every `# text = ` line with the marker
    /// stripped, joined with single spaces in file order. An annotated
    /// file with no text lines yields an empty string, not an error.
    pub fn extract_text(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read corpus file {}", path.display()))?;

        let lines: Vec<&str> = content
            .lines()
            .filter_map(|line| line.strip_prefix(TEXT_MARKER))
            .map(str::trim)
            .collect();

        Ok(lines.join(" "))
    }

    /// Extract the genre token from the first `# newdoc id =` line whose
    /// identifier matches the prefix pattern. `None` is the normal
    /// file-skip signal: no id line, or an id that does not match.
    pub fn extract_genre(&self, path: &Path) -> Result<Option<String>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read corpus file {}", path.display()))?;

        for line in content.lines() {
            if let Some(rest) = line.strip_prefix(ID_MARKER) {
                if let Some(caps) = self.genre_re.captures(rest) {
                    return Ok(Some(caps[1].to_string()));
                }
            }
        }
        Ok(None)
    }

    /// Read one file into a `Document`, or `None` when it carries no
    /// usable genre label.
    pub fn document_from_file(&self, path: &Path) -> Result<Option<Document>> {
        let Some(genre) = self.extract_genre(path)? else {
            return Ok(None);
        };
        let raw_text = self.extract_text(path)?;
        Ok(Some(Document { genre, raw_text }))
    }
}

/// Recursively enumerate `.conllu` files under `root`, in no particular order.
pub fn find_corpus_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == "conllu")
        })
        .map(|e| e.into_path())
        .collect()
}
