//! Feature Engine
//!
//! Computes a fixed vector of stylistic metrics from raw text. The fast
//! variant covers the seven lexical/syntactic/readability features used
//! for bulk genre aggregation; the full variant adds GPT-2 perplexity,
//! which costs a model forward pass and is reserved for single texts.

pub mod readability;

use crate::lm::Gpt2Scorer;
use crate::nlp::{AnnotatedText, Annotator};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Names of the fast-variant features, in declaration order.
pub const FAST_FEATURES: [&str; 7] = [
    "ttr",
    "lexical_density",
    "avg_word_length",
    "mean_sentence_length",
    "std_sentence_length",
    "pos_entropy",
    "readability_flesch_kincaid",
];

/// A fixed mapping from feature names to values. All values are finite;
/// degenerate input (no tokens, no sentences) yields 0.0, never NaN.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    pub ttr: f64,
    pub lexical_density: f64,
    pub avg_word_length: f64,
    pub mean_sentence_length: f64,
    pub std_sentence_length: f64,
    pub pos_entropy: f64,
    pub readability_flesch_kincaid: f64,
    /// Present only in the full variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perplexity_gpt2: Option<f64>,
}

impl FeatureVector {
    /// Fast-variant values in `FAST_FEATURES` order.
    pub fn fast_values(&self) -> [f64; 7] {
        [
            self.ttr,
            self.lexical_density,
            self.avg_word_length,
            self.mean_sentence_length,
            self.std_sentence_length,
            self.pos_entropy,
            self.readability_flesch_kincaid,
        ]
    }

    /// (name, value) pairs; includes perplexity when present.
    pub fn pairs(&self) -> Vec<(&'static str, f64)> {
        let mut pairs: Vec<(&'static str, f64)> = FAST_FEATURES
            .iter()
            .copied()
            .zip(self.fast_values())
            .collect();
        if let Some(ppl) = self.perplexity_gpt2 {
            pairs.push(("perplexity_gpt2", ppl));
        }
        pairs
    }

    /// Build a fast-variant vector from values in `FAST_FEATURES` order.
    pub fn from_fast_values(values: [f64; 7]) -> Self {
        Self {
            ttr: values[0],
            lexical_density: values[1],
            avg_word_length: values[2],
            mean_sentence_length: values[3],
            std_sentence_length: values[4],
            pos_entropy: values[5],
            readability_flesch_kincaid: values[6],
            perplexity_gpt2: None,
        }
    }
}

/// The feature engine. Holds the annotator handle (and optionally the
/// GPT-2 scorer) built once at startup; cloning shares the handles.
#[derive(Clone)]
pub struct FeatureEngine {
    annotator: Arc<Annotator>,
    scorer: Option<Arc<Gpt2Scorer>>,
}

impl FeatureEngine {
    pub fn new(annotator: Arc<Annotator>) -> Self {
        Self {
            annotator,
            scorer: None,
        }
    }

    /// Attach a GPT-2 scorer, enabling `compute_full`.
    pub fn with_scorer(mut self, scorer: Arc<Gpt2Scorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// Fast variant: the seven lexical/syntactic/readability features.
    pub fn compute_fast(&self, text: &str) -> FeatureVector {
        let doc = self.annotator.annotate(text);
        let (mean_len, std_len) = sentence_length_stats(&doc);

        FeatureVector {
            ttr: type_token_ratio(&doc),
            lexical_density: lexical_density(&doc),
            avg_word_length: avg_word_length(&doc),
            mean_sentence_length: mean_len,
            std_sentence_length: std_len,
            pos_entropy: pos_entropy(&doc),
            readability_flesch_kincaid: readability::flesch_reading_ease(text),
            perplexity_gpt2: None,
        }
    }

    /// Full variant: fast features plus GPT-2 perplexity.
    /// Requires a scorer handle; blocking, strictly sequential.
    pub fn compute_full(&self, text: &str) -> Result<FeatureVector> {
        let scorer = self
            .scorer
            .as_ref()
            .context("no GPT-2 scorer attached; full feature extraction needs a model")?;

        let mut features = self.compute_fast(text);
        features.perplexity_gpt2 = Some(scorer.perplexity(text)?);
        Ok(features)
    }
}

/// Distinct lowercased alphabetic forms over alphabetic token count.
fn type_token_ratio(doc: &AnnotatedText) -> f64 {
    let total = doc.alpha_tokens().count();
    if total == 0 {
        return 0.0;
    }
    let distinct: std::collections::HashSet<&str> =
        doc.alpha_tokens().map(|t| t.lower.as_str()).collect();
    distinct.len() as f64 / total as f64
}

/// Content-tag (NOUN/VERB/ADJ/ADV) fraction of alphabetic tokens.
fn lexical_density(doc: &AnnotatedText) -> f64 {
    let total = doc.alpha_tokens().count();
    if total == 0 {
        return 0.0;
    }
    let content = doc.tokens.iter().filter(|t| t.pos.is_content()).count();
    content as f64 / total as f64
}

/// Mean character length of alphabetic tokens.
fn avg_word_length(doc: &AnnotatedText) -> f64 {
    let lengths: Vec<usize> = doc.alpha_tokens().map(|t| t.text.chars().count()).collect();
    if lengths.is_empty() {
        return 0.0;
    }
    lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
}

/// Population mean and standard deviation of per-sentence token counts.
fn sentence_length_stats(doc: &AnnotatedText) -> (f64, f64) {
    let lengths = doc.sentence_lengths();
    if lengths.is_empty() {
        return (0.0, 0.0);
    }
    let n = lengths.len() as f64;
    let mean = lengths.iter().sum::<usize>() as f64 / n;
    let variance = lengths
        .iter()
        .map(|&l| {
            let d = l as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

/// Shannon entropy (natural log) of the POS-tag distribution over
/// alphabetic tokens.
fn pos_entropy(doc: &AnnotatedText) -> f64 {
    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    let mut total = 0usize;
    for token in doc.alpha_tokens() {
        *counts.entry(token.pos.as_str()).or_insert(0) += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }
    counts
        .values()
        .map(|&c| {
            let p = c as f64 / total as f64;
            -p * p.ln()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> FeatureEngine {
        FeatureEngine::new(Arc::new(Annotator::new()))
    }

    #[test]
    fn test_empty_text_all_zero() {
        let fv = engine().compute_fast("");
        assert_eq!(fv.ttr, 0.0);
        assert_eq!(fv.lexical_density, 0.0);
        assert_eq!(fv.avg_word_length, 0.0);
        assert_eq!(fv.mean_sentence_length, 0.0);
        assert_eq!(fv.std_sentence_length, 0.0);
        assert_eq!(fv.pos_entropy, 0.0);
        assert_eq!(fv.readability_flesch_kincaid, 0.0);
        assert_eq!(fv.perplexity_gpt2, None);
    }

    #[test]
    fn test_no_alpha_tokens_zeroes_lexical_features() {
        // digits and punctuation only: no alphabetic tokens, but the
        // terminator still closes one sentence
        let fv = engine().compute_fast("123 456.");
        assert_eq!(fv.ttr, 0.0);
        assert_eq!(fv.lexical_density, 0.0);
        assert_eq!(fv.avg_word_length, 0.0);
        assert_eq!(fv.pos_entropy, 0.0);
        assert!(fv.mean_sentence_length > 0.0);
    }

    #[test]
    fn test_ttr_bounds() {
        let fv = engine().compute_fast("the the the the");
        assert!((fv.ttr - 0.25).abs() < 1e-12);
        let fv = engine().compute_fast("each word here differs");
        assert_eq!(fv.ttr, 1.0);
    }

    #[test]
    fn test_ttr_and_density_in_unit_interval() {
        for text in [
            "",
            "one",
            "The cat sat on the mat.",
            "Repetition repetition repetition!",
            "42 is not a word, 42 is a number.",
        ] {
            let fv = engine().compute_fast(text);
            assert!((0.0..=1.0).contains(&fv.ttr), "ttr out of range for {text:?}");
            assert!(
                (0.0..=1.0).contains(&fv.lexical_density),
                "density out of range for {text:?}"
            );
        }
    }

    #[test]
    fn test_avg_word_length() {
        // "cat" (3) + "runs" (4) -> 3.5; the digit token is excluded
        let fv = engine().compute_fast("cat runs 12345");
        assert!((fv.avg_word_length - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_sentence_stats() {
        // sentences of 4 and 8 tokens: mean 6, population std 2
        let fv = engine().compute_fast("The cat sat. The cat sat on the mat today.");
        assert!((fv.mean_sentence_length - 6.0).abs() < 1e-12);
        assert!((fv.std_sentence_length - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_sentence_std_is_zero() {
        let fv = engine().compute_fast("Only one sentence here.");
        assert_eq!(fv.std_sentence_length, 0.0);
    }

    #[test]
    fn test_pos_entropy_uniform_two_tags() {
        // DET NOUN DET NOUN: two tags, equal mass -> ln(2)
        let fv = engine().compute_fast("the cat the cat");
        assert!((fv.pos_entropy - std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn test_pos_entropy_single_tag_is_zero() {
        let fv = engine().compute_fast("cat mat rug");
        assert_eq!(fv.pos_entropy, 0.0);
    }

    #[test]
    fn test_all_values_finite() {
        for text in ["", ".", "a", "The quick brown fox... jumps?! 42"] {
            let fv = engine().compute_fast(text);
            for (name, value) in fv.pairs() {
                assert!(value.is_finite(), "{name} not finite for {text:?}");
            }
        }
    }

    #[test]
    fn test_compute_full_without_scorer_errors() {
        assert!(engine().compute_full("some text").is_err());
    }

    #[test]
    fn test_pairs_order_matches_fast_features() {
        let fv = engine().compute_fast("The cat sat.");
        let names: Vec<&str> = fv.pairs().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, FAST_FEATURES.to_vec());
    }

    #[test]
    fn test_serde_round_trip_skips_absent_perplexity() {
        let fv = engine().compute_fast("The cat sat.");
        let json = serde_json::to_string(&fv).unwrap();
        assert!(!json.contains("perplexity_gpt2"));
        let back: FeatureVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fv);
    }
}
