//! Stylometer - stylistic text-feature statistics
//!
//! Computes a fixed vector of stylistic features (lexical, syntactic,
//! readability, and GPT-2 perplexity) for raw text and aggregates those
//! features across an annotated corpus into per-genre baseline means.

pub mod cli;
pub mod compare;
pub mod config;
pub mod corpus;
pub mod features;
pub mod lm;
pub mod nlp;
pub mod reporters;
pub mod stats;
