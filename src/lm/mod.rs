//! GPT-2 scoring handle
//!
//! Loads a pretrained byte-pair tokenizer and a GPT-2-architecture
//! decoder checkpoint once at startup, then scores texts by next-token
//! cross-entropy: perplexity = exp(loss). Load failure is fatal to the
//! compare path and is not recovered locally.

mod model;

pub use model::{Gpt2Model, Gpt2ModelConfig};

use burn::backend::ndarray::NdArrayDevice;
use burn::backend::NdArray;
use burn::config::Config;
use burn::prelude::*;
use burn::record::{CompactRecorder, Recorder};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokenizers::Tokenizer;

/// CPU backend for the single-text scoring path.
pub type ScorerBackend = NdArray;

/// Token-id truncation bound for the forward pass.
pub const MAX_SCORE_TOKENS: usize = 512;

/// Errors from loading or running the scorer.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to load tokenizer from '{path}': {message}")]
    TokenizerLoad { path: PathBuf, message: String },

    #[error("failed to load model config from '{path}': {message}")]
    ConfigLoad { path: PathBuf, message: String },

    #[error("failed to load model weights from '{path}': {message}")]
    WeightsLoad { path: PathBuf, message: String },

    #[error("tokenization failed: {0}")]
    Encode(String),
}

/// The scorer handle: tokenizer + model loaded once, reused read-only.
pub struct Gpt2Scorer {
    tokenizer: Tokenizer,
    model: Gpt2Model<ScorerBackend>,
    device: NdArrayDevice,
    max_tokens: usize,
}

// SAFETY: `burn` 0.16 modules are `!Sync` solely because `Param` holds a
// `core::cell::OnceCell` for lazy initialization. Every parameter in this
// model is initialized before the scorer is shared (via `load_record` in
// `load`, or by the caller of `from_parts`), and the handle is used
// strictly read-only afterwards, so no interior mutation can race.
unsafe impl Sync for Gpt2Scorer {}

impl Gpt2Scorer {
    /// Load tokenizer and checkpoint from `model_dir`, expected to hold
    /// `tokenizer.json`, `model.json` (architecture config), and the
    /// recorded weights under `model`.
    pub fn load(model_dir: &Path) -> Result<Self, ModelError> {
        let device = NdArrayDevice::default();

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer =
            Tokenizer::from_file(&tokenizer_path).map_err(|e| ModelError::TokenizerLoad {
                path: tokenizer_path.clone(),
                message: e.to_string(),
            })?;

        let config_path = model_dir.join("model.json");
        let config =
            Gpt2ModelConfig::load(&config_path).map_err(|e| ModelError::ConfigLoad {
                path: config_path.clone(),
                message: e.to_string(),
            })?;

        let weights_path = model_dir.join("model");
        let record = CompactRecorder::new()
            .load(weights_path.clone(), &device)
            .map_err(|e| ModelError::WeightsLoad {
                path: weights_path.clone(),
                message: e.to_string(),
            })?;
        let model = config.init::<ScorerBackend>(&device).load_record(record);

        tracing::info!(
            "Loaded GPT-2 scorer from {} ({} layers, d_model {})",
            model_dir.display(),
            config.num_layers,
            config.d_model
        );

        Ok(Self {
            tokenizer,
            model,
            device,
            max_tokens: MAX_SCORE_TOKENS,
        })
    }

    /// Build a scorer from already-constructed parts. Used by tests and
    /// by callers that manage their own checkpoints.
    pub fn from_parts(tokenizer: Tokenizer, model: Gpt2Model<ScorerBackend>) -> Self {
        Self {
            tokenizer,
            model,
            device: NdArrayDevice::default(),
            max_tokens: MAX_SCORE_TOKENS,
        }
    }

    /// Perplexity of `text`: encode, truncate to the token bound, one
    /// forward pass with inputs as labels, exp(loss). Deterministic for
    /// fixed weights and input. Fewer than two tokens yields 0.0.
    pub fn perplexity(&self, text: &str) -> Result<f64, ModelError> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| ModelError::Encode(e.to_string()))?;

        let mut ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        ids.truncate(self.max_tokens);

        Ok(perplexity_of_ids(&self.model, &self.device, &ids))
    }
}

/// Core scoring step, shared with tests: exp of the next-token
/// cross-entropy loss over one sequence.
pub fn perplexity_of_ids(
    model: &Gpt2Model<ScorerBackend>,
    device: &NdArrayDevice,
    ids: &[i64],
) -> f64 {
    // Next-token loss is undefined for fewer than two tokens; the
    // all-values-finite invariant maps that to 0.0.
    if ids.len() < 2 {
        return 0.0;
    }

    let seq_len = ids.len();
    let tokens = Tensor::<ScorerBackend, 1, Int>::from_ints(ids, device).reshape([1, seq_len]);
    let loss: f64 = model.forward_loss(tokens).into_scalar().into();
    loss.exp()
}
