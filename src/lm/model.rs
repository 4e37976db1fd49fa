//! GPT-2-architecture causal decoder in Burn
//!
//! Pre-norm transformer blocks with masked multi-head self-attention and
//! a GELU feed-forward, token + learned position embeddings, final layer
//! norm, and an untied LM head. Used inference-only: the scorer runs a
//! single forward pass and reads off the next-token cross-entropy loss.

use burn::{
    nn::{
        attention::{
            generate_autoregressive_mask, MhaInput, MultiHeadAttention, MultiHeadAttentionConfig,
        },
        loss::CrossEntropyLossConfig,
        Dropout, DropoutConfig, Embedding, EmbeddingConfig, LayerNorm, LayerNormConfig, Linear,
        LinearConfig,
    },
    prelude::*,
};

#[derive(Config, Debug)]
pub struct Gpt2ModelConfig {
    #[config(default = 50257)]
    pub vocab_size: usize,
    #[config(default = 1024)]
    pub max_seq_len: usize,
    #[config(default = 768)]
    pub d_model: usize,
    #[config(default = 12)]
    pub num_heads: usize,
    #[config(default = 12)]
    pub num_layers: usize,
    #[config(default = 3072)]
    pub d_ff: usize,
    #[config(default = 0.0)]
    pub dropout: f64,
}

impl Gpt2ModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Gpt2Model<B> {
        let token_embedding = EmbeddingConfig::new(self.vocab_size, self.d_model).init(device);
        let position_embedding = EmbeddingConfig::new(self.max_seq_len, self.d_model).init(device);
        let blocks: Vec<DecoderBlock<B>> = (0..self.num_layers)
            .map(|_| self.build_decoder_block(device))
            .collect();
        let final_norm = LayerNormConfig::new(self.d_model).init(device);
        let lm_head = LinearConfig::new(self.d_model, self.vocab_size)
            .with_bias(false)
            .init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        Gpt2Model {
            token_embedding,
            position_embedding,
            blocks,
            final_norm,
            lm_head,
            dropout,
            max_seq_len: self.max_seq_len,
        }
    }

    fn build_decoder_block<B: Backend>(&self, device: &B::Device) -> DecoderBlock<B> {
        let norm1 = LayerNormConfig::new(self.d_model).init(device);
        let self_attn = MultiHeadAttentionConfig::new(self.d_model, self.num_heads)
            .with_dropout(self.dropout)
            .init(device);
        let norm2 = LayerNormConfig::new(self.d_model).init(device);
        let ffn_linear1 = LinearConfig::new(self.d_model, self.d_ff).init(device);
        let ffn_linear2 = LinearConfig::new(self.d_ff, self.d_model).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        DecoderBlock {
            norm1,
            self_attn,
            norm2,
            ffn_linear1,
            ffn_linear2,
            dropout,
        }
    }
}

#[derive(Module, Debug)]
pub struct DecoderBlock<B: Backend> {
    pub norm1: LayerNorm<B>,
    pub self_attn: MultiHeadAttention<B>,
    pub norm2: LayerNorm<B>,
    pub ffn_linear1: Linear<B>,
    pub ffn_linear2: Linear<B>,
    pub dropout: Dropout,
}

impl<B: Backend> DecoderBlock<B> {
    /// Pre-norm residual block: x + attn(ln1(x)), then x + mlp(ln2(x)).
    pub fn forward(&self, x: Tensor<B, 3>, mask: Tensor<B, 3, Bool>) -> Tensor<B, 3> {
        let attn_input = MhaInput::self_attn(self.norm1.forward(x.clone())).mask_attn(mask);
        let attn_out = self.self_attn.forward(attn_input).context;
        let x = x + self.dropout.forward(attn_out);

        let ffn_out = self.ffn_linear2.forward(burn::tensor::activation::gelu(
            self.ffn_linear1.forward(self.norm2.forward(x.clone())),
        ));
        x + self.dropout.forward(ffn_out)
    }
}

#[derive(Module, Debug)]
pub struct Gpt2Model<B: Backend> {
    pub token_embedding: Embedding<B>,
    pub position_embedding: Embedding<B>,
    pub blocks: Vec<DecoderBlock<B>>,
    pub final_norm: LayerNorm<B>,
    pub lm_head: Linear<B>,
    pub dropout: Dropout,
    pub max_seq_len: usize,
}

impl<B: Backend> Gpt2Model<B> {
    /// input_ids: [batch, seq_len] -> logits: [batch, seq_len, vocab]
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let [batch_size, seq_len] = input_ids.dims();
        let device = input_ids.device();

        let tok_emb = self.token_embedding.forward(input_ids);
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &device)
            .unsqueeze::<2>()
            .expand([batch_size, seq_len]);
        let pos_emb = self.position_embedding.forward(positions);

        let mask = generate_autoregressive_mask::<B>(batch_size, seq_len, &device);

        let mut x = self.dropout.forward(tok_emb + pos_emb);
        for block in &self.blocks {
            x = block.forward(x, mask.clone());
        }
        let x = self.final_norm.forward(x);

        self.lm_head.forward(x)
    }

    /// Next-token cross-entropy loss with the input sequence as both
    /// inputs and labels: logits at position t are scored against the
    /// token at t+1. Requires seq_len >= 2.
    pub fn forward_loss(&self, input_ids: Tensor<B, 2, Int>) -> Tensor<B, 1> {
        let [batch_size, seq_len] = input_ids.dims();
        debug_assert!(seq_len >= 2, "next-token loss needs at least 2 tokens");

        let logits = self.forward(input_ids.clone());
        let vocab = logits.dims()[2];

        let shifted_logits: Tensor<B, 2> = logits
            .slice([0..batch_size, 0..seq_len - 1, 0..vocab])
            .reshape([batch_size * (seq_len - 1), vocab]);
        let targets: Tensor<B, 1, Int> = input_ids
            .slice([0..batch_size, 1..seq_len])
            .reshape([batch_size * (seq_len - 1)]);

        CrossEntropyLossConfig::new()
            .init(&shifted_logits.device())
            .forward(shifted_logits, targets)
    }
}
