//! Transformer block implementation
//!
//! One self-attention head followed by a two-layer feed-forward network.

mod attention;
mod config;
mod ffn;

pub use attention::{AttentionOutput, AttentionWeights};
pub use config::{VisualizerConfig, WiggleConfig, MAX_DIM};
pub use ffn::{MlpOutput, MlpWeights};
