//! Feed-forward network implementation

use attnviz_core::error::Result;
use attnviz_core::Matrix;
use attnviz_cpu::{add_bias, multiply, random_matrix, random_vector, relu};
use rand::Rng;
use serde::Serialize;

use super::VisualizerConfig;

/// Two-layer MLP weights
#[derive(Debug, Clone, PartialEq)]
pub struct MlpWeights {
    /// First layer [input_dim, hidden_dim]
    pub w1: Matrix,
    /// First layer bias [hidden_dim]
    pub b1: Vec<f64>,
    /// Second layer [hidden_dim, output_dim]
    pub w2: Matrix,
    /// Second layer bias [output_dim]
    pub b2: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MlpOutput {
    /// X * W1 + b1
    pub hidden: Matrix,
    /// ReLU(hidden)
    pub activated: Matrix,
    /// activated * W2 + b2
    pub output: Matrix,
}

impl MlpWeights {
    pub fn new(w1: Matrix, b1: Vec<f64>, w2: Matrix, b2: Vec<f64>) -> Self {
        Self { w1, b1, w2, b2 }
    }

    /// The MLP input is the attention output, so input_dim == head_dim
    pub fn random<R: Rng + ?Sized>(rng: &mut R, config: &VisualizerConfig) -> Self {
        let s = config.init_scale;
        Self {
            w1: random_matrix(rng, config.head_dim, config.hidden_dim, s),
            b1: random_vector(rng, config.hidden_dim, s),
            w2: random_matrix(rng, config.hidden_dim, config.output_dim, s),
            b2: random_vector(rng, config.output_dim, s),
        }
    }

    /// Single forward pass over `input` [tokens, input_dim]
    pub fn forward(&self, input: &Matrix) -> Result<MlpOutput> {
        let hidden = add_bias(&multiply(input, &self.w1)?, &self.b1)?;
        let activated = relu(&hidden);
        let output = add_bias(&multiply(&activated, &self.w2)?, &self.b2)?;

        Ok(MlpOutput { hidden, activated, output })
    }
}
