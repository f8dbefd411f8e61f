//! Single-head scaled dot-product self-attention

use attnviz_core::error::{Error, Result};
use attnviz_core::Matrix;
use attnviz_cpu::{multiply, multiply_transposed, random_matrix, scale, softmax};
use rand::Rng;
use serde::Serialize;

use super::VisualizerConfig;

/// Query, key and value projections, each [embedding_dim, head_dim]
#[derive(Debug, Clone, PartialEq)]
pub struct AttentionWeights {
    pub wq: Matrix,
    pub wk: Matrix,
    pub wv: Matrix,
}

/// Every intermediate of one attention pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttentionOutput {
    /// Q = E * Wq [tokens, head_dim]
    pub q: Matrix,
    /// K = E * Wk [tokens, head_dim]
    pub k: Matrix,
    /// V = E * Wv [tokens, head_dim]
    pub v: Matrix,
    /// Q * K^T before scaling [tokens, tokens]
    pub raw_scores: Matrix,
    /// Q * K^T / sqrt(head_dim) [tokens, tokens]
    pub scores: Matrix,
    /// Row-wise softmax of `scores`; row i is token i's distribution over all tokens
    pub weights: Matrix,
    /// weights * V [tokens, head_dim]
    pub output: Matrix,
}

impl AttentionWeights {
    pub fn new(wq: Matrix, wk: Matrix, wv: Matrix) -> Self {
        Self { wq, wk, wv }
    }

    /// Identity projections (embedding_dim == head_dim == n)
    pub fn identity(n: usize) -> Self {
        Self::new(Matrix::identity(n), Matrix::identity(n), Matrix::identity(n))
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R, config: &VisualizerConfig) -> Self {
        let (rows, cols, s) = (config.embedding_dim, config.head_dim, config.init_scale);
        Self {
            wq: random_matrix(rng, rows, cols, s),
            wk: random_matrix(rng, rows, cols, s),
            wv: random_matrix(rng, rows, cols, s),
        }
    }

    /// Run attention over `embeddings` [tokens, embedding_dim]
    pub fn forward(&self, embeddings: &Matrix) -> Result<AttentionOutput> {
        // Project to Q, K, V
        let q = multiply(embeddings, &self.wq)?;
        let k = multiply(embeddings, &self.wk)?;
        let v = multiply(embeddings, &self.wv)?;

        let head_dim = q.cols();
        if head_dim == 0 {
            return Err(Error::InvalidShape("attention needs head_dim > 0".into()));
        }

        // Scaled dot-product scores: Q * K^T / sqrt(head_dim)
        let raw_scores = multiply_transposed(&q, &k)?;
        let scores = scale(&raw_scores, 1.0 / (head_dim as f64).sqrt());
        let weights = softmax(&scores);

        let output = multiply(&weights, &v)?;

        Ok(AttentionOutput { q, k, v, raw_scores, scores, weights, output })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_shape() {
        let embeddings = Matrix::zeros(3, 4);
        let weights = AttentionWeights::new(
            Matrix::zeros(4, 2),
            Matrix::zeros(4, 2),
            Matrix::zeros(4, 2),
        );

        let out = weights.forward(&embeddings).unwrap();
        assert_eq!((out.output.rows(), out.output.cols()), (3, 2));
        assert_eq!((out.weights.rows(), out.weights.cols()), (3, 3));
    }

    #[test]
    fn test_zero_scores_give_uniform_weights() {
        let out = AttentionWeights::new(
            Matrix::zeros(2, 2),
            Matrix::zeros(2, 2),
            Matrix::identity(2),
        )
        .forward(&Matrix::identity(2))
        .unwrap();

        for row in out.weights.iter_rows() {
            assert!(row.iter().all(|&w| (w - 0.5).abs() < 1e-12));
        }
    }

    #[test]
    fn test_mismatched_embedding_width() {
        let err = AttentionWeights::identity(3).forward(&Matrix::zeros(2, 2)).unwrap_err();
        assert!(err.is_dimension_mismatch());
    }
}
