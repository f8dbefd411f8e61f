//! Visualizer configuration structs

use attnviz_core::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Largest dimension the grid view is laid out for
pub const MAX_DIM: usize = 10;

/// Shape and display configuration for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Number of input tokens (rows of the embedding matrix)
    pub num_tokens: usize,
    /// Embedding dimension
    pub embedding_dim: usize,
    /// Query/key/value projection width
    pub head_dim: usize,
    /// Feed-forward hidden width
    pub hidden_dim: usize,
    /// Feed-forward output width
    pub output_dim: usize,
    /// Scale passed to random initialization (stddev = scale / sqrt(cols))
    pub init_scale: f64,
    /// Magnitude that maps to half saturation in the cell palette
    pub color_max_abs: f64,
    /// Continuous perturbation settings
    pub wiggle: WiggleConfig,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            num_tokens: 4,
            embedding_dim: 4,
            head_dim: 4,
            hidden_dim: 8,
            output_dim: 4,
            init_scale: 1.0,
            color_max_abs: 1.0,
            wiggle: WiggleConfig::default(),
        }
    }
}

impl VisualizerConfig {
    /// The larger 10-token, 6-dimension layout
    pub fn documented() -> Self {
        Self {
            num_tokens: 10,
            embedding_dim: 6,
            head_dim: 6,
            hidden_dim: 10,
            output_dim: 6,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON object; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let dims = [
            ("num_tokens", self.num_tokens),
            ("embedding_dim", self.embedding_dim),
            ("head_dim", self.head_dim),
            ("hidden_dim", self.hidden_dim),
            ("output_dim", self.output_dim),
        ];
        for (name, value) in dims {
            if value == 0 || value > MAX_DIM {
                return Err(Error::InvalidConfig(format!(
                    "{} must be in 1..={}, got {}",
                    name, MAX_DIM, value
                )));
            }
        }

        let positive = [
            ("init_scale", self.init_scale),
            ("color_max_abs", self.color_max_abs),
            ("wiggle.frequency_hz", self.wiggle.frequency_hz),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!("{} must be > 0, got {}", name, value)));
            }
        }

        if !(self.wiggle.amplitude.is_finite() && self.wiggle.amplitude >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "wiggle.amplitude must be >= 0, got {}",
                self.wiggle.amplitude
            )));
        }
        if self.wiggle.interval_ms == 0 {
            return Err(Error::InvalidConfig("wiggle.interval_ms must be > 0".into()));
        }

        Ok(())
    }
}

/// Continuous perturbation ("wiggle") configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WiggleConfig {
    /// Peak deviation from the value the cell held when the wiggle started
    pub amplitude: f64,
    /// Oscillation frequency
    pub frequency_hz: f64,
    /// Timer period (16 ms is roughly 60 updates per second)
    pub interval_ms: u32,
}

impl Default for WiggleConfig {
    fn default() -> Self {
        Self { amplitude: 1.0, frequency_hz: 0.5, interval_ms: 16 }
    }
}
