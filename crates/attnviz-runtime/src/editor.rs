//! Cell selection and value editing
//!
//! The editor tracks at most one selected cell of an input matrix and the
//! optional wiggle running on it. It holds no matrices itself; the session
//! applies the values the editor hands back.

use attnviz_core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::transformer::WiggleConfig;
use crate::wiggle::Wiggle;

/// Every matrix the view shows. Only inputs are editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixId {
    Embeddings,
    Query,
    Key,
    Value,
    Q,
    K,
    V,
    RawScores,
    Scores,
    Weights,
    AttentionOutput,
    W1,
    B1,
    W2,
    B2,
    Hidden,
    Activated,
    MlpOutput,
}

impl MatrixId {
    /// Display order, following the data flow
    pub const ALL: [MatrixId; 18] = [
        MatrixId::Embeddings,
        MatrixId::Query,
        MatrixId::Key,
        MatrixId::Value,
        MatrixId::Q,
        MatrixId::K,
        MatrixId::V,
        MatrixId::RawScores,
        MatrixId::Scores,
        MatrixId::Weights,
        MatrixId::AttentionOutput,
        MatrixId::W1,
        MatrixId::B1,
        MatrixId::W2,
        MatrixId::B2,
        MatrixId::Hidden,
        MatrixId::Activated,
        MatrixId::MlpOutput,
    ];

    pub fn is_editable(self) -> bool {
        matches!(
            self,
            MatrixId::Embeddings
                | MatrixId::Query
                | MatrixId::Key
                | MatrixId::Value
                | MatrixId::W1
                | MatrixId::B1
                | MatrixId::W2
                | MatrixId::B2
        )
    }

    /// Stable name used by the browser bindings (matches the serde form)
    pub fn key(self) -> &'static str {
        match self {
            MatrixId::Embeddings => "embeddings",
            MatrixId::Query => "query",
            MatrixId::Key => "key",
            MatrixId::Value => "value",
            MatrixId::Q => "q",
            MatrixId::K => "k",
            MatrixId::V => "v",
            MatrixId::RawScores => "raw_scores",
            MatrixId::Scores => "scores",
            MatrixId::Weights => "weights",
            MatrixId::AttentionOutput => "attention_output",
            MatrixId::W1 => "w1",
            MatrixId::B1 => "b1",
            MatrixId::W2 => "w2",
            MatrixId::B2 => "b2",
            MatrixId::Hidden => "hidden",
            MatrixId::Activated => "activated",
            MatrixId::MlpOutput => "mlp_output",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatrixId::Embeddings => "Embeddings",
            MatrixId::Query => "W_Q",
            MatrixId::Key => "W_K",
            MatrixId::Value => "W_V",
            MatrixId::Q => "Q",
            MatrixId::K => "K",
            MatrixId::V => "V",
            MatrixId::RawScores => "Q·Kᵀ",
            MatrixId::Scores => "Scores",
            MatrixId::Weights => "Attention weights",
            MatrixId::AttentionOutput => "Attention output",
            MatrixId::W1 => "W1",
            MatrixId::B1 => "b1",
            MatrixId::W2 => "W2",
            MatrixId::B2 => "b2",
            MatrixId::Hidden => "Hidden",
            MatrixId::Activated => "ReLU(hidden)",
            MatrixId::MlpOutput => "MLP output",
        }
    }

    /// Axis prefixes for row and column labels
    pub fn axes(self) -> (Axis, Axis) {
        match self {
            MatrixId::Embeddings => (Axis::Token, Axis::Embedding),
            MatrixId::Query | MatrixId::Key | MatrixId::Value => (Axis::Embedding, Axis::Head),
            MatrixId::Q | MatrixId::K | MatrixId::V | MatrixId::AttentionOutput => {
                (Axis::Token, Axis::Head)
            }
            MatrixId::RawScores | MatrixId::Scores | MatrixId::Weights => {
                (Axis::Token, Axis::Token)
            }
            MatrixId::W1 => (Axis::Head, Axis::Hidden),
            MatrixId::B1 => (Axis::Bias, Axis::Hidden),
            MatrixId::W2 => (Axis::Hidden, Axis::Output),
            MatrixId::B2 => (Axis::Bias, Axis::Output),
            MatrixId::Hidden | MatrixId::Activated => (Axis::Token, Axis::Hidden),
            MatrixId::MlpOutput => (Axis::Token, Axis::Output),
        }
    }
}

impl FromStr for MatrixId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MatrixId::ALL
            .into_iter()
            .find(|id| id.key() == s)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown matrix '{}'", s)))
    }
}

impl fmt::Display for MatrixId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a matrix row or column indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Token,
    Embedding,
    Head,
    Hidden,
    Output,
    Bias,
}

impl Axis {
    pub fn label(self, index: usize) -> String {
        match self {
            Axis::Token => format!("tok {}", index),
            Axis::Embedding => format!("e{}", index),
            Axis::Head => format!("h{}", index),
            Axis::Hidden => format!("n{}", index),
            Axis::Output => format!("o{}", index),
            Axis::Bias => "bias".to_string(),
        }
    }
}

/// One scalar in an input matrix. Biases are addressed as row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub matrix: MatrixId,
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(matrix: MatrixId, row: usize, col: usize) -> Self {
        Self { matrix, row, col }
    }
}

/// Range and step of the value slider
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliderSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

pub const SLIDER: SliderSpec = SliderSpec { min: -10.0, max: 10.0, step: 0.01 };

impl SliderSpec {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Clamp into range, then round to the nearest step
    pub fn quantize(&self, value: f64) -> f64 {
        let stepped = (self.clamp(value) / self.step).round() * self.step;
        // Rounding can land a hair outside the range at the edges
        self.clamp(stepped)
    }
}

/// Selection and wiggle state
#[derive(Debug, Clone, Default)]
pub struct Editor {
    selected: Option<CellRef>,
    wiggle_enabled: bool,
    wiggle: Option<Wiggle>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<CellRef> {
        self.selected
    }

    pub fn wiggle_enabled(&self) -> bool {
        self.wiggle_enabled
    }

    /// True while a timer should be driving `tick`
    pub fn is_wiggling(&self) -> bool {
        self.wiggle.is_some()
    }

    /// Select `cell`, whose current value is `value`. Any running wiggle is
    /// cancelled and, if the mode is on, restarted on the new cell.
    pub fn select(&mut self, cell: CellRef, value: f64, config: &WiggleConfig) -> Result<()> {
        if !cell.matrix.is_editable() {
            return Err(Error::NotEditable(cell.matrix.label().to_string()));
        }
        self.selected = Some(cell);
        self.wiggle = self.wiggle_enabled.then(|| Wiggle::new(value, config));
        Ok(())
    }

    pub fn deselect(&mut self) -> Option<CellRef> {
        self.wiggle = None;
        self.selected.take()
    }

    /// Turn the wiggle mode on or off. `current` is the selected cell's value.
    pub fn set_wiggle(&mut self, enabled: bool, current: Option<f64>, config: &WiggleConfig) {
        self.wiggle_enabled = enabled;
        self.wiggle = match (enabled, self.selected, current) {
            (true, Some(_), Some(value)) => Some(Wiggle::new(value, config)),
            _ => None,
        };
    }

    /// A manual edit while wiggling moves the oscillation center
    pub fn rebase(&mut self, value: f64) {
        if let Some(wiggle) = self.wiggle.as_mut() {
            wiggle.rebase(value);
        }
    }

    /// Value the selected cell should take at `now`, if a wiggle is running
    pub fn tick(&mut self, now: Duration) -> Option<(CellRef, f64)> {
        let cell = self.selected?;
        let value = self.wiggle.as_mut()?.sample(now);
        Some((cell, SLIDER.clamp(value)))
    }
}
