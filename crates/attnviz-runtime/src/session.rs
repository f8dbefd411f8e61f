//! Interactive visualization session
//!
//! A `Session` owns the input matrices, recomputes every derived matrix
//! eagerly after each mutation, and exposes a serializable snapshot for the
//! front-end to paint.

use attnviz_core::error::{Error, Result};
use attnviz_core::Matrix;
use attnviz_cpu::random_matrix;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::editor::{Axis, CellRef, Editor, MatrixId, SliderSpec, SLIDER};
use crate::palette::{format_value, Palette};
use crate::transformer::{
    AttentionOutput, AttentionWeights, MlpOutput, MlpWeights, VisualizerConfig,
};

/// View toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    /// Row and column axis labels
    pub show_labels: bool,
    /// Numeric text in each cell instead of color only
    pub show_values: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self { show_labels: true, show_values: false }
    }
}

pub struct Session {
    config: VisualizerConfig,
    palette: Palette,
    rng: StdRng,
    embeddings: Matrix,
    attention_weights: AttentionWeights,
    mlp_weights: MlpWeights,
    attention: AttentionOutput,
    mlp: MlpOutput,
    editor: Editor,
    display: DisplayOptions,
}

impl Session {
    /// Create a session with randomly initialized inputs
    pub fn new(config: VisualizerConfig) -> Result<Self> {
        Self::from_rng(config, StdRng::from_os_rng())
    }

    /// Like [`Session::new`] with a reproducible draw
    pub fn with_seed(config: VisualizerConfig, seed: u64) -> Result<Self> {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Create a session around explicit inputs. Shapes are checked by the
    /// first computation.
    pub fn from_inputs(
        config: VisualizerConfig,
        embeddings: Matrix,
        attention_weights: AttentionWeights,
        mlp_weights: MlpWeights,
    ) -> Result<Self> {
        Self::from_parts(
            config,
            StdRng::from_os_rng(),
            embeddings,
            attention_weights,
            mlp_weights,
        )
    }

    fn from_rng(config: VisualizerConfig, mut rng: StdRng) -> Result<Self> {
        config.validate()?;
        let (embeddings, attention_weights, mlp_weights) = draw_inputs(&mut rng, &config);
        log::info!(
            "session: {} tokens, embedding_dim={}, head_dim={}, hidden_dim={}",
            config.num_tokens,
            config.embedding_dim,
            config.head_dim,
            config.hidden_dim
        );
        Self::from_parts(config, rng, embeddings, attention_weights, mlp_weights)
    }

    fn from_parts(
        config: VisualizerConfig,
        rng: StdRng,
        embeddings: Matrix,
        attention_weights: AttentionWeights,
        mlp_weights: MlpWeights,
    ) -> Result<Self> {
        let attention = attention_weights.forward(&embeddings)?;
        let mlp = mlp_weights.forward(&attention.output)?;

        Ok(Self {
            palette: Palette::with_max_abs(config.color_max_abs),
            config,
            rng,
            embeddings,
            attention_weights,
            mlp_weights,
            attention,
            mlp,
            editor: Editor::new(),
            display: DisplayOptions::default(),
        })
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn embeddings(&self) -> &Matrix {
        &self.embeddings
    }

    pub fn attention_weights(&self) -> &AttentionWeights {
        &self.attention_weights
    }

    pub fn mlp_weights(&self) -> &MlpWeights {
        &self.mlp_weights
    }

    /// Latest attention intermediates
    pub fn attention(&self) -> &AttentionOutput {
        &self.attention
    }

    /// Latest feed-forward intermediates
    pub fn mlp(&self) -> &MlpOutput {
        &self.mlp
    }

    pub fn display(&self) -> DisplayOptions {
        self.display
    }

    fn recompute(&mut self) -> Result<()> {
        let attention = self.attention_weights.forward(&self.embeddings)?;
        let mlp = self.mlp_weights.forward(&attention.output)?;
        self.attention = attention;
        self.mlp = mlp;
        log::debug!("recomputed attention and feed-forward outputs");
        Ok(())
    }

    /// Redraw embeddings and every weight, then recompute
    pub fn randomize(&mut self) -> Result<()> {
        let (embeddings, attention_weights, mlp_weights) = draw_inputs(&mut self.rng, &self.config);
        self.embeddings = embeddings;
        self.attention_weights = attention_weights;
        self.mlp_weights = mlp_weights;
        self.recompute()?;
        log::info!("randomized all inputs");

        // A running wiggle restarts around the freshly drawn value
        if let Some(cell) = self.editor.selected() {
            let value = self.value(cell)?;
            self.editor.select(cell, value, &self.config.wiggle)?;
        }
        Ok(())
    }

    /// Owned copy of any matrix the view shows; biases come back as 1 x n
    pub fn matrix(&self, id: MatrixId) -> Matrix {
        match id {
            MatrixId::Embeddings => self.embeddings.clone(),
            MatrixId::Query => self.attention_weights.wq.clone(),
            MatrixId::Key => self.attention_weights.wk.clone(),
            MatrixId::Value => self.attention_weights.wv.clone(),
            MatrixId::Q => self.attention.q.clone(),
            MatrixId::K => self.attention.k.clone(),
            MatrixId::V => self.attention.v.clone(),
            MatrixId::RawScores => self.attention.raw_scores.clone(),
            MatrixId::Scores => self.attention.scores.clone(),
            MatrixId::Weights => self.attention.weights.clone(),
            MatrixId::AttentionOutput => self.attention.output.clone(),
            MatrixId::W1 => self.mlp_weights.w1.clone(),
            MatrixId::B1 => Matrix::row_vector(&self.mlp_weights.b1),
            MatrixId::W2 => self.mlp_weights.w2.clone(),
            MatrixId::B2 => Matrix::row_vector(&self.mlp_weights.b2),
            MatrixId::Hidden => self.mlp.hidden.clone(),
            MatrixId::Activated => self.mlp.activated.clone(),
            MatrixId::MlpOutput => self.mlp.output.clone(),
        }
    }

    pub fn value(&self, cell: CellRef) -> Result<f64> {
        let m = self.matrix(cell.matrix);
        m.get(cell.row, cell.col)
            .ok_or(Error::OutOfBounds { row: cell.row, col: cell.col, shape: m.shape() })
    }

    fn write_cell(&mut self, cell: CellRef, value: f64) -> Result<()> {
        let CellRef { matrix, row, col } = cell;
        match matrix {
            MatrixId::Embeddings => self.embeddings.set(row, col, value),
            MatrixId::Query => self.attention_weights.wq.set(row, col, value),
            MatrixId::Key => self.attention_weights.wk.set(row, col, value),
            MatrixId::Value => self.attention_weights.wv.set(row, col, value),
            MatrixId::W1 => self.mlp_weights.w1.set(row, col, value),
            MatrixId::W2 => self.mlp_weights.w2.set(row, col, value),
            MatrixId::B1 => write_bias(&mut self.mlp_weights.b1, row, col, value),
            MatrixId::B2 => write_bias(&mut self.mlp_weights.b2, row, col, value),
            derived => Err(Error::NotEditable(derived.label().to_string())),
        }
    }

    pub fn selected(&self) -> Option<CellRef> {
        self.editor.selected()
    }

    pub fn selected_value(&self) -> Option<f64> {
        self.selected().and_then(|cell| self.value(cell).ok())
    }

    /// Select an input cell. Replaces any previous selection and cancels its wiggle.
    pub fn select(&mut self, cell: CellRef) -> Result<()> {
        let value = self.value(cell)?;
        self.editor.select(cell, value, &self.config.wiggle)?;
        log::debug!("selected {} ({}, {}) = {:.3}", cell.matrix, cell.row, cell.col, value);
        Ok(())
    }

    pub fn deselect(&mut self) {
        if let Some(cell) = self.editor.deselect() {
            log::debug!("deselected {} ({}, {})", cell.matrix, cell.row, cell.col);
        }
    }

    /// Write the selected cell and recompute. Returns the value actually
    /// stored after clamping to the slider range and snapping to its step.
    pub fn set_selected_value(&mut self, value: f64) -> Result<f64> {
        let cell = self.editor.selected().ok_or(Error::NoSelection)?;
        if value.is_nan() {
            return Err(Error::InvalidValue(value));
        }
        let stored = SLIDER.quantize(value);
        if SLIDER.clamp(value) != value {
            log::warn!("value {} clamped to {}", value, stored);
        }
        self.write_cell(cell, stored)?;
        self.editor.rebase(stored);
        self.recompute()?;
        Ok(stored)
    }

    pub fn wiggle_enabled(&self) -> bool {
        self.editor.wiggle_enabled()
    }

    /// True while a timer should be calling [`Session::tick`]
    pub fn is_wiggling(&self) -> bool {
        self.editor.is_wiggling()
    }

    pub fn set_wiggle(&mut self, enabled: bool) {
        let current = self.selected_value();
        self.editor.set_wiggle(enabled, current, &self.config.wiggle);
        log::debug!("wiggle {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Advance the wiggle to timestamp `now`. Returns whether anything changed.
    pub fn tick(&mut self, now: Duration) -> Result<bool> {
        let Some((cell, value)) = self.editor.tick(now) else {
            return Ok(false);
        };
        self.write_cell(cell, value)?;
        self.recompute()?;
        Ok(true)
    }

    pub fn set_show_labels(&mut self, show: bool) {
        self.display.show_labels = show;
    }

    pub fn set_show_values(&mut self, show: bool) {
        self.display.show_values = show;
    }

    /// Everything the front-end needs to paint one frame
    pub fn snapshot(&self) -> Snapshot {
        let matrices = MatrixId::ALL.iter().map(|&id| self.matrix_view(id)).collect();
        Snapshot {
            matrices,
            selected: self.selected(),
            selected_value: self.selected_value(),
            wiggle_enabled: self.wiggle_enabled(),
            wiggling: self.is_wiggling(),
            display: self.display,
            slider: SLIDER,
        }
    }

    fn matrix_view(&self, id: MatrixId) -> MatrixView {
        let m = self.matrix(id);
        let colors: Vec<Vec<String>> = m
            .iter_rows()
            .map(|row| row.iter().map(|&v| self.palette.color(v).to_hex()).collect())
            .collect();
        let text: Option<Vec<Vec<String>>> = self.display.show_values.then(|| {
            m.iter_rows().map(|row| row.iter().map(|&v| format_value(v)).collect()).collect()
        });
        let (row_axis, col_axis) = id.axes();
        let labels = |axis: Axis, n: usize| -> Option<Vec<String>> {
            self.display.show_labels.then(|| (0..n).map(|i| axis.label(i)).collect())
        };
        let row_labels = labels(row_axis, m.rows());
        let col_labels = labels(col_axis, m.cols());

        MatrixView {
            id,
            label: id.label(),
            editable: id.is_editable(),
            rows: m.rows(),
            cols: m.cols(),
            values: m.to_rows(),
            colors,
            text,
            row_labels,
            col_labels,
        }
    }
}

fn write_bias(bias: &mut [f64], row: usize, col: usize, value: f64) -> Result<()> {
    match bias.get_mut(col) {
        Some(slot) if row == 0 => {
            *slot = value;
            Ok(())
        }
        _ => Err(Error::OutOfBounds {
            row,
            col,
            shape: attnviz_core::Shape::new(1, bias.len()),
        }),
    }
}

fn draw_inputs(
    rng: &mut StdRng,
    config: &VisualizerConfig,
) -> (Matrix, AttentionWeights, MlpWeights) {
    let embeddings =
        random_matrix(rng, config.num_tokens, config.embedding_dim, config.init_scale);
    let attention_weights = AttentionWeights::random(rng, config);
    let mlp_weights = MlpWeights::random(rng, config);
    (embeddings, attention_weights, mlp_weights)
}

/// One matrix as the front-end paints it
#[derive(Debug, Clone, Serialize)]
pub struct MatrixView {
    pub id: MatrixId,
    pub label: &'static str,
    pub editable: bool,
    pub rows: usize,
    pub cols: usize,
    pub values: Vec<Vec<f64>>,
    /// CSS hex color per cell
    pub colors: Vec<Vec<String>>,
    /// Formatted values, present when `show_values` is on
    pub text: Option<Vec<Vec<String>>>,
    pub row_labels: Option<Vec<String>>,
    pub col_labels: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub matrices: Vec<MatrixView>,
    pub selected: Option<CellRef>,
    pub selected_value: Option<f64>,
    pub wiggle_enabled: bool,
    pub wiggling: bool,
    pub display: DisplayOptions,
    pub slider: SliderSpec,
}

impl Snapshot {
    pub fn matrix(&self, id: MatrixId) -> Option<&MatrixView> {
        self.matrices.iter().find(|m| m.id == id)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
