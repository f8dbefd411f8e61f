//! attnviz runtime
//!
//! Composes the CPU kernels into a single self-attention head followed by a
//! feed-forward block, and wraps them in an interactive session that the
//! browser front-end drives through `wasm-bindgen`.

pub mod editor;
pub mod listener;
pub mod palette;
pub mod session;
pub mod transformer;
pub mod web;
pub mod wiggle;

pub use attnviz_core::{Error, Matrix, Result, Shape};
pub use editor::{Axis, CellRef, Editor, MatrixId, SliderSpec, SLIDER};
pub use listener::ChangeListener;
pub use palette::{format_value, normalize, Palette, Rgb};
pub use session::{DisplayOptions, MatrixView, Session, Snapshot};
pub use transformer::{
    AttentionOutput, AttentionWeights, MlpOutput, MlpWeights, VisualizerConfig, WiggleConfig,
    MAX_DIM,
};
pub use wiggle::Wiggle;

#[cfg(target_arch = "wasm32")]
pub use web::*;

/// Runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
