use thiserror::Error;

use crate::matrix::Shape;

/// Core error types for attnviz
#[derive(Error, Debug)]
pub enum Error {
    #[error("Dimension mismatch in {op}: left is {left}, right is {right}")]
    DimensionMismatch { op: &'static str, left: Shape, right: Shape },

    #[error("Invalid matrix shape: {0}")]
    InvalidShape(String),

    #[error("Cell ({row}, {col}) is outside a {shape} matrix")]
    OutOfBounds { row: usize, col: usize, shape: Shape },

    #[error("No cell is selected")]
    NoSelection,

    #[error("Value {0} is not a number")]
    InvalidValue(f64),

    #[error("{0} is derived and cannot be edited")]
    NotEditable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn mismatch(op: &'static str, left: Shape, right: Shape) -> Self {
        Error::DimensionMismatch { op, left, right }
    }

    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Error::DimensionMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
