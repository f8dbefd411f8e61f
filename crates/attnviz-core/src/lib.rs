//! Core primitives for attnviz
//!
//! This crate provides the value types shared by the kernel and the runtime:
//! - Row-major `Matrix` with value semantics
//! - `Shape` descriptors used in error reporting
//! - The workspace-wide `Error` and `Result`

pub mod error;
pub mod matrix;

pub use error::{Error, Result};
pub use matrix::{Matrix, Shape};

/// Core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
