//! CPU kernels for attnviz
//!
//! Pure functions over `Matrix` values: every kernel allocates its result and
//! leaves its operands untouched.

pub mod gemm;
pub mod kernels;
pub mod random;

pub use gemm::{multiply, multiply_transposed, transpose};
pub use kernels::{add_bias, elementwise_add, map, relu, scale, softmax, softmax_row};
pub use random::{init_stddev, random_matrix, random_normal, random_vector};
