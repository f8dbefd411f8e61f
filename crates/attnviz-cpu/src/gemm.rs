/// General Matrix Multiply (GEMM) kernels
///
/// Naive matrix multiplication and transpose over row-major `Matrix` values.
use attnviz_core::error::{Error, Result};
use attnviz_core::Matrix;

/// Naive matrix multiplication: C = A * B
///
/// A: [M, K]
/// B: [K, N]
/// C: [M, N]
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if a.cols() != b.rows() {
        return Err(Error::mismatch("multiply", a.shape(), b.shape()));
    }

    let (m, k, n) = (a.rows(), a.cols(), b.cols());
    let a_data = a.as_slice();
    let b_data = b.as_slice();
    let mut c = vec![0.0; m * n];

    for i in 0..m {
        for j in 0..n {
            let mut sum = 0.0;
            for l in 0..k {
                sum += a_data[i * k + l] * b_data[l * n + j];
            }
            c[i * n + j] = sum;
        }
    }

    Matrix::from_vec(m, n, c)
}

/// Matrix multiplication with transposed B: C = A * B^T
///
/// A: [M, K]
/// B: [N, K] (accessed as transposed)
/// C: [M, N]
///
/// Used for attention scores, where both Q and K are [tokens, head_dim].
pub fn multiply_transposed(a: &Matrix, b_t: &Matrix) -> Result<Matrix> {
    if a.cols() != b_t.cols() {
        return Err(Error::mismatch("multiply_transposed", a.shape(), b_t.shape()));
    }

    let (m, k, n) = (a.rows(), a.cols(), b_t.rows());
    let a_data = a.as_slice();
    let b_data = b_t.as_slice();
    let mut c = vec![0.0; m * n];

    for i in 0..m {
        for j in 0..n {
            let mut sum = 0.0;
            for l in 0..k {
                // B is stored as [N, K], so B^T[l, j] = B[j * k + l]
                sum += a_data[i * k + l] * b_data[j * k + l];
            }
            c[i * n + j] = sum;
        }
    }

    Matrix::from_vec(m, n, c)
}

/// Transpose: [M, N] -> [N, M]
pub fn transpose(a: &Matrix) -> Matrix {
    let data = a.as_slice();
    let n = a.cols();
    Matrix::from_fn(a.cols(), a.rows(), |i, j| data[j * n + i])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_matmul_2x2() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = m(&[&[5.0, 6.0], &[7.0, 8.0]]);

        let c = multiply(&a, &b).unwrap();

        // [1*5+2*7, 1*6+2*8]   [19, 22]
        // [3*5+4*7, 3*6+4*8] = [43, 50]
        assert_eq!(c.to_rows(), vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
    }

    #[test]
    fn test_matmul_rectangular_shape() {
        let a = Matrix::zeros(3, 4);
        let b = Matrix::zeros(4, 2);
        let c = multiply(&a, &b).unwrap();
        assert_eq!((c.rows(), c.cols()), (3, 2));
    }

    #[test]
    fn test_matmul_mismatch() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        let err = multiply(&a, &b).unwrap_err();
        assert!(err.is_dimension_mismatch());
    }

    #[test]
    fn test_matmul_transposed_matches_explicit() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let b = m(&[&[1.0, 0.0, -1.0], &[2.0, 1.0, 0.5]]);

        let fused = multiply_transposed(&a, &b).unwrap();
        let explicit = multiply(&a, &transpose(&b)).unwrap();
        assert!(fused.approx_eq(&explicit, 1e-12));
    }

    #[test]
    fn test_transpose() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let t = transpose(&a);
        assert_eq!(t.to_rows(), vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]);
        assert_eq!(transpose(&t), a);
    }
}
