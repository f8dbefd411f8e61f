/// Kernel property tests
///
/// Checks the algebraic properties the attention and feed-forward pipelines rely on.
use attnviz_core::Matrix;
use attnviz_cpu::{
    add_bias, elementwise_add, multiply, random_matrix, relu, softmax, transpose,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn sample_matrices() -> Vec<Matrix> {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut out = Vec::new();
    for (rows, cols) in [(1, 1), (1, 5), (3, 3), (4, 2), (7, 10), (10, 10)] {
        out.push(random_matrix(&mut rng, rows, cols, 3.0));
    }
    out.push(Matrix::from_rows(&[vec![0.0, 0.0, 0.0], vec![-50.0, 50.0, 0.0]]).unwrap());
    out
}

#[test]
fn test_multiply_shape_and_entries() {
    let mut rng = StdRng::seed_from_u64(3);
    let a = random_matrix(&mut rng, 3, 4, 1.0);
    let b = random_matrix(&mut rng, 4, 5, 1.0);

    let c = multiply(&a, &b).unwrap();
    assert_eq!((c.rows(), c.cols()), (3, 5));

    for i in 0..3 {
        for j in 0..5 {
            let expected: f64 = (0..4).map(|k| a[(i, k)] * b[(k, j)]).sum();
            assert!((c[(i, j)] - expected).abs() < 1e-12, "entry ({i}, {j})");
        }
    }
}

#[test]
fn test_multiply_by_identity() {
    let mut rng = StdRng::seed_from_u64(4);
    let a = random_matrix(&mut rng, 4, 3, 1.0);
    assert!(multiply(&a, &Matrix::identity(3)).unwrap().approx_eq(&a, 0.0));
    assert!(multiply(&Matrix::identity(4), &a).unwrap().approx_eq(&a, 0.0));
}

#[test]
fn test_transpose_involution() {
    for a in sample_matrices() {
        let t = transpose(&a);
        assert_eq!((t.rows(), t.cols()), (a.cols(), a.rows()));
        assert_eq!(transpose(&t), a);
    }
}

#[test]
fn test_softmax_rows_are_distributions() {
    for a in sample_matrices() {
        let s = softmax(&a);
        assert_eq!(s.shape(), a.shape());
        for row in s.iter_rows() {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "row sums to {sum}");
            assert!(row.iter().all(|&p| p > 0.0 && p <= 1.0), "row {row:?}");
        }
    }
}

#[test]
fn test_softmax_shift_invariance() {
    for a in sample_matrices() {
        for c in [-100.0, -1.5, 0.25, 42.0] {
            let shifted = attnviz_cpu::map(&a, |x| x + c);
            assert!(softmax(&a).approx_eq(&softmax(&shifted), 1e-9), "shift {c}");
        }
    }
}

#[test]
fn test_softmax_two_values() {
    let s = softmax(&Matrix::from_rows(&[vec![1.0, 0.0]]).unwrap());
    assert!((s[(0, 0)] - 0.7310585786).abs() < 1e-9);
    assert!((s[(0, 1)] - 0.2689414214).abs() < 1e-9);
}

#[test]
fn test_relu_elementwise() {
    for a in sample_matrices() {
        let r = relu(&a);
        assert_eq!(r.shape(), a.shape());
        for (x, y) in a.as_slice().iter().zip(r.as_slice()) {
            if *x > 0.0 {
                assert_eq!(y, x);
            } else {
                assert_eq!(*y, 0.0);
            }
        }
    }
}

#[test]
fn test_mismatches_return_errors() {
    let a = Matrix::zeros(2, 3);
    let b = Matrix::zeros(2, 3);

    assert!(multiply(&a, &b).unwrap_err().is_dimension_mismatch());
    assert!(add_bias(&a, &[1.0, 2.0]).unwrap_err().is_dimension_mismatch());
    assert!(elementwise_add(&a, &Matrix::zeros(3, 2)).unwrap_err().is_dimension_mismatch());

    // The compatible versions of the same calls succeed
    assert!(multiply(&a, &transpose(&b)).is_ok());
    assert!(add_bias(&a, &[1.0, 2.0, 3.0]).is_ok());
    assert!(elementwise_add(&a, &b).is_ok());
}
