/// Statistical checks for the Box–Muller sampler and matrix initialization
use attnviz_cpu::{init_stddev, random_matrix, random_normal};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn mean_and_stddev(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

#[test]
fn test_random_normal_moments() {
    let mut rng = StdRng::seed_from_u64(11);
    let samples: Vec<f64> = (0..50_000).map(|_| random_normal(&mut rng, 2.0, 0.5)).collect();

    let (mean, stddev) = mean_and_stddev(&samples);
    assert!((mean - 2.0).abs() < 0.02, "mean {mean}");
    assert!((stddev - 0.5).abs() < 0.02, "stddev {stddev}");
}

#[test]
fn test_random_matrix_moments() {
    let mut rng = StdRng::seed_from_u64(12);
    let cols = 8;
    let scale = 2.0;

    let mut samples = Vec::new();
    for _ in 0..2_000 {
        samples.extend_from_slice(random_matrix(&mut rng, 4, cols, scale).as_slice());
    }

    let expected = init_stddev(cols, scale);
    let (mean, stddev) = mean_and_stddev(&samples);
    assert!(mean.abs() < 0.02, "mean {mean}");
    assert!((stddev - expected).abs() < 0.02, "stddev {stddev}, expected {expected}");
}

#[test]
fn test_unseeded_draws_differ() {
    let mut rng = rand::rng();
    let a = random_matrix(&mut rng, 3, 3, 1.0);
    let b = random_matrix(&mut rng, 3, 3, 1.0);
    assert_ne!(a, b);
}
