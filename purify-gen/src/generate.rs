use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::GeneratorConfig;

pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

// Box-Muller transform over two uniform draws.
pub fn sample_normal<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-300);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

pub fn inlier_count(config: &GeneratorConfig) -> usize {
    let n = (config.samples as f64 * (1.0 - config.outlier_fraction)).round() as usize;
    n.min(config.samples)
}

/// Draws the mixture described by `config`: inliers first, then outliers.
pub fn generate<R: Rng>(config: &GeneratorConfig, rng: &mut R) -> Vec<f64> {
    let n_in = inlier_count(config);
    let n_out = config.samples - n_in;
    let mut values = Vec::with_capacity(config.samples);
    for _ in 0..n_in {
        values.push(sample_normal(rng, config.inlier_mean, config.spread));
    }
    for _ in 0..n_out {
        values.push(sample_normal(rng, config.outlier_mean, config.spread));
    }
    values
}

pub fn shuffle<R: Rng>(mut values: Vec<f64>, rng: &mut R) -> Vec<f64> {
    values.shuffle(rng);
    values
}
