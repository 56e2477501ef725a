//! Sanity check for covariance synthesis and sampling.
//!
//! Builds the covariance for target `[1, 1]` with ratio `0.1`, prints it
//! along with its singular-value decomposition, then compares the empirical
//! covariance of zero-mean samples against it.
//!
//! Run with: cargo run --bin mixture_check -- [seed]

use std::process::ExitCode;

use manifold_mixture::{
    compare_covariances, empirical_covariance, sample_from_mixture, singular_values,
    synthesize_covariance, MixtureConfig, Result,
};
use nalgebra::{DMatrix, DVector};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const N_SAMPLES: usize = 1000;
const TOLERANCE: f64 = 0.15;

fn run(seed: u64) -> Result<bool> {
    let config = MixtureConfig::reproducible(seed);
    let mut rng = config.rng();

    let target = DVector::from_vec(vec![1.0, 1.0]);
    let ratio = 0.1;
    let cov = synthesize_covariance(&target, ratio, &mut rng, &config)?;

    println!("\ncovariance matrix generated{}", cov.matrix());

    let (values, right_vectors) = singular_values(cov.matrix());
    println!("\nsvd decomposition");
    println!("{values:?}");
    println!("{right_vectors}");

    let means = DMatrix::zeros(1, target.len());
    let set = sample_from_mixture(
        Some(&means),
        Some(std::slice::from_ref(cov.matrix())),
        N_SAMPLES,
        &mut rng,
    )?;

    let estimate = empirical_covariance(&set.samples, Some(&DVector::zeros(target.len())))?;
    println!("\nexperimental covariance{estimate}");

    let comparison = compare_covariances(&estimate, cov.matrix(), TOLERANCE)?;
    info!(
        seed,
        max_abs_error = comparison.max_abs_error,
        relative_error = comparison.relative_frobenius_error,
        consistent = comparison.is_consistent,
        "compared empirical covariance"
    );

    Ok(comparison.is_consistent)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let seed = match std::env::args().nth(1).map(|s| s.parse::<u64>()) {
        None => 0,
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            error!("invalid seed: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(seed) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            error!("empirical covariance does not match the analytic one");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
