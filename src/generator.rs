//! One-call pipeline from trajectory points to labeled samples.
//!
//! # Pipeline Overview
//!
//! 1. Validate the configuration
//! 2. Derive a direction per trajectory point
//! 3. Synthesize one anisotropic covariance per point
//! 4. Build a uniform mixture centered on the trajectory points
//! 5. Draw labeled samples

use nalgebra::DMatrix;
use rand::Rng;
use tracing::info;

use crate::config::MixtureConfig;
use crate::error::Result;
use crate::mixture::{MixtureModel, SampleSet};
use crate::trajectory::{build_covariance_collection, CovarianceCollection};

/// Everything produced by [`generate_manifold_mixture`].
#[derive(Debug, Clone)]
pub struct ManifoldMixture {
    /// Per-point covariances, index-aligned with the trajectory.
    pub covariances: CovarianceCollection,

    /// Mixture with the trajectory points as component means.
    pub model: MixtureModel,

    /// Labeled samples drawn from `model`.
    pub samples: SampleSet,
}

/// Sample a Gaussian mixture that follows a piecewise-linear trajectory.
///
/// The random source is seeded from `config.seed`, or from OS entropy when no
/// seed is set.
///
/// # Arguments
///
/// * `points` - Ordered trajectory, shape (n, d)
/// * `n_samples` - Number of samples to draw
/// * `config` - Anisotropy ratio, numerical settings and seed
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the trajectory has fewer
/// than two points, or covariance synthesis fails.
///
/// # Example
///
/// ```
/// use manifold_mixture::{generate_manifold_mixture, manifold, MixtureConfig};
///
/// let points = manifold::spiral(30, 1.5, 0.2)?;
/// let config = MixtureConfig::thin_tube().with_seed(7);
///
/// let mixture = generate_manifold_mixture(&points, 1000, &config)?;
/// assert_eq!(mixture.covariances.len(), 30);
/// assert_eq!(mixture.samples.samples.shape(), (1000, 2));
/// # Ok::<(), manifold_mixture::MixtureError>(())
/// ```
pub fn generate_manifold_mixture(
    points: &DMatrix<f64>,
    n_samples: usize,
    config: &MixtureConfig,
) -> Result<ManifoldMixture> {
    let mut rng = config.rng();
    generate_manifold_mixture_with_rng(points, n_samples, &mut rng, config)
}

/// Same as [`generate_manifold_mixture`] with a caller-owned random source.
///
/// `config.seed` is ignored.
///
/// # Errors
///
/// See [`generate_manifold_mixture`].
pub fn generate_manifold_mixture_with_rng<R: Rng + ?Sized>(
    points: &DMatrix<f64>,
    n_samples: usize,
    rng: &mut R,
    config: &MixtureConfig,
) -> Result<ManifoldMixture> {
    config.validate()?;

    let covariances =
        build_covariance_collection(points, config.ratio_of_other_eigenvalues, rng, config)?;
    let model = MixtureModel::new(points.clone(), covariances.to_matrices())?;
    let samples = model.sample(n_samples, rng);

    info!(
        n_points = points.nrows(),
        dim = points.ncols(),
        n_samples,
        ratio = config.ratio_of_other_eigenvalues,
        "generated manifold mixture"
    );

    Ok(ManifoldMixture {
        covariances,
        model,
        samples,
    })
}
