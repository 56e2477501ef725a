//! Covariance synthesis from a direction and an anisotropy ratio.
//!
//! A target vector `v` fixes both the leading axis (`v / ||v||`) and the
//! leading eigenvalue (`||v||`). Every other axis gets eigenvalue
//! `||v|| * ratio`. The covariance is rebuilt as
//! `inverse(B) * diag(lambda^2) * B` where the rows of `B` are the basis from
//! [`orthonormalize`].

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use tracing::debug;

use crate::basis::{check_target, orthonormalize};
use crate::config::MixtureConfig;
use crate::error::{MixtureError, Result};

/// Per-axis eigenvalues of a synthesized covariance.
///
/// Index 0 is the leading eigenvalue; all other entries equal
/// `leading * ratio`. Squared, these are the covariance eigenvalues.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EigenvalueSpectrum {
    values: DVector<f64>,
    ratio: f64,
}

impl EigenvalueSpectrum {
    /// Build the spectrum for a target vector and ratio.
    ///
    /// # Errors
    ///
    /// Returns [`MixtureError::InvalidRatio`] if `ratio` is not finite and
    /// positive, and [`MixtureError::InvalidInput`] for a zero target.
    pub fn new(target: &DVector<f64>, ratio: f64) -> Result<Self> {
        check_ratio(ratio)?;
        check_target(target)?;

        let leading = target.norm();
        let mut values = DVector::from_element(target.len(), leading * ratio);
        values[0] = leading;

        if values.iter().any(|&v| !(v.is_finite() && v > 0.0)) {
            return Err(MixtureError::invalid_input(format!(
                "eigenvalue spectrum is not strictly positive (leading {leading}, ratio {ratio})"
            )));
        }

        Ok(Self { values, ratio })
    }

    /// Leading eigenvalue (norm of the target vector).
    #[must_use]
    pub fn leading(&self) -> f64 {
        self.values[0]
    }

    /// Ratio between the other eigenvalues and the leading one.
    #[must_use]
    pub const fn ratio(&self) -> f64 {
        self.ratio
    }

    /// All eigenvalues, leading first.
    #[must_use]
    pub const fn values(&self) -> &DVector<f64> {
        &self.values
    }

    /// `diag(values^2)`.
    #[must_use]
    pub fn squared_diagonal(&self) -> DMatrix<f64> {
        DMatrix::from_diagonal(&self.values.map(|v| v * v))
    }
}

/// Symmetric positive-definite covariance with a known leading axis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CovarianceMatrix {
    matrix: DMatrix<f64>,
    spectrum: EigenvalueSpectrum,
    leading_axis: DVector<f64>,
}

impl CovarianceMatrix {
    /// The d x d covariance.
    #[must_use]
    pub const fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Consume and return the d x d covariance.
    #[must_use]
    pub fn into_matrix(self) -> DMatrix<f64> {
        self.matrix
    }

    /// Spectrum the covariance was built from.
    #[must_use]
    pub const fn spectrum(&self) -> &EigenvalueSpectrum {
        &self.spectrum
    }

    /// Unit vector along the leading axis.
    #[must_use]
    pub const fn leading_axis(&self) -> &DVector<f64> {
        &self.leading_axis
    }

    /// Dimension d.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Trace of the covariance (sum of squared spectrum entries).
    #[must_use]
    pub fn trace(&self) -> f64 {
        self.matrix.trace()
    }

    /// Determinant of the covariance.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.matrix.determinant()
    }
}

/// Reject a ratio that is not finite and strictly positive.
pub(crate) fn check_ratio(ratio: f64) -> Result<()> {
    if ratio.is_finite() && ratio > 0.0 {
        Ok(())
    } else {
        Err(MixtureError::invalid_ratio(ratio))
    }
}

/// Synthesize a covariance whose leading axis follows `target`.
///
/// # Arguments
///
/// * `target` - Leading eigenvector scaled by its eigenvalue
/// * `ratio` - Ratio of the other eigenvalues to the leading one (> 0)
/// * `rng` - Random source for the basis completion
/// * `config` - Numerical settings for [`orthonormalize`]
///
/// # Errors
///
/// - [`MixtureError::InvalidRatio`] before any basis work if `ratio <= 0`
/// - Any error from [`orthonormalize`]
/// - [`MixtureError::LinalgError`] if the basis cannot be inverted
/// - [`MixtureError::DeterminantDegeneracy`] if the result has zero determinant
///
/// # Example
///
/// ```
/// use manifold_mixture::{synthesize_covariance, MixtureConfig};
/// use nalgebra::DVector;
///
/// let config = MixtureConfig::reproducible(0);
/// let mut rng = config.rng();
/// let target = DVector::from_vec(vec![1.0, 1.0]);
///
/// let cov = synthesize_covariance(&target, 0.1, &mut rng, &config)?;
/// assert!((cov.trace() - 2.02).abs() < 1e-10);
/// # Ok::<(), manifold_mixture::MixtureError>(())
/// ```
pub fn synthesize_covariance<R: Rng + ?Sized>(
    target: &DVector<f64>,
    ratio: f64,
    rng: &mut R,
    config: &MixtureConfig,
) -> Result<CovarianceMatrix> {
    let spectrum = EigenvalueSpectrum::new(target, ratio)?;
    let basis = orthonormalize(target, rng, config)?;

    let inverse = basis
        .matrix()
        .clone()
        .try_inverse()
        .ok_or_else(|| MixtureError::linalg("orthonormal basis is not invertible"))?;

    // inverse(B) rather than B^T; identical only for an exactly orthonormal B.
    let matrix = inverse * spectrum.squared_diagonal() * basis.matrix();

    let determinant = matrix.determinant();
    if determinant == 0.0 || !determinant.is_finite() {
        return Err(MixtureError::determinant_degeneracy(determinant));
    }

    debug!(
        dim = matrix.nrows(),
        leading = spectrum.leading(),
        ratio,
        determinant,
        attempts = basis.attempts(),
        "synthesized covariance"
    );

    Ok(CovarianceMatrix {
        leading_axis: basis.leading_axis(),
        matrix,
        spectrum,
    })
}
