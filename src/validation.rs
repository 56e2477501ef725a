//! Sanity checks for synthesized covariances and sample sets.
//!
//! These utilities compare what the sampler actually produced against the
//! analytic covariances it was asked for.

use nalgebra::{DMatrix, DVector};

use crate::error::{MixtureError, Result};
use crate::math::linalg::{sorted_svd, symmetric_eigenvalues};

/// Empirical vs analytic covariance comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceComparison {
    /// Largest absolute entrywise difference.
    pub max_abs_error: f64,

    /// `||empirical - analytic||_F / ||analytic||_F`.
    pub relative_frobenius_error: f64,

    /// Whether the relative error is within the requested tolerance.
    pub is_consistent: bool,
}

/// Second-moment matrix of the sample rows.
///
/// # Arguments
///
/// * `samples` - Shape (n, d)
/// * `mean` - Center to use; the sample mean when `None`
///
/// # Returns
///
/// `(1/n) * sum_k (x_k - mean)(x_k - mean)^T`.
///
/// # Errors
///
/// Returns an error for an empty sample set or a mean of the wrong length.
pub fn empirical_covariance(
    samples: &DMatrix<f64>,
    mean: Option<&DVector<f64>>,
) -> Result<DMatrix<f64>> {
    let (n, d) = samples.shape();
    if n == 0 {
        return Err(MixtureError::invalid_input("no samples to estimate from"));
    }

    let center = match mean {
        Some(m) if m.len() != d => {
            return Err(MixtureError::shape_mismatch(format!(
                "mean has {} entries, samples have {d} columns",
                m.len()
            )));
        }
        Some(m) => m.clone(),
        None => samples.row_sum().transpose() / n as f64,
    };

    let mut centered = samples.clone();
    for mut row in centered.row_iter_mut() {
        row -= center.transpose();
    }

    Ok(centered.transpose() * &centered / n as f64)
}

/// Compare an empirical covariance to the analytic one.
///
/// # Errors
///
/// Returns [`MixtureError::ShapeMismatch`] if the matrices differ in shape.
pub fn compare_covariances(
    empirical: &DMatrix<f64>,
    analytic: &DMatrix<f64>,
    tolerance: f64,
) -> Result<CovarianceComparison> {
    if empirical.shape() != analytic.shape() {
        return Err(MixtureError::shape_mismatch(format!(
            "empirical {:?} vs analytic {:?}",
            empirical.shape(),
            analytic.shape()
        )));
    }

    let diff = empirical - analytic;
    let max_abs_error = diff.amax();
    let scale = analytic.norm();
    let relative_frobenius_error = if scale > 0.0 {
        diff.norm() / scale
    } else {
        diff.norm()
    };

    Ok(CovarianceComparison {
        max_abs_error,
        relative_frobenius_error,
        is_consistent: relative_frobenius_error <= tolerance,
    })
}

/// Check symmetry and strictly positive eigenvalues.
///
/// Symmetry is checked entrywise with `tolerance` scaled by the largest
/// entry; eigenvalues must exceed zero.
#[must_use]
pub fn is_symmetric_positive_definite(matrix: &DMatrix<f64>, tolerance: f64) -> bool {
    if !matrix.is_square() || matrix.is_empty() {
        return false;
    }

    let scale = matrix.amax().max(1.0);
    if (matrix - matrix.transpose()).amax() > tolerance * scale {
        return false;
    }

    symmetric_eigenvalues(matrix).iter().all(|&l| l > 0.0)
}

/// Singular values in descending order with their right singular vectors.
///
/// Row `i` of the returned matrix pairs with the `i`-th singular value. For a
/// synthesized covariance the values are the squared spectrum and row 0 is
/// the leading axis, up to sign.
#[must_use]
pub fn singular_values(matrix: &DMatrix<f64>) -> (Vec<f64>, DMatrix<f64>) {
    sorted_svd(matrix)
}
