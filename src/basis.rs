//! Orthonormal bases aligned to a target direction.
//!
//! [`orthonormalize`] completes a single direction into a full orthonormal
//! basis of `R^d`. The remaining rows are random: a fresh standard-normal
//! matrix is drawn, its first row replaced by the target, and the rows run
//! through Gram-Schmidt. Draws that turn out linearly dependent are redrawn,
//! up to [`MixtureConfig::max_basis_attempts`] times.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand_distr::StandardNormal;
use tracing::{error, trace};

use crate::config::MixtureConfig;
use crate::error::{MixtureError, Result};
use crate::math::linalg::{gram_schmidt_rows, max_abs_difference, normalize};

/// Orthonormal basis whose first row points along a target direction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrthonormalBasis {
    rows: DMatrix<f64>,
    attempts: usize,
}

impl OrthonormalBasis {
    /// The basis as a d x d matrix, one basis vector per row.
    #[must_use]
    pub const fn matrix(&self) -> &DMatrix<f64> {
        &self.rows
    }

    /// Consume the basis and return its matrix.
    #[must_use]
    pub fn into_matrix(self) -> DMatrix<f64> {
        self.rows
    }

    /// Dimension of the space.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.rows.nrows()
    }

    /// The leading (target-aligned) basis vector.
    #[must_use]
    pub fn leading_axis(&self) -> DVector<f64> {
        self.rows.row(0).transpose()
    }

    /// Number of random draws it took to find a non-degenerate basis.
    #[must_use]
    pub const fn attempts(&self) -> usize {
        self.attempts
    }
}

/// Validate that a vector can serve as a target direction.
pub(crate) fn check_target(target: &DVector<f64>) -> Result<()> {
    if target.is_empty() {
        return Err(MixtureError::invalid_input("target vector is empty"));
    }
    if target.iter().any(|x| !x.is_finite()) {
        return Err(MixtureError::invalid_input(
            "target vector contains non-finite values",
        ));
    }
    if target.norm() == 0.0 {
        return Err(MixtureError::invalid_input("target vector has zero norm"));
    }
    Ok(())
}

/// Build an orthonormal basis whose first row is `target / ||target||`.
///
/// # Arguments
///
/// * `target` - Nonzero direction vector of dimension d
/// * `rng` - Random source for the completing rows
/// * `config` - Supplies the retry bound and tolerances
///
/// # Errors
///
/// - [`MixtureError::InvalidConfig`] for out-of-range basis settings
/// - [`MixtureError::InvalidInput`] for an empty, non-finite or zero target
/// - [`MixtureError::DegenerateBasis`] when every draw was degenerate
/// - [`MixtureError::BasisMisaligned`] if the first row lost the target
///   direction; this is a defect and is never retried
///
/// # Example
///
/// ```
/// use manifold_mixture::{orthonormalize, MixtureConfig};
/// use nalgebra::DVector;
///
/// let config = MixtureConfig::reproducible(3);
/// let mut rng = config.rng();
/// let target = DVector::from_vec(vec![1.0, 1.0, 0.0]);
///
/// let basis = orthonormalize(&target, &mut rng, &config)?;
/// assert!((basis.leading_axis()[0] - 1.0 / 2f64.sqrt()).abs() < 1e-12);
/// # Ok::<(), manifold_mixture::MixtureError>(())
/// ```
pub fn orthonormalize<R: Rng + ?Sized>(
    target: &DVector<f64>,
    rng: &mut R,
    config: &MixtureConfig,
) -> Result<OrthonormalBasis> {
    config.validate_basis_settings()?;
    check_target(target)?;

    let d = target.len();
    let max_attempts = config.max_basis_attempts;

    for attempt in 1..=max_attempts {
        let mut draw = DMatrix::from_fn(d, d, |_, _| rng.sample::<f64, _>(StandardNormal));
        draw.set_row(0, &target.transpose());

        let Some(rows) = gram_schmidt_rows(&draw, config.degeneracy_eps) else {
            trace!(attempt, dim = d, "degenerate random draw, redrawing basis");
            continue;
        };

        let expected = normalize(target);
        let actual = normalize(&rows.row(0).transpose());
        if max_abs_difference(&expected, &actual) >= config.alignment_tolerance {
            error!(
                expected = ?expected.as_slice(),
                actual = ?actual.as_slice(),
                "orthonormalization did not keep the leading vector intact"
            );
            return Err(MixtureError::basis_misaligned(
                expected.as_slice(),
                actual.as_slice(),
            ));
        }

        return Ok(OrthonormalBasis {
            rows,
            attempts: attempt,
        });
    }

    Err(MixtureError::degenerate_basis(max_attempts))
}
