//! Per-point covariances along a piecewise-linear trajectory.
//!
//! Point `i` gets a covariance whose leading axis follows the segment
//! `points[i + 1] - points[i]`. The final point has no outgoing segment and
//! reuses the direction of the last one.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use tracing::debug;

use crate::config::MixtureConfig;
use crate::covariance::{check_ratio, synthesize_covariance, CovarianceMatrix};
use crate::error::{MixtureError, Result};

/// Minimum number of points required to derive a direction.
pub const MIN_POINTS: usize = 2;

/// Ordered covariances, index-aligned with the trajectory points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CovarianceCollection {
    covariances: Vec<CovarianceMatrix>,
    directions: Vec<DVector<f64>>,
}

impl CovarianceCollection {
    /// Number of covariances (equal to the number of trajectory points).
    #[must_use]
    pub fn len(&self) -> usize {
        self.covariances.len()
    }

    /// Whether the collection is empty. Never true for a built collection.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.covariances.is_empty()
    }

    /// Dimension d shared by every covariance.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.covariances.first().map_or(0, CovarianceMatrix::dim)
    }

    /// Covariance at point `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CovarianceMatrix> {
        self.covariances.get(index)
    }

    /// Direction vector used for point `index`.
    #[must_use]
    pub fn direction(&self, index: usize) -> Option<&DVector<f64>> {
        self.directions.get(index)
    }

    /// Iterate over the covariances in trajectory order.
    pub fn iter(&self) -> std::slice::Iter<'_, CovarianceMatrix> {
        self.covariances.iter()
    }

    /// Plain matrices, i.e. the (n, d, d) tensor handed to a mixture.
    #[must_use]
    pub fn to_matrices(&self) -> Vec<DMatrix<f64>> {
        self.covariances.iter().map(|c| c.matrix().clone()).collect()
    }

    /// Consume and return the plain matrices.
    #[must_use]
    pub fn into_matrices(self) -> Vec<DMatrix<f64>> {
        self.covariances
            .into_iter()
            .map(CovarianceMatrix::into_matrix)
            .collect()
    }
}

impl<'a> IntoIterator for &'a CovarianceCollection {
    type Item = &'a CovarianceMatrix;
    type IntoIter = std::slice::Iter<'a, CovarianceMatrix>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn validate_points(points: &DMatrix<f64>) -> Result<()> {
    if points.nrows() < MIN_POINTS {
        return Err(MixtureError::trajectory_too_short(MIN_POINTS, points.nrows()));
    }
    if points.ncols() == 0 {
        return Err(MixtureError::invalid_input(
            "trajectory points have zero dimensions",
        ));
    }
    if points.iter().any(|x| !x.is_finite()) {
        return Err(MixtureError::invalid_input(
            "trajectory points contain non-finite values",
        ));
    }
    Ok(())
}

/// Direction vector for every trajectory point.
///
/// `directions[i] = points[i + 1] - points[i]` for all but the last point,
/// which repeats the final segment's direction.
///
/// # Errors
///
/// Returns [`MixtureError::TrajectoryTooShort`] for fewer than two points and
/// [`MixtureError::InvalidInput`] for zero-dimensional or non-finite points.
pub fn segment_directions(points: &DMatrix<f64>) -> Result<Vec<DVector<f64>>> {
    validate_points(points)?;

    let n = points.nrows();
    let mut directions: Vec<DVector<f64>> = (0..n - 1)
        .map(|i| (points.row(i + 1) - points.row(i)).transpose())
        .collect();

    let last = directions[n - 2].clone();
    directions.push(last);

    Ok(directions)
}

/// Build one covariance per trajectory point.
///
/// # Arguments
///
/// * `points` - Ordered trajectory, shape (n, d), one point per row
/// * `ratio` - Ratio of the non-leading eigenvalues to the leading one
/// * `rng` - Random source for the basis completions
/// * `config` - Numerical settings
///
/// # Errors
///
/// - [`MixtureError::InvalidRatio`] if `ratio <= 0`, before the points are read
/// - [`MixtureError::TrajectoryTooShort`] if `n < 2`
/// - [`MixtureError::InvalidInput`] if two consecutive points coincide
/// - Any error from [`synthesize_covariance`]
///
/// # Example
///
/// ```
/// use manifold_mixture::{build_covariance_collection, MixtureConfig};
/// use nalgebra::DMatrix;
///
/// let config = MixtureConfig::reproducible(1);
/// let mut rng = config.rng();
/// let points = DMatrix::from_row_slice(3, 2, &[0.0, 0.0, 1.0, 0.0, 1.0, 2.0]);
///
/// let collection = build_covariance_collection(&points, 0.1, &mut rng, &config)?;
/// assert_eq!(collection.len(), 3);
/// # Ok::<(), manifold_mixture::MixtureError>(())
/// ```
pub fn build_covariance_collection<R: Rng + ?Sized>(
    points: &DMatrix<f64>,
    ratio: f64,
    rng: &mut R,
    config: &MixtureConfig,
) -> Result<CovarianceCollection> {
    check_ratio(ratio)?;
    let directions = segment_directions(points)?;

    let mut covariances = Vec::with_capacity(directions.len());
    for (i, direction) in directions.iter().enumerate() {
        if direction.norm() == 0.0 {
            let segment = i.min(directions.len() - 2);
            return Err(MixtureError::invalid_input(format!(
                "trajectory segment {segment} has zero length"
            )));
        }
        covariances.push(synthesize_covariance(direction, ratio, rng, config)?);
    }

    debug!(
        n_points = covariances.len(),
        dim = points.ncols(),
        ratio,
        "built trajectory covariance collection"
    );

    Ok(CovarianceCollection {
        covariances,
        directions,
    })
}
