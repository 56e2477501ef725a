//! Linear algebra utilities for covariance synthesis.
//!
//! This module provides row-wise Gram-Schmidt orthonormalization, symmetric
//! eigen/singular decompositions with sorted output, and the sampling factor
//! used to draw from a multivariate normal, all on top of nalgebra.

use nalgebra::{Cholesky, DMatrix, DVector, SymmetricEigen};

/// How a [`SamplingFactor`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorMethod {
    /// Lower Cholesky factor of a positive-definite matrix.
    Cholesky,
    /// `V * sqrt(max(lambda, 0))` from a symmetric eigendecomposition.
    Eigen,
}

/// Matrix `L` with `L * L^T` equal to a covariance matrix.
#[derive(Debug, Clone)]
pub struct SamplingFactor {
    /// The factor itself (d x d).
    pub matrix: DMatrix<f64>,

    /// Decomposition that produced the factor.
    pub method: FactorMethod,
}

/// Orthonormalize the rows of a square matrix with modified Gram-Schmidt.
///
/// Row order is preserved, so row 0 of the result is row 0 of the input
/// scaled to unit length.
///
/// # Arguments
///
/// * `matrix` - Rows to orthonormalize
/// * `eps` - Relative residual norm under which a row counts as dependent
///
/// # Returns
///
/// `None` if some row is (numerically) a linear combination of the rows
/// before it, or contains non-finite values.
#[must_use]
pub fn gram_schmidt_rows(matrix: &DMatrix<f64>, eps: f64) -> Option<DMatrix<f64>> {
    let mut basis = matrix.clone();

    for i in 0..basis.nrows() {
        let original_norm = matrix.row(i).norm();
        let mut row = basis.row(i).into_owned();

        for j in 0..i {
            let projection = row.dot(&basis.row(j));
            row -= basis.row(j) * projection;
        }

        let norm = row.norm();
        if !norm.is_finite() || norm == 0.0 || norm <= eps * original_norm {
            return None;
        }
        basis.set_row(i, &(row / norm));
    }

    Some(basis)
}

/// Normalize a vector to unit length.
///
/// Vectors with a norm below `1e-300` map to the zero vector.
#[must_use]
pub fn normalize(v: &DVector<f64>) -> DVector<f64> {
    let norm = v.norm();
    if norm < 1e-300 {
        return DVector::zeros(v.len());
    }
    v / norm
}

/// Largest absolute componentwise difference between two vectors.
#[must_use]
pub fn max_abs_difference(a: &DVector<f64>, b: &DVector<f64>) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Return `(M + M^T) / 2`.
#[must_use]
pub fn symmetrize(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    (matrix + matrix.transpose()) * 0.5
}

/// Eigenvalues of the symmetric part of a matrix, sorted descending.
#[must_use]
pub fn symmetric_eigenvalues(matrix: &DMatrix<f64>) -> Vec<f64> {
    let eigen = SymmetricEigen::new(symmetrize(matrix));
    let mut values: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
    values.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    values
}

/// Singular values (descending) and the matching right singular vectors.
///
/// Row `i` of the returned matrix is the right singular vector for the
/// `i`-th singular value.
#[must_use]
pub fn sorted_svd(matrix: &DMatrix<f64>) -> (Vec<f64>, DMatrix<f64>) {
    let svd = matrix.clone().svd(false, true);
    let v_t = svd
        .v_t
        .unwrap_or_else(|| DMatrix::identity(matrix.ncols(), matrix.ncols()));

    let mut order: Vec<usize> = (0..svd.singular_values.len()).collect();
    order.sort_by(|&a, &b| {
        svd.singular_values[b]
            .partial_cmp(&svd.singular_values[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let values = order.iter().map(|&i| svd.singular_values[i]).collect();
    let vectors = DMatrix::from_fn(order.len(), v_t.ncols(), |r, c| v_t[(order[r], c)]);
    (values, vectors)
}

/// Compute a factor `L` with `L * L^T = covariance`.
///
/// Tries Cholesky on the symmetrized matrix first and falls back to a
/// symmetric eigendecomposition with negative eigenvalues clamped to zero,
/// so a factor always exists for a square input.
#[must_use]
pub fn sampling_factor(covariance: &DMatrix<f64>) -> SamplingFactor {
    let symmetric = symmetrize(covariance);

    if let Some(chol) = Cholesky::new(symmetric.clone()) {
        return SamplingFactor {
            matrix: chol.l(),
            method: FactorMethod::Cholesky,
        };
    }

    let eigen = SymmetricEigen::new(symmetric);
    let scales = eigen.eigenvalues.map(|lambda| lambda.max(0.0).sqrt());
    let mut matrix = eigen.eigenvectors;
    for (j, &scale) in scales.iter().enumerate() {
        matrix.column_mut(j).scale_mut(scale);
    }

    SamplingFactor {
        matrix,
        method: FactorMethod::Eigen,
    }
}
