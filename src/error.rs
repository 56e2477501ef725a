//! Error types for manifold mixture operations.
//!
//! Every failure in this crate is fail-fast: the operation that detects the
//! violation returns immediately and no partial result is produced.

use thiserror::Error;

/// Main error type for manifold mixture operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MixtureError {
    /// Input validation errors.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The anisotropy ratio is not a finite positive number.
    #[error("Ratio of other eigenvalues must be finite and positive, got {ratio}")]
    InvalidRatio { ratio: f64 },

    /// Every random draw produced linearly dependent rows.
    #[error("Could not orthonormalize a basis after {attempts} random draws")]
    DegenerateBasis { attempts: usize },

    /// Orthonormalization did not keep the leading direction intact.
    #[error("Leading basis vector {actual:?} does not match target direction {expected:?}")]
    BasisMisaligned {
        expected: Vec<f64>,
        actual: Vec<f64>,
    },

    /// Component counts or dimensions disagree.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Trajectory has too few points to derive a direction.
    #[error("Trajectory too short: need at least {min} points, got {actual}")]
    TrajectoryTooShort { min: usize, actual: usize },

    /// A required argument was not supplied.
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    /// Synthesized covariance has a zero (or non-finite) determinant.
    #[error("Covariance matrix is degenerate: determinant = {determinant}")]
    DeterminantDegeneracy { determinant: f64 },

    /// Linear algebra computation failed.
    #[error("Linear algebra error: {0}")]
    LinalgError(String),

    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for manifold mixture operations.
pub type Result<T> = std::result::Result<T, MixtureError>;

impl MixtureError {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an invalid ratio error.
    #[must_use]
    pub const fn invalid_ratio(ratio: f64) -> Self {
        Self::InvalidRatio { ratio }
    }

    /// Create a degenerate basis error.
    #[must_use]
    pub const fn degenerate_basis(attempts: usize) -> Self {
        Self::DegenerateBasis { attempts }
    }

    /// Create a basis misalignment error.
    #[must_use]
    pub fn basis_misaligned(expected: &[f64], actual: &[f64]) -> Self {
        Self::BasisMisaligned {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Create a shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Create a trajectory too short error.
    #[must_use]
    pub const fn trajectory_too_short(min: usize, actual: usize) -> Self {
        Self::TrajectoryTooShort { min, actual }
    }

    /// Create a missing input error.
    #[must_use]
    pub const fn missing_input(what: &'static str) -> Self {
        Self::MissingInput(what)
    }

    /// Create a determinant degeneracy error.
    #[must_use]
    pub const fn determinant_degeneracy(determinant: f64) -> Self {
        Self::DeterminantDegeneracy { determinant }
    }

    /// Create a linear algebra error.
    #[must_use]
    pub fn linalg(msg: impl Into<String>) -> Self {
        Self::LinalgError(msg.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
