//! Configuration for manifold mixture generation.
//!
//! This module provides the [`MixtureConfig`] struct which centralizes the
//! tunable parameters for covariance synthesis and sampling, along with a few
//! presets.
//!
//! # Example
//!
//! ```
//! use manifold_mixture::MixtureConfig;
//!
//! // Use default configuration
//! let config = MixtureConfig::default();
//!
//! // Use a preset with a fixed seed
//! let config = MixtureConfig::thin_tube().with_seed(42);
//! assert!(config.validate().is_ok());
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{MixtureError, Result};

/// Configuration for manifold mixture generation.
///
/// # Core Parameters
///
/// - `ratio_of_other_eigenvalues`: Anisotropy of each component. The
///   non-leading axes get `leading * ratio` as their eigenvalue.
/// - `seed`: Seed for the random source used by the one-call pipeline.
///
/// # Numerical Parameters
///
/// - `max_basis_attempts`: Random redraws allowed before giving up on a basis.
/// - `alignment_tolerance`: Per-component tolerance on the leading basis row.
/// - `degeneracy_eps`: Relative residual norm under which a row is treated as
///   linearly dependent during orthonormalization.
#[derive(Debug, Clone, PartialEq)]
pub struct MixtureConfig {
    /// Ratio between the non-leading eigenvalues and the leading one.
    /// - 0.01-0.1: Thin tubes hugging the trajectory
    /// - 1.0: Isotropic components
    pub ratio_of_other_eigenvalues: f64,

    /// Maximum number of random matrices drawn per basis.
    pub max_basis_attempts: usize,

    /// Absolute per-component tolerance when checking that the first basis
    /// row still points along the target direction.
    pub alignment_tolerance: f64,

    /// Relative norm threshold for degenerate rows in Gram-Schmidt.
    pub degeneracy_eps: f64,

    /// Seed for [`MixtureConfig::rng`]. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for MixtureConfig {
    fn default() -> Self {
        Self {
            ratio_of_other_eigenvalues: 0.1,
            max_basis_attempts: 100,
            alignment_tolerance: 1e-8,
            degeneracy_eps: 1e-10,
            seed: None,
        }
    }
}

impl MixtureConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MixtureError::InvalidRatio`] for a non-positive ratio and
    /// [`MixtureError::InvalidConfig`] for any other out-of-range parameter.
    pub fn validate(&self) -> Result<()> {
        if !(self.ratio_of_other_eigenvalues.is_finite() && self.ratio_of_other_eigenvalues > 0.0)
        {
            return Err(MixtureError::invalid_ratio(self.ratio_of_other_eigenvalues));
        }
        self.validate_basis_settings()
    }

    /// Validate only the settings used by basis orthonormalization.
    ///
    /// # Errors
    ///
    /// Returns [`MixtureError::InvalidConfig`] for a zero retry bound, a
    /// non-positive alignment tolerance or a negative degeneracy threshold.
    pub fn validate_basis_settings(&self) -> Result<()> {
        if self.max_basis_attempts < 1 {
            return Err(MixtureError::invalid_config(
                "max_basis_attempts must be at least 1",
            ));
        }
        if !(self.alignment_tolerance.is_finite() && self.alignment_tolerance > 0.0) {
            return Err(MixtureError::invalid_config(
                "alignment_tolerance must be positive",
            ));
        }
        if !(self.degeneracy_eps.is_finite() && self.degeneracy_eps >= 0.0) {
            return Err(MixtureError::invalid_config(
                "degeneracy_eps must be non-negative",
            ));
        }
        Ok(())
    }

    /// Preset for narrow components that stay close to the trajectory.
    #[must_use]
    pub fn thin_tube() -> Self {
        Self {
            ratio_of_other_eigenvalues: 0.05,
            ..Self::default()
        }
    }

    /// Preset for isotropic components (every eigenvalue equal).
    #[must_use]
    pub fn isotropic() -> Self {
        Self {
            ratio_of_other_eigenvalues: 1.0,
            ..Self::default()
        }
    }

    /// Default configuration with a fixed seed.
    #[must_use]
    pub fn reproducible(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Set the ratio of other eigenvalues.
    #[must_use]
    pub const fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio_of_other_eigenvalues = ratio;
        self
    }

    /// Set the maximum number of basis draws.
    #[must_use]
    pub const fn with_max_basis_attempts(mut self, attempts: usize) -> Self {
        self.max_basis_attempts = attempts;
        self
    }

    /// Set the alignment tolerance.
    #[must_use]
    pub const fn with_alignment_tolerance(mut self, tolerance: f64) -> Self {
        self.alignment_tolerance = tolerance;
        self
    }

    /// Set the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the random source described by this configuration.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        self.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }
}
