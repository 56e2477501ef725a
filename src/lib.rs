//! Manifold Mixture Library
//!
//! Anisotropic Gaussian-mixture training data along piecewise-linear
//! trajectories.
//!
//! Given an ordered sequence of trajectory points, this library builds one
//! covariance matrix per point whose leading axis follows the local segment
//! direction, then draws labeled samples from the resulting mixture.
//!
//! # Features
//!
//! - **Aligned bases**: Random orthonormal completion of a target direction
//!   with bounded redraws on degenerate draws
//! - **Controlled anisotropy**: One ratio sets how thin each component is
//! - **Reproducible**: Every random operation takes an explicit `Rng`
//!
//! # Quick Start
//!
//! ```
//! use manifold_mixture::{generate_manifold_mixture, MixtureConfig};
//! use nalgebra::DMatrix;
//!
//! let points = DMatrix::from_row_slice(4, 2, &[
//!     0.0, 0.0,
//!     1.0, 0.0,
//!     2.0, 1.0,
//!     2.0, 3.0,
//! ]);
//!
//! let config = MixtureConfig::default().with_seed(42);
//! let mixture = generate_manifold_mixture(&points, 500, &config)?;
//!
//! // (500, 2) samples and one label per sample
//! assert_eq!(mixture.samples.samples.nrows(), 500);
//! assert_eq!(mixture.samples.labels.len(), 500);
//! # Ok::<(), manifold_mixture::MixtureError>(())
//! ```
//!
//! # Building Blocks
//!
//! | Step | Function | Output |
//! |------|----------|--------|
//! | direction -> basis | [`orthonormalize`] | [`OrthonormalBasis`] |
//! | direction + ratio -> covariance | [`synthesize_covariance`] | [`CovarianceMatrix`] |
//! | trajectory -> covariances | [`build_covariance_collection`] | [`CovarianceCollection`] |
//! | means + covariances -> samples | [`sample_from_mixture`] | [`SampleSet`] |

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]

pub mod basis;
pub mod config;
pub mod covariance;
pub mod error;
pub mod generator;
pub mod manifold;
pub mod math;
pub mod mixture;
pub mod trajectory;
pub mod validation;

// Re-exports for convenient access
pub use basis::{orthonormalize, OrthonormalBasis};
pub use config::MixtureConfig;
pub use covariance::{synthesize_covariance, CovarianceMatrix, EigenvalueSpectrum};
pub use error::{MixtureError, Result};
pub use generator::{generate_manifold_mixture, generate_manifold_mixture_with_rng, ManifoldMixture};
pub use mixture::{sample_from_mixture, MixtureModel, SampleSet};
pub use trajectory::{build_covariance_collection, segment_directions, CovarianceCollection};
pub use validation::{
    compare_covariances, empirical_covariance, is_symmetric_positive_definite, singular_values,
    CovarianceComparison,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
