//! Mathematical utilities for manifold mixtures.
//!
//! This module provides:
//! - [`linalg`]: Gram-Schmidt, sorted eigen/SVD, and sampling factors

pub mod linalg;

pub use linalg::{
    gram_schmidt_rows, max_abs_difference, normalize, sampling_factor, sorted_svd,
    symmetric_eigenvalues, FactorMethod, SamplingFactor,
};
