//! Trajectory generators for common manifold shapes.
//!
//! Each generator returns an (n, d) point matrix ready for
//! [`build_covariance_collection`](crate::build_covariance_collection).

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector};

use crate::error::{MixtureError, Result};
use crate::trajectory::MIN_POINTS;

fn check_point_count(n_points: usize) -> Result<()> {
    if n_points < MIN_POINTS {
        return Err(MixtureError::trajectory_too_short(MIN_POINTS, n_points));
    }
    Ok(())
}

/// Evenly spaced points from `start` to `end`, both included.
///
/// # Errors
///
/// Returns an error for fewer than two points, mismatched endpoint
/// dimensions, or coincident endpoints.
pub fn line(start: &DVector<f64>, end: &DVector<f64>, n_points: usize) -> Result<DMatrix<f64>> {
    check_point_count(n_points)?;
    if start.len() != end.len() {
        return Err(MixtureError::shape_mismatch(format!(
            "line endpoints have {} and {} dimensions",
            start.len(),
            end.len()
        )));
    }
    if start.is_empty() || start == end {
        return Err(MixtureError::invalid_input(
            "line endpoints must be distinct and non-empty",
        ));
    }

    let step = 1.0 / (n_points - 1) as f64;
    Ok(DMatrix::from_fn(n_points, start.len(), |i, j| {
        let t = i as f64 * step;
        start[j] + t * (end[j] - start[j])
    }))
}

/// Planar Archimedean spiral `r = growth * theta`.
///
/// `theta` runs from 0 to `2 * PI * turns`. The first point is the origin.
///
/// # Errors
///
/// Returns an error for fewer than two points or non-positive parameters.
pub fn spiral(n_points: usize, turns: f64, growth: f64) -> Result<DMatrix<f64>> {
    check_point_count(n_points)?;
    if !(turns > 0.0 && growth > 0.0) {
        return Err(MixtureError::invalid_input(
            "spiral turns and growth must be positive",
        ));
    }

    let theta_max = 2.0 * PI * turns;
    Ok(DMatrix::from_fn(n_points, 2, |i, j| {
        let theta = theta_max * i as f64 / (n_points - 1) as f64;
        let r = growth * theta;
        if j == 0 {
            r * theta.cos()
        } else {
            r * theta.sin()
        }
    }))
}

/// 3D helix around the z axis.
///
/// # Errors
///
/// Returns an error for fewer than two points or non-positive parameters.
pub fn helix(n_points: usize, radius: f64, pitch: f64, turns: f64) -> Result<DMatrix<f64>> {
    check_point_count(n_points)?;
    if !(radius > 0.0 && pitch > 0.0 && turns > 0.0) {
        return Err(MixtureError::invalid_input(
            "helix radius, pitch and turns must be positive",
        ));
    }

    Ok(DMatrix::from_fn(n_points, 3, |i, j| {
        let t = i as f64 / (n_points - 1) as f64;
        let angle = 2.0 * PI * turns * t;
        match j {
            0 => radius * angle.cos(),
            1 => radius * angle.sin(),
            _ => pitch * turns * t,
        }
    }))
}
