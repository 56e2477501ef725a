//! End-to-end tests for trajectory covariances and mixture sampling.
//!
//! These tests check the geometric invariants of the synthesized covariances
//! across many seeds and dimensions, and that sampled data actually follows
//! the requested mixture.

use approx::assert_relative_eq;
use manifold_mixture::math::{max_abs_difference, normalize, symmetric_eigenvalues};
use manifold_mixture::{
    build_covariance_collection, compare_covariances, empirical_covariance,
    generate_manifold_mixture, is_symmetric_positive_definite, manifold, orthonormalize,
    sample_from_mixture, synthesize_covariance, MixtureConfig, MixtureError,
};
use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

// =============================================================================
// HELPERS
// =============================================================================

/// Random nonzero vector of dimension `d`.
fn random_target(d: usize, rng: &mut StdRng) -> DVector<f64> {
    loop {
        let v = DVector::from_fn(d, |_, _| rng.sample::<f64, _>(StandardNormal) * 3.0);
        if v.norm() > 1e-3 {
            return v;
        }
    }
}

// =============================================================================
// BASIS
// =============================================================================

#[test]
fn test_alignment_holds_across_seeds_and_dimensions() {
    let config = MixtureConfig::default();

    for d in 1..=8 {
        for seed in 0..25 {
            let mut rng = StdRng::seed_from_u64(seed * 100 + d as u64);
            let target = random_target(d, &mut rng);
            let basis = orthonormalize(&target, &mut rng, &config).unwrap();

            let diff = max_abs_difference(&basis.leading_axis(), &normalize(&target));
            assert!(diff < 1e-8, "d={d} seed={seed} diff={diff}");

            let gram = basis.matrix() * basis.matrix().transpose();
            assert_relative_eq!(gram, DMatrix::identity(d, d), epsilon = 1e-10);
        }
    }
}

// =============================================================================
// COVARIANCE
// =============================================================================

#[test]
fn test_determinant_nonzero_for_random_targets() {
    let config = MixtureConfig::default();
    let mut rng = StdRng::seed_from_u64(77);

    for _ in 0..100 {
        let d = rng.gen_range(1..=6);
        let target = random_target(d, &mut rng);
        let ratio = rng.gen_range(0.01..2.0);

        let cov = synthesize_covariance(&target, ratio, &mut rng, &config).unwrap();
        assert!(cov.determinant() != 0.0);
        assert!(is_symmetric_positive_definite(cov.matrix(), 1e-9));
    }
}

#[test]
fn test_trace_matches_spectrum() {
    let config = MixtureConfig::default();

    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let target = DVector::from_vec(vec![1.0, 1.0]);
        let cov = synthesize_covariance(&target, 0.1, &mut rng, &config).unwrap();
        assert_relative_eq!(cov.trace(), 2.02, epsilon = 1e-10);
    }

    // trace = l^2 + (d - 1) (l r)^2 in higher dimensions too
    let mut rng = StdRng::seed_from_u64(3);
    let target = DVector::from_vec(vec![1.0, 2.0, 2.0, 0.0]);
    let cov = synthesize_covariance(&target, 0.5, &mut rng, &config).unwrap();
    assert_relative_eq!(cov.trace(), 9.0 + 3.0 * 2.25, epsilon = 1e-9);
}

#[test]
fn test_eigenvalues_match_requested_spectrum() {
    let config = MixtureConfig::default();
    let mut rng = StdRng::seed_from_u64(8);
    let target = DVector::from_vec(vec![0.0, 0.0, 2.0]);

    let cov = synthesize_covariance(&target, 0.25, &mut rng, &config).unwrap();
    let eigenvalues = symmetric_eigenvalues(cov.matrix());

    assert_relative_eq!(eigenvalues[0], 4.0, epsilon = 1e-10);
    assert_relative_eq!(eigenvalues[1], 0.25, epsilon = 1e-10);
    assert_relative_eq!(eigenvalues[2], 0.25, epsilon = 1e-10);
}

// =============================================================================
// TRAJECTORY
// =============================================================================

#[test]
fn test_collection_length_matches_points() {
    let config = MixtureConfig::default();
    let mut rng = StdRng::seed_from_u64(1);

    for n in [2, 3, 10, 50] {
        let points = manifold::spiral(n, 1.0, 0.3).unwrap();
        let collection = build_covariance_collection(&points, 0.1, &mut rng, &config).unwrap();
        assert_eq!(collection.len(), n);
        assert_eq!(collection.dim(), 2);
    }
}

#[test]
fn test_final_covariance_reuses_last_direction() {
    let config = MixtureConfig::default();
    let mut rng = StdRng::seed_from_u64(4);
    let points = DMatrix::from_row_slice(3, 1, &[0.0, 1.0, 3.0]);

    let c = build_covariance_collection(&points, 0.1, &mut rng, &config)
        .unwrap()
        .into_matrices();

    assert_relative_eq!(c[0][(0, 0)], 1.0, epsilon = 1e-12);
    assert_eq!(c[1], c[2]);
    assert_relative_eq!(c[2][(0, 0)], 4.0, epsilon = 1e-12);
}

#[test]
fn test_single_point_trajectory_fails() {
    let config = MixtureConfig::default();
    let mut rng = StdRng::seed_from_u64(0);
    let points = DMatrix::from_row_slice(1, 3, &[1.0, 2.0, 3.0]);

    assert!(matches!(
        build_covariance_collection(&points, 0.1, &mut rng, &config),
        Err(MixtureError::TrajectoryTooShort { min: 2, actual: 1 })
    ));
}

// =============================================================================
// SAMPLING
// =============================================================================

#[test]
fn test_sample_shapes_and_label_range() {
    let points = manifold::helix(12, 1.0, 1.0, 1.0).unwrap();
    let config = MixtureConfig::reproducible(5);
    let mixture = generate_manifold_mixture(&points, 777, &config).unwrap();

    assert_eq!(mixture.samples.samples.shape(), (777, 3));
    assert_eq!(mixture.samples.labels.len(), 777);
    assert!(mixture.samples.labels.iter().all(|&c| c < 12));
}

#[test]
fn test_missing_mixture_arguments_fail() {
    let mut rng = StdRng::seed_from_u64(0);
    let means = DMatrix::zeros(2, 2);
    let covariances = vec![DMatrix::identity(2, 2); 2];

    assert!(matches!(
        sample_from_mixture(None, Some(covariances.as_slice()), 5, &mut rng),
        Err(MixtureError::MissingInput(_))
    ));
    assert!(matches!(
        sample_from_mixture(Some(&means), None, 5, &mut rng),
        Err(MixtureError::MissingInput(_))
    ));
}

#[test]
fn test_empirical_covariance_converges() {
    let config = MixtureConfig::reproducible(2013);
    let mut rng = config.rng();
    let target = DVector::from_vec(vec![1.0, 1.0]);
    let cov = synthesize_covariance(&target, 0.1, &mut rng, &config).unwrap();

    let means = DMatrix::zeros(1, 2);
    let set = sample_from_mixture(
        Some(&means),
        Some(std::slice::from_ref(cov.matrix())),
        20_000,
        &mut rng,
    )
    .unwrap();

    let estimate = empirical_covariance(&set.samples, Some(&DVector::zeros(2))).unwrap();
    let comparison = compare_covariances(&estimate, cov.matrix(), 0.05).unwrap();
    assert!(comparison.is_consistent, "{comparison:?}");
}

#[test]
fn test_samples_concentrate_along_segments() {
    // A straight line: every component's leading axis is the x axis
    let start = DVector::from_vec(vec![0.0, 0.0]);
    let end = DVector::from_vec(vec![10.0, 0.0]);
    let points = manifold::line(&start, &end, 11).unwrap();
    let config = MixtureConfig::thin_tube().with_seed(9);

    let mixture = generate_manifold_mixture(&points, 5000, &config).unwrap();
    let estimate = empirical_covariance(&mixture.samples.samples, None).unwrap();

    // Spread along y stays at the tube width (0.05^2), far below x
    assert!(estimate[(1, 1)] < 0.01, "{estimate}");
    assert!(estimate[(0, 0)] > 5.0, "{estimate}");
}
