//! Gaussian mixture sampling.
//!
//! Each draw picks a component uniformly at random and samples from that
//! component's multivariate normal. Component counts are not balanced.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand_distr::StandardNormal;
use tracing::{debug, warn};

use crate::error::{MixtureError, Result};
use crate::math::linalg::{sampling_factor, FactorMethod};

/// Labeled samples drawn from a mixture.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleSet {
    /// Samples, shape (n_samples, d).
    pub samples: DMatrix<f64>,

    /// Component index of each sample, values in `[0, n_components)`.
    pub labels: Vec<usize>,
}

impl SampleSet {
    /// Number of samples.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.samples.nrows()
    }

    /// Dimension d.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.samples.ncols()
    }

    /// How many samples each component produced.
    #[must_use]
    pub fn component_counts(&self, n_components: usize) -> Vec<usize> {
        let mut counts = vec![0; n_components];
        for &label in &self.labels {
            if let Some(count) = counts.get_mut(label) {
                *count += 1;
            }
        }
        counts
    }

    /// Rows drawn from `component`, shape (count, d).
    #[must_use]
    pub fn samples_for(&self, component: usize) -> DMatrix<f64> {
        let rows: Vec<usize> = self
            .labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == component)
            .map(|(i, _)| i)
            .collect();
        self.samples.select_rows(rows.iter())
    }
}

/// Gaussian mixture with uniform component weights.
#[derive(Debug, Clone)]
pub struct MixtureModel {
    means: DMatrix<f64>,
    covariances: Vec<DMatrix<f64>>,
    factors: Vec<DMatrix<f64>>,
}

fn validate_components(means: &DMatrix<f64>, covariances: &[DMatrix<f64>]) -> Result<()> {
    let (n_components, d) = means.shape();

    if n_components != covariances.len() {
        return Err(MixtureError::shape_mismatch(format!(
            "{n_components} component means vs {} covariances",
            covariances.len()
        )));
    }
    if n_components == 0 {
        return Err(MixtureError::shape_mismatch("mixture has no components"));
    }
    if d == 0 {
        return Err(MixtureError::shape_mismatch(
            "component means have zero dimensions",
        ));
    }
    for (i, cov) in covariances.iter().enumerate() {
        if cov.shape() != (d, d) {
            return Err(MixtureError::shape_mismatch(format!(
                "covariance {i} is {}x{}, expected {d}x{d}",
                cov.nrows(),
                cov.ncols()
            )));
        }
    }
    if means.iter().chain(covariances.iter().flatten()).any(|x| !x.is_finite()) {
        return Err(MixtureError::invalid_input(
            "mixture parameters contain non-finite values",
        ));
    }
    Ok(())
}

impl MixtureModel {
    /// Build a mixture from per-component means and covariances.
    ///
    /// # Arguments
    ///
    /// * `means` - Shape (n_components, d), one mean per row
    /// * `covariances` - `n_components` matrices of shape (d, d)
    ///
    /// # Errors
    ///
    /// Returns [`MixtureError::ShapeMismatch`] if counts or dimensions
    /// disagree, or if there are no components.
    pub fn new(means: DMatrix<f64>, covariances: Vec<DMatrix<f64>>) -> Result<Self> {
        validate_components(&means, &covariances)?;

        let factors = covariances
            .iter()
            .enumerate()
            .map(|(i, cov)| {
                let factor = sampling_factor(cov);
                if factor.method == FactorMethod::Eigen {
                    warn!(
                        component = i,
                        "covariance is not positive-definite, sampling from its PSD part"
                    );
                }
                factor.matrix
            })
            .collect();

        Ok(Self {
            means,
            covariances,
            factors,
        })
    }

    /// Number of components.
    #[must_use]
    pub fn n_components(&self) -> usize {
        self.means.nrows()
    }

    /// Dimension d.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.means.ncols()
    }

    /// Component means, shape (n_components, d).
    #[must_use]
    pub const fn means(&self) -> &DMatrix<f64> {
        &self.means
    }

    /// Component covariances.
    #[must_use]
    pub fn covariances(&self) -> &[DMatrix<f64>] {
        &self.covariances
    }

    /// Draw one sample from `component`.
    ///
    /// # Panics
    ///
    /// Panics if `component >= self.n_components()`.
    pub fn sample_component<R: Rng + ?Sized>(&self, component: usize, rng: &mut R) -> DVector<f64> {
        let d = self.dim();
        let z = DVector::from_fn(d, |_, _| rng.sample::<f64, _>(StandardNormal));
        self.means.row(component).transpose() + &self.factors[component] * z
    }

    /// Draw `n_samples` independent labeled samples.
    pub fn sample<R: Rng + ?Sized>(&self, n_samples: usize, rng: &mut R) -> SampleSet {
        let n_components = self.n_components();
        let mut samples = DMatrix::zeros(n_samples, self.dim());
        let mut labels = Vec::with_capacity(n_samples);

        for k in 0..n_samples {
            let c = rng.gen_range(0..n_components);
            let draw = self.sample_component(c, rng);
            samples.set_row(k, &draw.transpose());
            labels.push(c);
        }

        debug!(n_samples, n_components, dim = self.dim(), "sampled mixture");

        SampleSet { samples, labels }
    }
}

/// Draw labeled samples from a uniform-weight Gaussian mixture.
///
/// Absent arguments are a precondition violation rather than an empty
/// mixture.
///
/// # Arguments
///
/// * `component_means` - Shape (n_components, d)
/// * `component_covariances` - `n_components` matrices of shape (d, d)
/// * `n_samples` - Number of draws
/// * `rng` - Random source
///
/// # Errors
///
/// - [`MixtureError::MissingInput`] if either argument is `None`
/// - [`MixtureError::ShapeMismatch`] if their shapes disagree
///
/// # Example
///
/// ```
/// use manifold_mixture::{sample_from_mixture, MixtureConfig};
/// use nalgebra::DMatrix;
///
/// let mut rng = MixtureConfig::reproducible(2).rng();
/// let means = DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 5.0, 5.0]);
/// let covariances = vec![DMatrix::identity(2, 2); 2];
///
/// let set = sample_from_mixture(Some(&means), Some(covariances.as_slice()), 100, &mut rng)?;
/// assert_eq!(set.samples.shape(), (100, 2));
/// assert!(set.labels.iter().all(|&c| c < 2));
/// # Ok::<(), manifold_mixture::MixtureError>(())
/// ```
pub fn sample_from_mixture<R: Rng + ?Sized>(
    component_means: Option<&DMatrix<f64>>,
    component_covariances: Option<&[DMatrix<f64>]>,
    n_samples: usize,
    rng: &mut R,
) -> Result<SampleSet> {
    let means = component_means.ok_or_else(|| MixtureError::missing_input("component means"))?;
    let covariances = component_covariances
        .ok_or_else(|| MixtureError::missing_input("component covariances"))?;

    let model = MixtureModel::new(means.clone(), covariances.to_vec())?;
    Ok(model.sample(n_samples, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_component_setup() -> (DMatrix<f64>, Vec<DMatrix<f64>>) {
        let means = DMatrix::from_row_slice(2, 3, &[0.0, 0.0, 0.0, 10.0, -10.0, 5.0]);
        let covariances = vec![
            DMatrix::identity(3, 3),
            DMatrix::from_diagonal(&DVector::from_vec(vec![4.0, 1.0, 0.25])),
        ];
        (means, covariances)
    }

    #[test]
    fn test_sample_shapes_and_labels() {
        let (means, covariances) = two_component_setup();
        let mut rng = StdRng::seed_from_u64(3);
        let set = sample_from_mixture(Some(&means), Some(covariances.as_slice()), 500, &mut rng).unwrap();

        assert_eq!(set.samples.shape(), (500, 3));
        assert_eq!(set.labels.len(), 500);
        assert!(set.labels.iter().all(|&c| c < 2));
        assert_eq!(set.n_samples(), 500);
        assert_eq!(set.dim(), 3);
    }

    #[test]
    fn test_uniform_component_choice() {
        let (means, covariances) = two_component_setup();
        let model = MixtureModel::new(means, covariances).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let set = model.sample(4000, &mut rng);

        let counts = set.component_counts(2);
        assert_eq!(counts.iter().sum::<usize>(), 4000);
        for &count in &counts {
            // Binomial(4000, 0.5) has sd ~32
            assert!((1800..=2200).contains(&count), "{counts:?}");
        }
    }

    #[test]
    fn test_component_statistics() {
        let (means, covariances) = two_component_setup();
        let model = MixtureModel::new(means, covariances).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let set = model.sample(20_000, &mut rng);

        let second = set.samples_for(1);
        let n = second.nrows() as f64;
        let mean = second.row_sum().transpose() / n;
        assert_relative_eq!(mean[0], 10.0, epsilon = 0.1);
        assert_relative_eq!(mean[1], -10.0, epsilon = 0.1);
        assert_relative_eq!(mean[2], 5.0, epsilon = 0.1);

        let var_x = second
            .column(0)
            .iter()
            .map(|x| (x - mean[0]).powi(2))
            .sum::<f64>()
            / n;
        assert_relative_eq!(var_x, 4.0, epsilon = 0.3);
    }

    #[test]
    fn test_missing_inputs_fail() {
        let (means, covariances) = two_component_setup();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            sample_from_mixture(None, Some(covariances.as_slice()), 10, &mut rng),
            Err(MixtureError::MissingInput("component means"))
        );
        assert_eq!(
            sample_from_mixture(Some(&means), None, 10, &mut rng),
            Err(MixtureError::MissingInput("component covariances"))
        );
    }

    #[test]
    fn test_shape_mismatches_fail() {
        let (means, covariances) = two_component_setup();

        let too_few = vec![covariances[0].clone()];
        assert!(matches!(
            MixtureModel::new(means.clone(), too_few),
            Err(MixtureError::ShapeMismatch(_))
        ));

        let wrong_dim = vec![DMatrix::identity(3, 3), DMatrix::identity(2, 2)];
        assert!(matches!(
            MixtureModel::new(means, wrong_dim),
            Err(MixtureError::ShapeMismatch(msg)) if msg.contains("covariance 1")
        ));

        assert!(matches!(
            MixtureModel::new(DMatrix::zeros(0, 3), Vec::new()),
            Err(MixtureError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_zero_samples() {
        let (means, covariances) = two_component_setup();
        let model = MixtureModel::new(means, covariances).unwrap();
        let set = model.sample(0, &mut StdRng::seed_from_u64(0));
        assert_eq!(set.samples.shape(), (0, 3));
        assert!(set.labels.is_empty());
    }

    #[test]
    fn test_same_seed_same_samples() {
        let (means, covariances) = two_component_setup();
        let model = MixtureModel::new(means, covariances).unwrap();
        let a = model.sample(50, &mut StdRng::seed_from_u64(21));
        let b = model.sample(50, &mut StdRng::seed_from_u64(21));
        assert_eq!(a, b);
    }
}
