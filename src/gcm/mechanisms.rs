// src/gcm/mechanisms.rs

//! Stock stochastic models, predictors and causal mechanisms.

use crate::core::{Dataset, RelevanceError, Result};
use crate::traits::{CausalMechanism, PredictModel, ProbabilityModel, StochasticModel};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal, Uniform};

/// Univariate normal distribution.
#[derive(Debug, Clone)]
pub struct GaussianDistribution {
    distribution: Normal<f64>,
}

impl GaussianDistribution {
    pub fn new(mean: f64, std_dev: f64) -> Result<Self> {
        if !(std_dev >= 0.0) {
            return Err(RelevanceError::InvalidInput(format!(
                "Standard deviation must be non-negative, got {}.",
                std_dev
            )));
        }
        let distribution = Normal::new(mean, std_dev).map_err(|e| {
            RelevanceError::InvalidInput(format!("Invalid normal distribution parameters: {}", e))
        })?;
        Ok(GaussianDistribution { distribution })
    }
}

impl StochasticModel for GaussianDistribution {
    fn draw_samples(&self, num_samples: usize, rng: &mut dyn RngCore) -> Dataset {
        Dataset::from_shape_simple_fn((num_samples, 1), || self.distribution.sample(&mut *rng))
    }
}

/// Univariate uniform distribution on `[low, high)`.
#[derive(Debug, Clone)]
pub struct UniformDistribution {
    distribution: Uniform<f64>,
}

impl UniformDistribution {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !(low < high) {
            return Err(RelevanceError::InvalidInput(format!(
                "Uniform distribution needs low < high, got [{}, {}).",
                low, high
            )));
        }
        Ok(UniformDistribution {
            distribution: Uniform::new(low, high),
        })
    }
}

impl StochasticModel for UniformDistribution {
    fn draw_samples(&self, num_samples: usize, rng: &mut dyn RngCore) -> Dataset {
        Dataset::from_shape_simple_fn((num_samples, 1), || self.distribution.sample(&mut *rng))
    }
}

/// Resamples rows of observed data with replacement.
#[derive(Debug, Clone)]
pub struct EmpiricalDistribution {
    samples: Dataset,
}

impl EmpiricalDistribution {
    pub fn new(samples: Dataset) -> Result<Self> {
        if samples.nrows() == 0 {
            return Err(RelevanceError::InvalidInput(
                "Empirical distribution needs at least one sample.".to_string(),
            ));
        }
        Ok(EmpiricalDistribution { samples })
    }
}

impl StochasticModel for EmpiricalDistribution {
    fn draw_samples(&self, num_samples: usize, rng: &mut dyn RngCore) -> Dataset {
        let rows: Vec<usize> = (0..num_samples)
            .map(|_| rng.gen_range(0..self.samples.nrows()))
            .collect();
        self.samples.select(Axis(0), &rows)
    }
}

/// `f(x) = coefficients . x + intercept`
#[derive(Debug, Clone)]
pub struct LinearModel {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LinearModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        LinearModel {
            coefficients: Array1::from(coefficients),
            intercept,
        }
    }
}

impl PredictModel for LinearModel {
    fn predict(&self, instances: ArrayView2<f64>) -> Result<Array2<f64>> {
        if instances.ncols() != self.coefficients.len() {
            return Err(RelevanceError::IncompatibleDimensions(format!(
                "Model expects {} features, got {}",
                self.coefficients.len(),
                instances.ncols()
            )));
        }
        Ok((instances.dot(&self.coefficients) + self.intercept).insert_axis(Axis(1)))
    }

    fn num_features(&self) -> usize {
        self.coefficients.len()
    }
}

/// `Y = f(parents) + N` with noise `N` independent of the parents.
pub struct AdditiveNoiseModel {
    prediction_model: Box<dyn PredictModel>,
    noise_model: Box<dyn StochasticModel>,
}

impl AdditiveNoiseModel {
    pub fn new(prediction_model: Box<dyn PredictModel>, noise_model: Box<dyn StochasticModel>) -> Self {
        AdditiveNoiseModel {
            prediction_model,
            noise_model,
        }
    }
}

impl CausalMechanism for AdditiveNoiseModel {
    fn draw_noise_samples(&self, num_samples: usize, rng: &mut dyn RngCore) -> Dataset {
        self.noise_model.draw_samples(num_samples, rng)
    }

    fn evaluate(&self, parent_samples: ArrayView2<f64>, noise_samples: ArrayView2<f64>) -> Result<Array1<f64>> {
        check_noise_shape(parent_samples, noise_samples, 1)?;
        if parent_samples.ncols() != self.prediction_model.num_features() {
            return Err(RelevanceError::IncompatibleDimensions(format!(
                "Prediction model expects {} parents, got {}.",
                self.prediction_model.num_features(),
                parent_samples.ncols()
            )));
        }
        let predictions = self.prediction_model.predict(parent_samples)?;
        if predictions.dim() != (parent_samples.nrows(), 1) {
            return Err(RelevanceError::ModelPredictionError(format!(
                "Additive noise models need a single output per row, got shape {:?}.",
                predictions.dim()
            )));
        }
        Ok(&predictions.column(0) + &noise_samples.column(0))
    }
}

/// Draws a class label from the class probabilities of a classifier.
///
/// The noise is `U ~ Uniform(0, 1)`; the label is the first class whose cumulative probability
/// exceeds `U`, so that the label is a deterministic function of parents and noise.
pub struct ClassifierMechanism {
    classifier: Box<dyn ProbabilityModel>,
    noise: Uniform<f64>,
}

impl ClassifierMechanism {
    pub fn new(classifier: Box<dyn ProbabilityModel>) -> Self {
        ClassifierMechanism {
            classifier,
            noise: Uniform::new(0.0, 1.0),
        }
    }
}

impl CausalMechanism for ClassifierMechanism {
    fn draw_noise_samples(&self, num_samples: usize, rng: &mut dyn RngCore) -> Dataset {
        Dataset::from_shape_simple_fn((num_samples, 1), || self.noise.sample(&mut *rng))
    }

    fn evaluate(&self, parent_samples: ArrayView2<f64>, noise_samples: ArrayView2<f64>) -> Result<Array1<f64>> {
        check_noise_shape(parent_samples, noise_samples, 1)?;
        let probabilities = self.classifier.predict_probabilities(parent_samples)?;
        let classes = self.classifier.classes();
        if classes.is_empty() || probabilities.dim() != (parent_samples.nrows(), classes.len()) {
            return Err(RelevanceError::ModelPredictionError(format!(
                "Classifier returned probabilities of shape {:?} for {} samples and {} classes.",
                probabilities.dim(),
                parent_samples.nrows(),
                classes.len()
            )));
        }

        let labels = probabilities
            .rows()
            .into_iter()
            .zip(noise_samples.column(0).iter())
            .map(|(row, &u)| {
                let mut cumulative = 0.0;
                for (class_idx, p) in row.iter().enumerate() {
                    cumulative += p;
                    if cumulative > u {
                        return classes[class_idx];
                    }
                }
                classes[classes.len() - 1]
            })
            .collect();
        Ok(labels)
    }

    fn supports_probability_estimation(&self) -> bool {
        true
    }
}

fn check_noise_shape(parent_samples: ArrayView2<f64>, noise_samples: ArrayView2<f64>, dims: usize) -> Result<()> {
    if noise_samples.nrows() != parent_samples.nrows() || noise_samples.ncols() != dims {
        return Err(RelevanceError::IncompatibleDimensions(format!(
            "Expected {} noise rows with {} columns, got shape {:?}.",
            parent_samples.nrows(),
            dims,
            noise_samples.dim()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Threshold;

    impl ProbabilityModel for Threshold {
        fn predict_probabilities(&self, instances: ArrayView2<f64>) -> Result<Array2<f64>> {
            Ok(Array2::from_shape_fn((instances.nrows(), 2), |(i, j)| {
                let p = instances[[i, 0]].clamp(0.0, 1.0);
                if j == 0 { p } else { 1.0 - p }
            }))
        }

        fn classes(&self) -> &[f64] {
            &[0.0, 1.0]
        }
    }

    #[test]
    fn gaussian_matches_its_moments() {
        let mut rng = StdRng::seed_from_u64(0);
        let samples = GaussianDistribution::new(2.0, 0.5).unwrap().draw_samples(20_000, &mut rng);
        assert_eq!(samples.dim(), (20_000, 1));
        assert_abs_diff_eq!(samples.mean().unwrap(), 2.0, epsilon = 0.02);
        assert_abs_diff_eq!(samples.column(0).var(0.0), 0.25, epsilon = 0.01);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(matches!(GaussianDistribution::new(0.0, -1.0), Err(RelevanceError::InvalidInput(_))));
        assert!(GaussianDistribution::new(0.0, f64::NAN).is_err());
        assert!(GaussianDistribution::new(1.0, 0.0).is_ok());
        assert!(UniformDistribution::new(1.0, 1.0).is_err());
        assert!(EmpiricalDistribution::new(Array2::zeros((0, 2))).is_err());
    }

    #[test]
    fn empirical_draws_only_observed_rows() {
        let mut rng = StdRng::seed_from_u64(1);
        let observed = array![[1.0, 10.0], [2.0, 20.0]];
        let drawn = EmpiricalDistribution::new(observed).unwrap().draw_samples(50, &mut rng);
        assert_eq!(drawn.dim(), (50, 2));
        for row in drawn.rows() {
            assert_eq!(row[1], row[0] * 10.0);
        }
    }

    #[test]
    fn additive_noise_model_adds_noise_to_the_prediction() -> Result<()> {
        let mechanism = AdditiveNoiseModel::new(
            Box::new(LinearModel::new(vec![3.0, 1.0], 0.0)),
            Box::new(GaussianDistribution::new(0.0, 0.2)?),
        );
        let parents = array![[1.0, 2.0], [0.0, -1.0]];
        let noise = array![[0.5], [-0.5]];
        let values = mechanism.evaluate(parents.view(), noise.view())?;
        assert_eq!(values, array![5.5, -1.5]);
        assert!(!mechanism.supports_probability_estimation());

        let bad_noise = array![[0.5]];
        assert!(mechanism.evaluate(parents.view(), bad_noise.view()).is_err());

        let one_parent = array![[1.0], [2.0]];
        assert!(matches!(
            mechanism.evaluate(one_parent.view(), noise.view()),
            Err(RelevanceError::IncompatibleDimensions(_))
        ));
        Ok(())
    }

    #[test]
    fn classifier_mechanism_inverts_the_cumulative_probabilities() -> Result<()> {
        let mechanism = ClassifierMechanism::new(Box::new(Threshold));
        let parents = array![[0.3], [0.3], [1.0], [0.0]];
        let noise = array![[0.1], [0.9], [0.99], [0.01]];
        let labels = mechanism.evaluate(parents.view(), noise.view())?;
        assert_eq!(labels, array![0.0, 1.0, 0.0, 1.0]);
        assert!(mechanism.supports_probability_estimation());

        let mut rng = StdRng::seed_from_u64(2);
        let drawn = mechanism.draw_noise_samples(100, &mut rng);
        assert!(drawn.iter().all(|u| (0.0..1.0).contains(u)));
        Ok(())
    }
}
