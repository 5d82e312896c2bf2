// src/traits.rs

//! Model interfaces consumed by the relevance engine and the causal model.

use crate::core::{Dataset, Result};
use ndarray::{Array1, Array2, ArrayView2};
use rand::RngCore;

/// A deterministic predictor mapping feature rows to rows of outputs.
pub trait PredictModel {
    /// Returns a `rows x outputs` matrix; regressors return a single column.
    fn predict(&self, instances: ArrayView2<f64>) -> Result<Array2<f64>>;

    fn num_features(&self) -> usize;
}

/// A classifier exposing class probabilities.
pub trait ProbabilityModel {
    /// Returns a `rows x classes` matrix, columns ordered as [`ProbabilityModel::classes`].
    fn predict_probabilities(&self, instances: ArrayView2<f64>) -> Result<Array2<f64>>;

    /// Class labels, encoded as `f64`.
    fn classes(&self) -> &[f64];
}

/// A model that can generate samples without any inputs, used for root nodes and noise terms.
pub trait StochasticModel {
    /// Draws `num_samples` rows. The number of columns is fixed per model.
    fn draw_samples(&self, num_samples: usize, rng: &mut dyn RngCore) -> Dataset;
}

/// The node-local mechanism generating a variable from its direct causes plus noise.
pub trait CausalMechanism {
    /// Draws `num_samples` rows of the mechanism's noise, with
    /// [`CausalMechanism::noise_dimensions`] columns.
    fn draw_noise_samples(&self, num_samples: usize, rng: &mut dyn RngCore) -> Dataset;

    /// Evaluates the mechanism on row-aligned parent and noise samples.
    fn evaluate(&self, parent_samples: ArrayView2<f64>, noise_samples: ArrayView2<f64>) -> Result<Array1<f64>>;

    fn noise_dimensions(&self) -> usize {
        1
    }

    /// Whether the mechanism is classification-like, i.e. produces labels from estimated
    /// class probabilities. Drives the choice of the default attribution function.
    fn supports_probability_estimation(&self) -> bool {
        false
    }
}
