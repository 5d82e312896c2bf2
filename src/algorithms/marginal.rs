// src/algorithms/marginal.rs

//! Marginalization of features by resampling them from background data.
//!
//! For a sample of interest `x` and a set of features of interest `S`, each background row `b`
//! yields one perturbed row that takes `x` on `S` and `b` everywhere else. The predictions on
//! these perturbed rows estimate the interventional distribution of the output when the features
//! outside of `S` are marginalized out. Predictions are `rows x outputs` matrices, so regressors
//! return a single column and probabilistic classifiers one column per class.

use crate::core::{Dataset, RelevanceError, Result};
use log::trace;
use ndarray::{s, Array1, Array2, Array3, ArrayView2, Axis};
use rand::seq::SliceRandom;
use rand::Rng;

/// How features outside of the features of interest are randomized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeaturePerturbation {
    /// Every background row is used as one joint draw, keeping the dependencies between the
    /// randomized features. Background rows keep their order, so perturbed row `b` always pairs
    /// with background row `b`; only comparators insensitive to the row order see the same result
    /// as a joint row permutation.
    #[default]
    RandomizeColumnsJointly,
    /// Each randomized column is permuted on its own, which breaks the dependencies between the
    /// randomized features.
    RandomizeColumnsIndependently,
}

/// Upper bound on the number of rows handed to the prediction method per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSize {
    /// All perturbed rows in a single call.
    All,
    Rows(usize),
}

impl Default for BatchSize {
    fn default() -> Self {
        BatchSize::Rows(100)
    }
}

/// Predictions for every pair of sample of interest and background sample, with the
/// `features_of_interest` columns fixed to the values of the sample of interest.
///
/// Returns a `samples_of_interest.nrows() x feature_samples.nrows() x outputs` array, the first
/// axis aligned with `samples_of_interest`. Every batch must yield the same number of outputs.
pub fn marginal_expectation<P, R>(
    prediction_method: &P,
    feature_samples: ArrayView2<f64>,
    samples_of_interest: ArrayView2<f64>,
    features_of_interest: &[usize],
    perturbation: FeaturePerturbation,
    batch_size: BatchSize,
    rng: &mut R,
) -> Result<Array3<f64>>
where
    P: Fn(ArrayView2<f64>) -> Result<Array2<f64>> + ?Sized,
    R: Rng + ?Sized,
{
    let num_features = feature_samples.ncols();
    if samples_of_interest.ncols() != num_features {
        return Err(RelevanceError::IncompatibleDimensions(format!(
            "Samples of interest have {} features, but background samples have {}.",
            samples_of_interest.ncols(),
            num_features
        )));
    }
    if let Some(&invalid) = features_of_interest.iter().find(|&&j| j >= num_features) {
        return Err(RelevanceError::InvalidInput(format!(
            "Feature index {} is out of bounds for {} features.",
            invalid, num_features
        )));
    }
    if batch_size == BatchSize::Rows(0) {
        return Err(RelevanceError::InvalidInput(
            "Batch size must be positive.".to_string(),
        ));
    }

    let shuffled;
    let background = match perturbation {
        FeaturePerturbation::RandomizeColumnsJointly => feature_samples.view(),
        FeaturePerturbation::RandomizeColumnsIndependently => {
            shuffled = permute_columns_independently(feature_samples, features_of_interest, rng);
            shuffled.view()
        }
    };

    let num_background = background.nrows();
    let num_interest = samples_of_interest.nrows();
    let total_rows = num_interest * num_background;
    if total_rows == 0 {
        return Ok(Array3::zeros((num_interest, num_background, 0)));
    }

    let batch_rows = match batch_size {
        BatchSize::All => total_rows,
        BatchSize::Rows(n) => n.min(total_rows),
    };
    let mut inputs = Dataset::zeros((batch_rows, num_features));
    let mut predictions: Option<Array2<f64>> = None;

    let mut start = 0;
    while start < total_rows {
        let end = (start + batch_rows).min(total_rows);
        let len = end - start;

        for (offset, mut row) in inputs.slice_mut(s![..len, ..]).rows_mut().into_iter().enumerate() {
            let flat = start + offset;
            let interest_idx = flat / num_background;
            row.assign(&background.row(flat % num_background));
            for &j in features_of_interest {
                row[j] = samples_of_interest[[interest_idx, j]];
            }
        }

        let batch_predictions = prediction_method(inputs.slice(s![..len, ..]))?;
        let num_outputs = predictions
            .as_ref()
            .map_or(batch_predictions.ncols(), |p| p.ncols());
        if batch_predictions.nrows() != len || batch_predictions.ncols() != num_outputs || num_outputs == 0 {
            return Err(RelevanceError::ModelPredictionError(format!(
                "Prediction method returned shape {:?} for {} rows, expected {} outputs per row.",
                batch_predictions.dim(),
                len,
                num_outputs
            )));
        }
        predictions
            .get_or_insert_with(|| Array2::zeros((total_rows, num_outputs)))
            .slice_mut(s![start..end, ..])
            .assign(&batch_predictions);
        trace!("predicted perturbed rows {}..{} of {}", start, end, total_rows);

        start = end;
    }

    let predictions = predictions.ok_or_else(|| {
        RelevanceError::InternalError("No batch was predicted.".to_string())
    })?;
    let num_outputs = predictions.ncols();
    Ok(predictions.into_shape((num_interest, num_background, num_outputs))?)
}

/// Like [`marginal_expectation`], but returns the mean prediction per sample of interest as a
/// `samples_of_interest.nrows() x outputs` matrix.
pub fn averaged_marginal_expectation<P, R>(
    prediction_method: &P,
    feature_samples: ArrayView2<f64>,
    samples_of_interest: ArrayView2<f64>,
    features_of_interest: &[usize],
    perturbation: FeaturePerturbation,
    batch_size: BatchSize,
    rng: &mut R,
) -> Result<Array2<f64>>
where
    P: Fn(ArrayView2<f64>) -> Result<Array2<f64>> + ?Sized,
    R: Rng + ?Sized,
{
    if feature_samples.nrows() == 0 {
        return Err(RelevanceError::InvalidInput(
            "Background samples cannot be empty.".to_string(),
        ));
    }
    let predictions = marginal_expectation(
        prediction_method,
        feature_samples,
        samples_of_interest,
        features_of_interest,
        perturbation,
        batch_size,
        rng,
    )?;
    predictions.mean_axis(Axis(1)).ok_or_else(|| {
        RelevanceError::InternalError("Failed to average marginal predictions.".to_string())
    })
}

fn permute_columns_independently<R: Rng + ?Sized>(
    feature_samples: ArrayView2<f64>,
    fixed_features: &[usize],
    rng: &mut R,
) -> Dataset {
    let mut permuted = feature_samples.to_owned();
    for (j, mut column) in permuted.columns_mut().into_iter().enumerate() {
        if fixed_features.contains(&j) {
            continue;
        }
        let mut values = column.to_vec();
        values.shuffle(rng);
        column.assign(&Array1::from(values));
    }
    permuted
}
