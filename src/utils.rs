// src/utils.rs

//! Stock attribution functions and sampling helpers.
//!
//! An attribution function compares the predictions obtained for one sample of interest when some
//! features are randomized (first argument, one `outputs` wide row per background sample) with the
//! baseline prediction of that sample (second argument, `outputs` values).

use crate::core::Dataset;
use ndarray::{ArrayView1, ArrayView2, Axis};
use rand::seq::index;
use rand::Rng;

/// Signature shared by all attribution functions.
pub type AttributionFn = fn(ArrayView2<f64>, ArrayView1<f64>) -> f64;

/// Variance of `randomized_predictions - baseline_values` over all entries. Suited for continuous
/// outputs.
pub fn variance_of_deviations(randomized_predictions: ArrayView2<f64>, baseline_values: ArrayView1<f64>) -> f64 {
    (&randomized_predictions - &baseline_values).var(0.0)
}

/// Variance of the indicator `randomized_prediction == baseline_value` over all entries. Suited for
/// class labels.
pub fn variance_of_matching_values(randomized_predictions: ArrayView2<f64>, baseline_values: ArrayView1<f64>) -> f64 {
    let mut matches = randomized_predictions.to_owned();
    for mut row in matches.rows_mut() {
        row.zip_mut_with(&baseline_values, |p, &b| *p = (*p == b) as u8 as f64);
    }
    matches.var(0.0)
}

/// Difference between the mean randomized prediction and the mean baseline value.
pub fn means_difference(randomized_predictions: ArrayView2<f64>, baseline_values: ArrayView1<f64>) -> f64 {
    let baseline = baseline_values.mean().unwrap_or(0.0);
    randomized_predictions.mean().unwrap_or(baseline) - baseline
}

/// Default comparator for a mechanism, depending on whether it estimates class probabilities.
pub fn default_attribution_func(supports_probability_estimation: bool) -> AttributionFn {
    if supports_probability_estimation {
        variance_of_matching_values
    } else {
        variance_of_deviations
    }
}

/// Uniformly selects `min(max_rows, nrows)` distinct rows.
pub fn choose_rows<R: Rng + ?Sized>(samples: ArrayView2<f64>, max_rows: usize, rng: &mut R) -> Dataset {
    let amount = max_rows.min(samples.nrows());
    let chosen = index::sample(rng, samples.nrows(), amount).into_vec();
    samples.select(Axis(0), &chosen)
}
