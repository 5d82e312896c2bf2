// src/algorithms/feature_relevance.rs

//! Shapley-value feature relevance with customizable set functions.
//!
//! The cooperative game assigns to a subset `S` of features the comparison between the predictions
//! obtained when the features outside of `S` are randomized and a baseline, typically the
//! unperturbed prediction. The comparison is done per sample of interest by an attribution
//! function, e.g. [`crate::utils::variance_of_deviations`].
//!
//! Prediction methods return one row of outputs per input row: a single column for regressors,
//! one column per class for probabilistic classifiers.
//!
//! Related paper:
//! Janzing, D., Minorics, L., & Bloebaum, P. (2020).
//! Feature relevance quantification in explainable AI: A causal problem.
//! In International Conference on Artificial Intelligence and Statistics (pp. 2907-2916). PMLR.

use crate::algorithms::marginal::{marginal_expectation, BatchSize, FeaturePerturbation};
use crate::algorithms::shapley::{estimate_shapley_values, ShapleyConfig};
use crate::core::{Relevance, RelevanceError, Result};
use crate::utils::choose_rows;
use log::debug;
use ndarray::{array, Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;

/// Settings shared by the sample and distribution level estimators.
#[derive(Debug, Clone)]
pub struct RelevanceConfig {
    /// Bounds the number of perturbed rows per prediction call, the main driver of peak memory.
    pub max_batch_size: BatchSize,
    /// Joint randomization is what the underlying theory is based on. Independent randomization is
    /// available but does not carry the same guarantees.
    pub feature_perturbation: FeaturePerturbation,
    /// Multiplies every set function value. Use `-1.0` with comparators that shrink as more
    /// features are fixed (e.g. variances of deviations) so that relevant features get positive
    /// attributions.
    pub subset_scaling_factor: f64,
    pub shapley_config: ShapleyConfig,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        RelevanceConfig {
            max_batch_size: BatchSize::default(),
            feature_perturbation: FeaturePerturbation::default(),
            subset_scaling_factor: 1.0,
            shapley_config: ShapleyConfig::default(),
        }
    }
}

impl RelevanceConfig {
    /// Defaults for comparators measuring a discrepancy to the baseline.
    pub fn for_deviation_comparators() -> Self {
        RelevanceConfig {
            subset_scaling_factor: -1.0,
            ..RelevanceConfig::default()
        }
    }
}

/// Values the subset specific predictions are compared with.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Baseline {
    /// The prediction method applied to the unmodified samples of interest. The set function of
    /// the full feature set then compares identical predictions.
    #[default]
    Predicted,
    /// Externally supplied values, one row per sample of interest with as many columns as the
    /// prediction method has outputs, e.g. observed outcomes. This attributes the prediction error
    /// rather than the prediction variance: the full feature set no longer evaluates to zero.
    Given(Array2<f64>),
}

/// The set function of the cooperative game, bundling everything one evaluation needs.
pub struct SubsetValueFunction<'a, P: ?Sized, A: ?Sized> {
    prediction_method: &'a P,
    feature_samples: ArrayView2<'a, f64>,
    samples_of_interest: ArrayView2<'a, f64>,
    baseline_values: Array2<f64>,
    attribution_func: &'a A,
    average_set_function: bool,
    subset_scaling_factor: f64,
    feature_perturbation: FeaturePerturbation,
    max_batch_size: BatchSize,
}

impl<'a, P, A> SubsetValueFunction<'a, P, A>
where
    P: Fn(ArrayView2<f64>) -> Result<Array2<f64>> + ?Sized,
    A: Fn(ArrayView2<f64>, ArrayView1<f64>) -> f64 + ?Sized,
{
    pub fn new(
        prediction_method: &'a P,
        feature_samples: ArrayView2<'a, f64>,
        samples_of_interest: ArrayView2<'a, f64>,
        attribution_func: &'a A,
        baseline: Baseline,
        average_set_function: bool,
        config: &RelevanceConfig,
    ) -> Result<Self> {
        if feature_samples.nrows() == 0 {
            return Err(RelevanceError::InvalidInput(
                "Background samples cannot be empty.".to_string(),
            ));
        }
        if samples_of_interest.nrows() == 0 {
            return Err(RelevanceError::InvalidInput(
                "Samples of interest cannot be empty.".to_string(),
            ));
        }
        if feature_samples.ncols() != samples_of_interest.ncols() {
            return Err(RelevanceError::IncompatibleDimensions(format!(
                "Background samples have {} features, but samples of interest have {}.",
                feature_samples.ncols(),
                samples_of_interest.ncols()
            )));
        }

        let baseline_values = match baseline {
            Baseline::Predicted => {
                let predicted = prediction_method(samples_of_interest)?;
                if predicted.nrows() != samples_of_interest.nrows() || predicted.ncols() == 0 {
                    return Err(RelevanceError::ModelPredictionError(format!(
                        "Prediction method returned shape {:?} for {} samples of interest.",
                        predicted.dim(),
                        samples_of_interest.nrows()
                    )));
                }
                predicted
            }
            Baseline::Given(values) => {
                if values.nrows() != samples_of_interest.nrows() {
                    return Err(RelevanceError::IncompatibleDimensions(format!(
                        "Samples of interest and the given baseline values need to have the same sample size, got {} and {}.",
                        samples_of_interest.nrows(),
                        values.nrows()
                    )));
                }
                values
            }
        };

        Ok(SubsetValueFunction {
            prediction_method,
            feature_samples,
            samples_of_interest,
            baseline_values,
            attribution_func,
            average_set_function,
            subset_scaling_factor: config.subset_scaling_factor,
            feature_perturbation: config.feature_perturbation,
            max_batch_size: config.max_batch_size,
        })
    }

    pub fn num_players(&self) -> usize {
        self.feature_samples.ncols()
    }

    pub fn baseline_values(&self) -> &Array2<f64> {
        &self.baseline_values
    }

    /// Value of the coalition `subset`: a single averaged value, or one value per sample of
    /// interest.
    pub fn evaluate<R: Rng + ?Sized>(&self, subset: &[bool], rng: &mut R) -> Result<Array1<f64>> {
        if subset.len() != self.num_players() {
            return Err(RelevanceError::InvalidInput(format!(
                "Subset has {} entries, but there are {} features.",
                subset.len(),
                self.num_players()
            )));
        }
        let features_of_interest: Vec<usize> = subset
            .iter()
            .enumerate()
            .filter(|(_, &member)| member)
            .map(|(j, _)| j)
            .collect();

        let predictions = marginal_expectation(
            self.prediction_method,
            self.feature_samples,
            self.samples_of_interest,
            &features_of_interest,
            self.feature_perturbation,
            self.max_batch_size,
            rng,
        )?;

        let num_outputs = predictions.shape()[2];
        if num_outputs != self.baseline_values.ncols() {
            return Err(RelevanceError::IncompatibleDimensions(format!(
                "Prediction method has {} outputs, but the baseline values have {} columns.",
                num_outputs,
                self.baseline_values.ncols()
            )));
        }

        let results: Array1<f64> = predictions
            .outer_iter()
            .zip(self.baseline_values.rows())
            .map(|(randomized, baseline)| {
                self.subset_scaling_factor * (self.attribution_func)(randomized, baseline)
            })
            .collect();

        if self.average_set_function {
            let mean = results.mean().ok_or_else(|| {
                RelevanceError::InternalError("Failed to average set function values.".to_string())
            })?;
            Ok(array![mean])
        } else {
            Ok(results)
        }
    }
}

/// Estimates the feature relevance of `prediction_method` for each row of `samples_of_interest`,
/// using all rows of `feature_samples` as background samples.
///
/// With `average_set_function` the set function values of all samples of interest are averaged
/// before the Shapley estimation and a [`Relevance::Population`] is returned, otherwise one
/// attribution row per sample of interest ([`Relevance::PerSample`]).
#[allow(clippy::too_many_arguments)]
pub fn feature_relevance_sample<'a, P, A, R>(
    prediction_method: &'a P,
    feature_samples: ArrayView2<'a, f64>,
    samples_of_interest: ArrayView2<'a, f64>,
    attribution_func: &'a A,
    baseline: Baseline,
    average_set_function: bool,
    config: &RelevanceConfig,
    rng: &mut R,
) -> Result<Relevance>
where
    P: Fn(ArrayView2<f64>) -> Result<Array2<f64>> + ?Sized,
    A: Fn(ArrayView2<f64>, ArrayView1<f64>) -> f64 + ?Sized,
    R: Rng + ?Sized,
{
    let set_function = SubsetValueFunction::new(
        prediction_method,
        feature_samples,
        samples_of_interest,
        attribution_func,
        baseline,
        average_set_function,
        config,
    )?;

    let shapley_values = estimate_shapley_values(
        |subset: &[bool], rng: &mut R| set_function.evaluate(subset, rng),
        set_function.num_players(),
        &config.shapley_config,
        rng,
    )?;

    if average_set_function {
        Ok(Relevance::Population(shapley_values.row(0).to_owned()))
    } else {
        Ok(Relevance::PerSample(shapley_values))
    }
}

/// Estimates the population based feature relevance of the input features of
/// `prediction_method`.
///
/// At most `max_num_evaluation_samples` rows of `feature_samples` are drawn as samples of interest
/// and, independently, at most `max_num_background_samples` rows as background samples. Smaller
/// pools are used entirely. Due to the linearity of the Shapley value, averaging the set function
/// is equivalent to averaging the per-sample attributions.
#[allow(clippy::too_many_arguments)]
pub fn feature_relevance_distribution<P, A, R>(
    prediction_method: &P,
    feature_samples: ArrayView2<f64>,
    attribution_func: &A,
    max_num_background_samples: usize,
    max_num_evaluation_samples: usize,
    config: &RelevanceConfig,
    rng: &mut R,
) -> Result<Array1<f64>>
where
    P: Fn(ArrayView2<f64>) -> Result<Array2<f64>> + ?Sized,
    A: Fn(ArrayView2<f64>, ArrayView1<f64>) -> f64 + ?Sized,
    R: Rng + ?Sized,
{
    if feature_samples.nrows() == 0 {
        return Err(RelevanceError::InvalidInput(
            "Feature samples cannot be empty.".to_string(),
        ));
    }

    let samples_of_interest = choose_rows(feature_samples, max_num_evaluation_samples, rng);
    let background_samples = choose_rows(feature_samples, max_num_background_samples, rng);
    debug!(
        "feature relevance on {} evaluation and {} background samples out of {}",
        samples_of_interest.nrows(),
        background_samples.nrows(),
        feature_samples.nrows()
    );

    let relevance = feature_relevance_sample(
        prediction_method,
        background_samples.view(),
        samples_of_interest.view(),
        attribution_func,
        Baseline::Predicted,
        true,
        config,
        rng,
    )?;
    Ok(relevance.into_population())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::shapley::ShapleyApproximationMethod;
    use crate::core::shape_into_2d;
    use crate::utils::{means_difference, variance_of_deviations};
    use approx::assert_abs_diff_eq;
    use ndarray::Axis;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, StandardNormal};
    use std::cell::Cell;

    fn standard_normal_samples(rows: usize, cols: usize, rng: &mut StdRng) -> Array2<f64> {
        Array2::from_shape_simple_fn((rows, cols), || StandardNormal.sample(&mut *rng))
    }

    fn linear(x: ArrayView2<f64>) -> Result<Array2<f64>> {
        Ok(x.dot(&array![2.0, -1.0, 0.5]).insert_axis(Axis(1)))
    }

    fn exact_config() -> RelevanceConfig {
        RelevanceConfig {
            shapley_config: ShapleyConfig::with_method(ShapleyApproximationMethod::Exact),
            ..RelevanceConfig::for_deviation_comparators()
        }
    }

    #[test]
    fn per_sample_mode_returns_one_row_per_sample_of_interest() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(0);
        let background = standard_normal_samples(40, 3, &mut rng);
        let interest = standard_normal_samples(6, 3, &mut rng);

        let relevance = feature_relevance_sample(
            &linear,
            background.view(),
            interest.view(),
            &means_difference,
            Baseline::Predicted,
            false,
            &RelevanceConfig::default(),
            &mut rng,
        )?;

        let per_sample = relevance.as_per_sample().expect("per-sample relevance");
        assert_eq!(per_sample.dim(), (6, 3));

        // For a linear model and the means difference, fixing feature j in sample i moves the mean
        // prediction by coef_j * (x_ij - E[x_j]).
        let coefficients = [2.0, -1.0, 0.5];
        let means = background.mean_axis(Axis(0)).unwrap();
        for i in 0..6 {
            for j in 0..3 {
                let expected = coefficients[j] * (interest[[i, j]] - means[j]);
                assert_abs_diff_eq!(per_sample[[i, j]], expected, epsilon = 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn averaged_mode_returns_a_single_vector() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(1);
        let background = standard_normal_samples(30, 3, &mut rng);
        let interest = standard_normal_samples(5, 3, &mut rng);

        let relevance = feature_relevance_sample(
            &linear,
            background.view(),
            interest.view(),
            &variance_of_deviations,
            Baseline::Predicted,
            true,
            &exact_config(),
            &mut rng,
        )?;
        assert_eq!(relevance.as_population().map(|v| v.len()), Some(3));
        Ok(())
    }

    #[test]
    fn averaged_relevance_equals_mean_of_per_sample_relevance() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(2);
        let background = standard_normal_samples(25, 3, &mut rng);
        let interest = standard_normal_samples(8, 3, &mut rng);
        let squared = |x: ArrayView2<f64>| -> Result<Array2<f64>> {
            Ok(x.map_axis(Axis(1), |row| row[0] * row[1] + row[2] * row[2]).insert_axis(Axis(1)))
        };

        let mut run = |average: bool| {
            feature_relevance_sample(
                &squared,
                background.view(),
                interest.view(),
                &variance_of_deviations,
                Baseline::Predicted,
                average,
                &exact_config(),
                &mut rng,
            )
        };
        let averaged = run(true)?.into_population();
        let per_sample_mean = run(false)?.into_population();
        for j in 0..3 {
            assert_abs_diff_eq!(averaged[j], per_sample_mean[j], epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn full_coalition_evaluates_to_zero() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(3);
        let background = standard_normal_samples(50, 3, &mut rng);
        let interest = standard_normal_samples(10, 3, &mut rng);
        let config = RelevanceConfig::default();
        let set_function = SubsetValueFunction::new(
            &linear,
            background.view(),
            interest.view(),
            &variance_of_deviations,
            Baseline::Predicted,
            false,
            &config,
        )?;

        let full = set_function.evaluate(&[true, true, true], &mut rng)?;
        assert_eq!(full.len(), 10);
        for value in full.iter() {
            assert_abs_diff_eq!(*value, 0.0, epsilon = 1e-12);
        }

        let empty = set_function.evaluate(&[false, false, false], &mut rng)?;
        assert!(empty.iter().all(|v| *v > 0.0));
        Ok(())
    }

    #[test]
    fn attributions_add_up_to_the_full_versus_empty_comparison() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(4);
        let background = standard_normal_samples(60, 3, &mut rng);
        let interest = standard_normal_samples(12, 3, &mut rng);
        let config = exact_config();

        let relevance = feature_relevance_sample(
            &linear,
            background.view(),
            interest.view(),
            &variance_of_deviations,
            Baseline::Predicted,
            true,
            &config,
            &mut rng,
        )?
        .into_population();

        let set_function = SubsetValueFunction::new(
            &linear,
            background.view(),
            interest.view(),
            &variance_of_deviations,
            Baseline::Predicted,
            true,
            &config,
        )?;
        let full = set_function.evaluate(&[true; 3], &mut rng)?[0];
        let empty = set_function.evaluate(&[false; 3], &mut rng)?[0];
        assert_abs_diff_eq!(relevance.sum(), full - empty, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn degenerate_comparator_yields_zero_attributions() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(5);
        let samples = standard_normal_samples(80, 3, &mut rng);
        let zero = |_: ArrayView2<f64>, _: ArrayView1<f64>| 0.0;

        let relevance = feature_relevance_distribution(
            &linear,
            samples.view(),
            &zero,
            40,
            10,
            &RelevanceConfig::default(),
            &mut rng,
        )?;
        assert_eq!(relevance.len(), 3);
        assert!(relevance.iter().all(|v| *v == 0.0));
        Ok(())
    }

    #[test]
    fn given_baseline_must_match_samples_of_interest() {
        let mut rng = StdRng::seed_from_u64(6);
        let background = standard_normal_samples(10, 3, &mut rng);
        let interest = standard_normal_samples(4, 3, &mut rng);

        let result = feature_relevance_sample(
            &linear,
            background.view(),
            interest.view(),
            &variance_of_deviations,
            Baseline::Given(array![[1.0], [2.0], [3.0]]),
            false,
            &RelevanceConfig::default(),
            &mut rng,
        );
        assert!(matches!(result, Err(RelevanceError::IncompatibleDimensions(_))));
    }

    #[test]
    fn given_baseline_attributes_the_prediction_error() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let background = standard_normal_samples(20, 3, &mut rng);
        let interest = standard_normal_samples(3, 3, &mut rng);
        let observed = linear(interest.view())? + 1.0;
        let config = RelevanceConfig::default();

        let set_function = SubsetValueFunction::new(
            &linear,
            background.view(),
            interest.view(),
            &means_difference,
            Baseline::Given(observed),
            false,
            &config,
        )?;
        let full = set_function.evaluate(&[true; 3], &mut rng)?;
        for value in full.iter() {
            assert_abs_diff_eq!(*value, -1.0, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn distribution_respects_budgets() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(8);
        let samples = standard_normal_samples(200, 2, &mut rng);
        let calls = Cell::new(0usize);
        let rows = Cell::new(0usize);
        let widest = Cell::new(0usize);
        let counting = |x: ArrayView2<f64>| -> Result<Array2<f64>> {
            calls.set(calls.get() + 1);
            rows.set(rows.get() + x.nrows());
            widest.set(widest.get().max(x.nrows()));
            Ok(x.sum_axis(Axis(1)).insert_axis(Axis(1)))
        };
        let config = RelevanceConfig {
            max_batch_size: BatchSize::Rows(7),
            shapley_config: ShapleyConfig::with_method(ShapleyApproximationMethod::Exact),
            ..RelevanceConfig::default()
        };

        feature_relevance_distribution(&counting, samples.view(), &variance_of_deviations, 10, 5, &config, &mut rng)?;

        // Baseline on 5 samples of interest, then 4 coalitions of 5 x 10 perturbed rows each.
        assert_eq!(rows.get(), 5 + 4 * 50);
        assert!(widest.get() <= 7);
        assert!(calls.get() > 4);
        Ok(())
    }

    #[test]
    fn distribution_uses_the_whole_pool_when_it_is_small() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(9);
        let samples = standard_normal_samples(12, 2, &mut rng);
        let rows = Cell::new(0usize);
        let counting = |x: ArrayView2<f64>| -> Result<Array2<f64>> {
            rows.set(rows.get() + x.nrows());
            Ok(x.sum_axis(Axis(1)).insert_axis(Axis(1)))
        };
        let config = RelevanceConfig {
            max_batch_size: BatchSize::All,
            shapley_config: ShapleyConfig::with_method(ShapleyApproximationMethod::Exact),
            ..RelevanceConfig::default()
        };

        feature_relevance_distribution(&counting, samples.view(), &variance_of_deviations, 5000, 500, &config, &mut rng)?;
        assert_eq!(rows.get(), 12 + 4 * 12 * 12);
        Ok(())
    }

    #[test]
    fn seeded_runs_are_reproducible() -> Result<()> {
        let samples = {
            let mut rng = StdRng::seed_from_u64(10);
            standard_normal_samples(100, 3, &mut rng)
        };
        let config = RelevanceConfig {
            feature_perturbation: FeaturePerturbation::RandomizeColumnsIndependently,
            ..RelevanceConfig::for_deviation_comparators()
        };

        let run = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            feature_relevance_distribution(&linear, samples.view(), &variance_of_deviations, 30, 10, &config, &mut rng)
        };
        assert_eq!(run(42)?, run(42)?);
        Ok(())
    }

    #[test]
    fn single_column_inputs_are_one_feature() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(11);
        let column = Array1::from_iter((0..30).map(|i| i as f64));
        let samples = shape_into_2d(&column);
        let double = |x: ArrayView2<f64>| -> Result<Array2<f64>> {
            Ok(x.column(0).mapv(|v| 2.0 * v).insert_axis(Axis(1)))
        };

        let relevance = feature_relevance_distribution(
            &double,
            samples.view(),
            &variance_of_deviations,
            30,
            30,
            &RelevanceConfig::for_deviation_comparators(),
            &mut rng,
        )?;
        // Single player: all of Var(2X) is attributed to it.
        assert_eq!(relevance.len(), 1);
        let variance = column.mapv(|v| 2.0 * v).var(0.0);
        assert_abs_diff_eq!(relevance[0], variance, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn class_probabilities_are_compared_as_whole_rows() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(13);
        let background = standard_normal_samples(40, 2, &mut rng);
        let interest = standard_normal_samples(6, 2, &mut rng);
        // Two classes driven by the first feature only.
        let probabilities = |x: ArrayView2<f64>| -> Result<Array2<f64>> {
            Ok(Array2::from_shape_fn((x.nrows(), 2), |(i, k)| {
                let p = 1.0 / (1.0 + (-3.0 * x[[i, 0]]).exp());
                if k == 0 {
                    p
                } else {
                    1.0 - p
                }
            }))
        };
        let widths = Cell::new(0usize);
        let mean_kl_divergence = |randomized: ArrayView2<f64>, baseline: ArrayView1<f64>| {
            widths.set(widths.get().max(randomized.ncols()));
            randomized
                .rows()
                .into_iter()
                .map(|row| {
                    baseline
                        .iter()
                        .zip(row.iter())
                        .map(|(&b, &p)| b * (b / p).ln())
                        .sum::<f64>()
                })
                .sum::<f64>()
                / randomized.nrows() as f64
        };

        let relevance = feature_relevance_sample(
            &probabilities,
            background.view(),
            interest.view(),
            &mean_kl_divergence,
            Baseline::Predicted,
            true,
            &exact_config(),
            &mut rng,
        )?
        .into_population();

        assert_eq!(widths.get(), 2);
        assert!(relevance[0] > 0.0);
        assert_eq!(relevance[1], 0.0);

        let mismatched = feature_relevance_sample(
            &probabilities,
            background.view(),
            interest.view(),
            &mean_kl_divergence,
            Baseline::Given(Array2::zeros((6, 1))),
            true,
            &exact_config(),
            &mut rng,
        );
        assert!(matches!(mismatched, Err(RelevanceError::IncompatibleDimensions(_))));
        Ok(())
    }

    #[test]
    fn rejects_empty_pools_and_mismatched_columns() {
        let mut rng = StdRng::seed_from_u64(12);
        let empty = Array2::<f64>::zeros((0, 3));
        let result = feature_relevance_distribution(
            &linear,
            empty.view(),
            &variance_of_deviations,
            10,
            10,
            &RelevanceConfig::default(),
            &mut rng,
        );
        assert!(matches!(result, Err(RelevanceError::InvalidInput(_))));

        let background = standard_normal_samples(5, 3, &mut rng);
        let narrow = standard_normal_samples(5, 2, &mut rng);
        let result = feature_relevance_sample(
            &linear,
            background.view(),
            narrow.view(),
            &variance_of_deviations,
            Baseline::Predicted,
            true,
            &RelevanceConfig::default(),
            &mut rng,
        );
        assert!(matches!(result, Err(RelevanceError::IncompatibleDimensions(_))));
    }
}
