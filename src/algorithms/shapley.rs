// src/algorithms/shapley.rs

//! Shapley value estimation for cooperative games given as set functions.
//!
//! A set function maps a coalition (a membership mask over the players) to a value vector. All
//! coalitions of one game must produce vectors of the same length; the Shapley values are returned
//! as a `value_len x num_players` matrix, so a scalar game yields a single row.

use crate::core::{RelevanceError, Result};
use log::{debug, warn};
use ndarray::{Array1, Array2};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Above this many players the exact method refuses to enumerate all coalitions.
const MAX_EXACT_PLAYERS: usize = 20;
/// Up to this many players `Auto` resolves to the exact method.
const AUTO_EXACT_PLAYERS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapleyApproximationMethod {
    /// `Exact` for small games, `EarlyStopping` otherwise.
    #[default]
    Auto,
    /// Enumerates all 2^n coalitions.
    Exact,
    /// Averages marginal contributions over a fixed number of random player orderings.
    Permutation,
    /// Runs rounds of random orderings until the estimates stop changing.
    EarlyStopping,
    /// Kernel-weighted least squares over sampled coalitions. Requires the `linalg` feature.
    SubsetSampling,
}

/// Configuration for the Shapley estimator.
#[derive(Debug, Clone)]
pub struct ShapleyConfig {
    pub approximation_method: ShapleyApproximationMethod,
    /// Orderings used by [`ShapleyApproximationMethod::Permutation`].
    pub num_permutations: usize,
    /// Orderings per round of [`ShapleyApproximationMethod::EarlyStopping`].
    pub num_permutations_per_round: usize,
    pub max_num_permutations: usize,
    /// Relative change below which a round counts as converged.
    pub min_percentage_change_threshold: f64,
    /// Consecutive converged rounds required to stop early.
    pub num_converged_rounds: usize,
    /// Coalitions drawn by [`ShapleyApproximationMethod::SubsetSampling`].
    pub num_subset_samples: usize,
}

impl Default for ShapleyConfig {
    fn default() -> Self {
        ShapleyConfig {
            approximation_method: ShapleyApproximationMethod::Auto,
            num_permutations: 1000,
            num_permutations_per_round: 10,
            max_num_permutations: 10_000,
            min_percentage_change_threshold: 0.05,
            num_converged_rounds: 2,
            num_subset_samples: 5000,
        }
    }
}

impl ShapleyConfig {
    pub fn with_method(approximation_method: ShapleyApproximationMethod) -> Self {
        ShapleyConfig {
            approximation_method,
            ..ShapleyConfig::default()
        }
    }
}

/// Estimates the Shapley value of every player of the game defined by `set_function`.
///
/// The random source is handed through to `set_function`, so games that randomize internally stay
/// reproducible under a seeded `rng`.
pub fn estimate_shapley_values<F, R>(
    mut set_function: F,
    num_players: usize,
    config: &ShapleyConfig,
    rng: &mut R,
) -> Result<Array2<f64>>
where
    F: FnMut(&[bool], &mut R) -> Result<Array1<f64>>,
    R: Rng + ?Sized,
{
    if num_players == 0 {
        return Err(RelevanceError::InvalidInput(
            "A cooperative game needs at least one player.".to_string(),
        ));
    }

    let method = match config.approximation_method {
        ShapleyApproximationMethod::Auto if num_players <= AUTO_EXACT_PLAYERS => {
            ShapleyApproximationMethod::Exact
        }
        ShapleyApproximationMethod::Auto => ShapleyApproximationMethod::EarlyStopping,
        other => other,
    };
    debug!("estimating Shapley values of {} players with {:?}", num_players, method);

    match method {
        ShapleyApproximationMethod::Exact | ShapleyApproximationMethod::Auto => {
            exact_shapley_values(&mut set_function, num_players, rng)
        }
        ShapleyApproximationMethod::Permutation => {
            let mut cache = SubsetCache::default();
            let mut sums = permutation_sums(
                &mut cache,
                &mut set_function,
                num_players,
                config.num_permutations.max(1),
                None,
                rng,
            )?;
            sums /= config.num_permutations.max(1) as f64;
            debug!("evaluated {} distinct coalitions", cache.len());
            Ok(sums)
        }
        ShapleyApproximationMethod::EarlyStopping => {
            early_stopping_shapley_values(&mut set_function, num_players, config, rng)
        }
        ShapleyApproximationMethod::SubsetSampling => {
            subset_sampling_shapley_values(&mut set_function, num_players, config, rng)
        }
    }
}

/// Memoizes coalition values within one estimation.
#[derive(Default)]
struct SubsetCache {
    values: HashMap<Vec<bool>, Array1<f64>>,
    value_len: Option<usize>,
}

impl SubsetCache {
    fn value<F, R>(&mut self, subset: &[bool], set_function: &mut F, rng: &mut R) -> Result<Array1<f64>>
    where
        F: FnMut(&[bool], &mut R) -> Result<Array1<f64>>,
        R: Rng + ?Sized,
    {
        if let Some(value) = self.values.get(subset) {
            return Ok(value.clone());
        }
        let value = set_function(subset, rng)?;
        check_value_len(&mut self.value_len, value.len())?;
        self.values.insert(subset.to_vec(), value.clone());
        Ok(value)
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}

fn check_value_len(expected: &mut Option<usize>, actual: usize) -> Result<()> {
    match *expected {
        None => {
            *expected = Some(actual);
            Ok(())
        }
        Some(len) if len == actual => Ok(()),
        Some(len) => Err(RelevanceError::InternalError(format!(
            "Set function returned {} values for one coalition and {} for another.",
            len, actual
        ))),
    }
}

fn subset_from_mask(mask: usize, num_players: usize) -> Vec<bool> {
    (0..num_players).map(|j| (mask >> j) & 1 == 1).collect()
}

fn exact_shapley_values<F, R>(set_function: &mut F, num_players: usize, rng: &mut R) -> Result<Array2<f64>>
where
    F: FnMut(&[bool], &mut R) -> Result<Array1<f64>>,
    R: Rng + ?Sized,
{
    if num_players > MAX_EXACT_PLAYERS {
        return Err(RelevanceError::InvalidInput(format!(
            "Number of players ({}) is too large to evaluate all coalitions. Please use an approximation.",
            num_players
        )));
    }

    let num_coalitions = 1_usize << num_players;
    debug!("evaluating all {} coalitions", num_coalitions);

    let mut values = Vec::with_capacity(num_coalitions);
    let mut value_len = None;
    for mask in 0..num_coalitions {
        let value = set_function(&subset_from_mask(mask, num_players), rng)?;
        check_value_len(&mut value_len, value.len())?;
        values.push(value);
    }

    // Weight of a coalition of size s not containing the player: s! (n - s - 1)! / n!
    let weights: Vec<f64> = (0..num_players)
        .map(|size| 1.0 / (num_players as f64 * n_choose_k(num_players - 1, size)))
        .collect();

    let mut shapley_values = Array2::zeros((values[0].len(), num_players));
    for (mask, value) in values.iter().enumerate() {
        let size = mask.count_ones() as usize;
        for player in 0..num_players {
            if mask & (1 << player) != 0 {
                continue;
            }
            let marginal = &values[mask | (1 << player)] - value;
            shapley_values.column_mut(player).scaled_add(weights[size], &marginal);
        }
    }
    Ok(shapley_values)
}

/// Sums the marginal contributions of every player over `num_permutations` random orderings,
/// adding onto `sums` when given.
fn permutation_sums<F, R>(
    cache: &mut SubsetCache,
    set_function: &mut F,
    num_players: usize,
    num_permutations: usize,
    sums: Option<Array2<f64>>,
    rng: &mut R,
) -> Result<Array2<f64>>
where
    F: FnMut(&[bool], &mut R) -> Result<Array1<f64>>,
    R: Rng + ?Sized,
{
    let empty = vec![false; num_players];
    let empty_value = cache.value(&empty, set_function, rng)?;
    let mut sums = sums.unwrap_or_else(|| Array2::zeros((empty_value.len(), num_players)));

    let mut order: Vec<usize> = (0..num_players).collect();
    for _ in 0..num_permutations {
        order.shuffle(rng);
        let mut subset = empty.clone();
        let mut previous = empty_value.clone();
        for &player in &order {
            subset[player] = true;
            let current = cache.value(&subset, set_function, rng)?;
            let mut column = sums.column_mut(player);
            column += &(&current - &previous);
            previous = current;
        }
    }
    Ok(sums)
}

fn early_stopping_shapley_values<F, R>(
    set_function: &mut F,
    num_players: usize,
    config: &ShapleyConfig,
    rng: &mut R,
) -> Result<Array2<f64>>
where
    F: FnMut(&[bool], &mut R) -> Result<Array1<f64>>,
    R: Rng + ?Sized,
{
    let per_round = config.num_permutations_per_round.max(1);
    let max_permutations = config.max_num_permutations.max(per_round);

    let mut cache = SubsetCache::default();
    let mut sums: Option<Array2<f64>> = None;
    let mut previous_estimate: Option<Array2<f64>> = None;
    let mut num_done = 0;
    let mut converged_rounds = 0;

    loop {
        let round = per_round.min(max_permutations - num_done);
        let updated = permutation_sums(&mut cache, set_function, num_players, round, sums.take(), rng)?;
        num_done += round;
        let estimate = &updated / num_done as f64;
        sums = Some(updated);

        if let Some(previous) = &previous_estimate {
            if max_relative_change(previous, &estimate) < config.min_percentage_change_threshold {
                converged_rounds += 1;
            } else {
                converged_rounds = 0;
            }
        }
        if converged_rounds >= config.num_converged_rounds {
            debug!(
                "Shapley estimates converged after {} permutations ({} coalitions)",
                num_done,
                cache.len()
            );
            return Ok(estimate);
        }
        if num_done >= max_permutations {
            warn!(
                "Shapley estimates did not converge within {} permutations, returning the current estimate",
                max_permutations
            );
            return Ok(estimate);
        }
        previous_estimate = Some(estimate);
    }
}

fn max_relative_change(previous: &Array2<f64>, current: &Array2<f64>) -> f64 {
    previous
        .iter()
        .zip(current.iter())
        .map(|(&old, &new)| {
            if old == new {
                0.0
            } else if old == 0.0 {
                f64::INFINITY
            } else {
                ((new - old) / old).abs()
            }
        })
        .fold(0.0, f64::max)
}

/// Helper for combinations C(n, k) = n! / (k! * (n-k)!)
fn n_choose_k(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    if k == 0 || k == n {
        return 1.0;
    }
    // Exploit symmetry C(n, k) = C(n, n-k) to keep k small for precision/performance
    let eff_k = if k > n / 2 { n - k } else { k };

    let mut res = 1.0;
    for i in 0..eff_k {
        res *= (n - i) as f64;
        res /= (i + 1) as f64;
    }
    res
}

#[cfg(not(feature = "linalg"))]
fn subset_sampling_shapley_values<F, R>(
    _set_function: &mut F,
    _num_players: usize,
    _config: &ShapleyConfig,
    _rng: &mut R,
) -> Result<Array2<f64>>
where
    F: FnMut(&[bool], &mut R) -> Result<Array1<f64>>,
    R: Rng + ?Sized,
{
    Err(RelevanceError::InvalidInput(
        "Subset sampling requires the 'linalg' feature.".to_string(),
    ))
}

#[cfg(feature = "linalg")]
fn subset_sampling_shapley_values<F, R>(
    set_function: &mut F,
    num_players: usize,
    config: &ShapleyConfig,
    rng: &mut R,
) -> Result<Array2<f64>>
where
    F: FnMut(&[bool], &mut R) -> Result<Array1<f64>>,
    R: Rng + ?Sized,
{
    use ndarray::Axis;

    let max_coalitions = 1_usize.checked_shl(num_players as u32).unwrap_or(usize::MAX);
    if num_players <= MAX_EXACT_PLAYERS && max_coalitions <= config.num_subset_samples {
        debug!("all {} coalitions fit in the sample budget, evaluating exactly", max_coalitions);
        return exact_shapley_values(set_function, num_players, rng);
    }

    let (coalitions, weights) = sample_coalitions(num_players, config.num_subset_samples.max(2), rng);
    let mut cache = SubsetCache::default();
    let mut values = Vec::with_capacity(coalitions.len());
    for coalition in &coalitions {
        values.push(cache.value(coalition, set_function, rng)?);
    }
    debug!(
        "sampled {} coalitions, {} distinct",
        coalitions.len(),
        cache.len()
    );

    let features = Array2::from_shape_fn((coalitions.len(), num_players), |(i, j)| {
        if coalitions[i][j] {
            1.0
        } else {
            0.0
        }
    });
    let value_len = values[0].len();
    let mut shapley_values = Array2::zeros((value_len, num_players));
    for output in 0..value_len {
        let target = Array1::from_iter(values.iter().map(|v| v[output]));
        let coefficients = solve_weighted_least_squares(&features, &target, &weights)?;
        shapley_values
            .index_axis_mut(Axis(0), output)
            .assign(&coefficients.slice(ndarray::s![1..]));
    }
    Ok(shapley_values)
}

/// Kernel weight of a coalition of the given size.
/// pi(z) = (M-1) / (C(M, |z|) * |z| * (M-|z|)), effectively infinite for the empty and full coalitions.
#[cfg(feature = "linalg")]
fn kernel_weight(coalition_size: usize, num_players: usize) -> f64 {
    if coalition_size == 0 || coalition_size == num_players || num_players <= 1 {
        return 1e9;
    }
    let denominator = n_choose_k(num_players, coalition_size)
        * coalition_size as f64
        * (num_players - coalition_size) as f64;
    (num_players - 1) as f64 / denominator
}

/// Always contains the empty and the full coalition, the rest is drawn with uniformly
/// chosen sizes and weighted by the kernel.
#[cfg(feature = "linalg")]
fn sample_coalitions<R: Rng + ?Sized>(
    num_players: usize,
    num_samples: usize,
    rng: &mut R,
) -> (Vec<Vec<bool>>, Array1<f64>) {
    let mut coalitions = Vec::with_capacity(num_samples);
    let mut weights = Vec::with_capacity(num_samples);

    coalitions.push(vec![false; num_players]);
    weights.push(kernel_weight(0, num_players));
    coalitions.push(vec![true; num_players]);
    weights.push(kernel_weight(num_players, num_players));

    let players: Vec<usize> = (0..num_players).collect();
    while coalitions.len() < num_samples {
        let size = rng.gen_range(1..num_players);
        let mut coalition = vec![false; num_players];
        for &idx in players.choose_multiple(rng, size) {
            coalition[idx] = true;
        }
        coalitions.push(coalition);
        weights.push(kernel_weight(size, num_players));
    }
    (coalitions, Array1::from(weights))
}

/// Returns `[intercept, coefficients...]`.
#[cfg(feature = "linalg")]
fn solve_weighted_least_squares(
    features: &Array2<f64>,
    target: &Array1<f64>,
    weights: &Array1<f64>,
) -> Result<Array1<f64>> {
    use ndarray_linalg::LeastSquaresSvd;

    let n_samples = features.nrows();
    let n_coeffs = features.ncols() + 1;
    let effective_samples = weights.iter().filter(|&&w| w > 1e-9).count();
    if effective_samples < n_coeffs {
        return Err(RelevanceError::InternalError(format!(
            "Underdetermined system in WLS: {} effective samples, {} coefficients to solve. Increase num_subset_samples.",
            effective_samples, n_coeffs
        )));
    }

    let mut x_w = Array2::<f64>::zeros((n_samples, n_coeffs));
    let mut y_w = Array1::<f64>::zeros(n_samples);
    for i in 0..n_samples {
        let sqrt_w = if weights[i] < 1e-9 { 0.0 } else { weights[i].sqrt() };
        x_w[[i, 0]] = sqrt_w;
        for j in 0..features.ncols() {
            x_w[[i, j + 1]] = features[[i, j]] * sqrt_w;
        }
        y_w[i] = target[i] * sqrt_w;
    }

    let results = x_w
        .least_squares(&y_w)
        .map_err(|e| RelevanceError::InternalError(format!("WLS solver SVD failed: {}", e)))?;
    Ok(results.solution)
}
