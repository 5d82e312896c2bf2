// src/gcm/relevance.rs

//! Relevance of the direct causes of a node, including its unexplained noise.
//!
//! The causal mechanism of the target node is treated as a model of its parents and its noise,
//! so the noise competes with the parents as one more player of the cooperative game and the part
//! of the variation that the parents cannot explain is attributed to it.

use crate::algorithms::feature_relevance::{feature_relevance_distribution, RelevanceConfig};
use crate::core::{RelevanceError, Result};
use crate::gcm::model::StructuralCausalModel;
use crate::gcm::sampling::{draw_samples, SampleTable};
use crate::utils::default_attribution_func;
use log::debug;
use ndarray::{concatenate, s, Array1, ArrayView1, ArrayView2, Axis};
use rand::RngCore;
use std::fmt;

/// A `(parent, target)` edge of the causal graph.
pub type Edge = (String, String);

#[derive(Debug, Clone)]
pub struct ParentRelevanceConfig {
    /// Background samples used to randomize features. More samples give more accurate results at
    /// the cost of memory and runtime.
    pub num_background_samples: usize,
    /// Samples the set function is evaluated on.
    pub num_evaluation_samples: usize,
    pub relevance: RelevanceConfig,
}

impl Default for ParentRelevanceConfig {
    fn default() -> Self {
        ParentRelevanceConfig {
            num_background_samples: 5000,
            num_evaluation_samples: 500,
            relevance: RelevanceConfig::for_deviation_comparators(),
        }
    }
}

/// Relevance of every incoming edge of a node and of the node's noise.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentRelevance {
    /// Ordered like the parents in the causal graph.
    pub parent_relevance: Vec<(Edge, f64)>,
    /// One value per noise dimension.
    pub noise_relevance: Array1<f64>,
}

impl ParentRelevance {
    pub fn get(&self, parent: &str, target: &str) -> Option<f64> {
        self.parent_relevance
            .iter()
            .find(|((p, t), _)| p == parent && t == target)
            .map(|(_, value)| *value)
    }

    /// Sum over parents and noise.
    pub fn total(&self) -> f64 {
        self.parent_relevance.iter().map(|(_, v)| v).sum::<f64>() + self.noise_relevance.sum()
    }
}

impl fmt::Display for ParentRelevance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Parent relevance:")?;
        for ((parent, target), value) in &self.parent_relevance {
            writeln!(f, "  {} -> {}: {:.4}", parent, target, value)?;
        }
        for (i, value) in self.noise_relevance.iter().enumerate() {
            writeln!(f, "  noise[{}]: {:.4}", i, value)?;
        }
        Ok(())
    }
}

/// Estimates the distribution based relevance of the direct parents of `target_node` and of its
/// noise with respect to the causal mechanism of `target_node`.
///
/// Without `parent_samples`, `max(num_background_samples, num_evaluation_samples)` samples are
/// drawn from the causal model. Without `attribution_func`, the variance of matching values is
/// used for mechanisms estimating class probabilities and the variance of deviations otherwise;
/// for continuous data the relevances then add up to `Var(Y)`.
pub fn feature_relevance(
    causal_model: &StructuralCausalModel,
    target_node: &str,
    parent_samples: Option<&SampleTable>,
    attribution_func: Option<&dyn Fn(ArrayView2<f64>, ArrayView1<f64>) -> f64>,
    config: &ParentRelevanceConfig,
    rng: &mut dyn RngCore,
) -> Result<ParentRelevance> {
    let graph = causal_model.graph();
    graph.validate_node(target_node)?;
    if graph.is_root_node(target_node)? {
        return Err(RelevanceError::InvalidNode(format!(
            "Cannot compute feature relevance of parents for the target node {} as it is a root node. It does not have parents.",
            target_node
        )));
    }

    let ordered_predecessors = graph.ordered_predecessors(target_node)?;
    let mechanism = causal_model.causal_mechanism(target_node)?;

    let drawn;
    let parent_samples = match parent_samples {
        Some(samples) => samples,
        None => {
            let num_samples = config
                .num_background_samples
                .max(config.num_evaluation_samples);
            drawn = draw_samples(causal_model, num_samples, rng)?;
            &drawn
        }
    };
    let parent_matrix = parent_samples.select(&ordered_predecessors)?;

    let noise_samples = mechanism.draw_noise_samples(parent_matrix.nrows(), rng);
    if noise_samples.dim() != (parent_matrix.nrows(), mechanism.noise_dimensions()) {
        return Err(RelevanceError::ModelPredictionError(format!(
            "Mechanism of {} drew noise of shape {:?}, expected {} rows with {} columns.",
            target_node,
            noise_samples.dim(),
            parent_matrix.nrows(),
            mechanism.noise_dimensions()
        )));
    }
    let num_parents = ordered_predecessors.len();
    let samples_features = concatenate(Axis(1), &[parent_matrix.view(), noise_samples.view()])?;
    debug!(
        "feature relevance of {} parents and {} noise dimensions of {} on {} samples",
        num_parents,
        noise_samples.ncols(),
        target_node,
        samples_features.nrows()
    );

    let default_func = default_attribution_func(mechanism.supports_probability_estimation());
    let attribution_func: &dyn Fn(ArrayView2<f64>, ArrayView1<f64>) -> f64 = match attribution_func {
        Some(func) => func,
        None => &default_func,
    };

    let model = |x: ArrayView2<f64>| {
        mechanism
            .evaluate(x.slice(s![.., ..num_parents]), x.slice(s![.., num_parents..]))
            .map(|values| values.insert_axis(Axis(1)))
    };

    let shapley_values = feature_relevance_distribution(
        &model,
        samples_features.view(),
        attribution_func,
        config.num_background_samples,
        config.num_evaluation_samples,
        &config.relevance,
        rng,
    )?;

    let parent_relevance = ordered_predecessors
        .into_iter()
        .zip(shapley_values.iter())
        .map(|(parent, &value)| ((parent, target_node.to_string()), value))
        .collect();
    Ok(ParentRelevance {
        parent_relevance,
        noise_relevance: shapley_values.slice(s![num_parents..]).to_owned(),
    })
}
