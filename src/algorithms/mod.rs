pub mod feature_relevance;
pub mod marginal;
pub mod shapley;

pub use feature_relevance::{
    feature_relevance_distribution, feature_relevance_sample, Baseline, RelevanceConfig, SubsetValueFunction,
};
pub use marginal::{averaged_marginal_expectation, marginal_expectation, BatchSize, FeaturePerturbation};
pub use shapley::{estimate_shapley_values, ShapleyApproximationMethod, ShapleyConfig};
