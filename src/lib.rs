// src/lib.rs

//! `causal_relevance` estimates how relevant input features are for the output of a model, and how
//! relevant the direct causes of a node in a graphical causal model are for that node.
//!
//! Relevance is the Shapley value of a cooperative game whose players are the features. The value
//! of a coalition compares the model's predictions with the coalition fixed and the remaining
//! features randomized over background samples against a baseline prediction.
//!
//! ```no_run
//! use causal_relevance::gcm::{
//!     feature_relevance, AdditiveNoiseModel, CausalGraph, GaussianDistribution, LinearModel,
//!     ParentRelevanceConfig, StructuralCausalModel,
//! };
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! # fn main() -> causal_relevance::Result<()> {
//! let mut model = StructuralCausalModel::new(CausalGraph::from_edges(&[("X0", "Y"), ("X1", "Y")])?);
//! model.set_root_mechanism("X0", Box::new(GaussianDistribution::new(0.0, 1.0)?))?;
//! model.set_root_mechanism("X1", Box::new(GaussianDistribution::new(0.0, 1.0)?))?;
//! model.set_causal_mechanism(
//!     "Y",
//!     Box::new(AdditiveNoiseModel::new(
//!         Box::new(LinearModel::new(vec![3.0, 1.0], 0.0)),
//!         Box::new(GaussianDistribution::new(0.0, 0.2)?),
//!     )),
//! )?;
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let relevance = feature_relevance(&model, "Y", None, None, &ParentRelevanceConfig::default(), &mut rng)?;
//! println!("{}", relevance);
//! # Ok(())
//! # }
//! ```

pub mod algorithms;
pub mod core;
pub mod gcm;
pub mod traits;
pub mod utils;

pub use crate::algorithms::{
    feature_relevance_distribution, feature_relevance_sample, Baseline, RelevanceConfig, ShapleyConfig,
};
pub use crate::core::{Dataset, Instance, Relevance, RelevanceError, Result};
pub use crate::traits::{CausalMechanism, PredictModel, ProbabilityModel, StochasticModel};
