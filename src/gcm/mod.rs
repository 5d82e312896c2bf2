// src/gcm/mod.rs

//! Graphical causal models and the parent relevance of a node within them.

pub mod graph;
pub mod mechanisms;
pub mod model;
pub mod relevance;
pub mod sampling;

pub use graph::CausalGraph;
pub use mechanisms::{
    AdditiveNoiseModel, ClassifierMechanism, EmpiricalDistribution, GaussianDistribution, LinearModel,
    UniformDistribution,
};
pub use model::{Mechanism, StructuralCausalModel};
pub use relevance::{feature_relevance, Edge, ParentRelevance, ParentRelevanceConfig};
pub use sampling::{draw_samples, SampleTable};
