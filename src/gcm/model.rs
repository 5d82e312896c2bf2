// src/gcm/model.rs

//! Structural causal model: a causal graph with one mechanism per node.

use crate::core::{RelevanceError, Result};
use crate::gcm::graph::CausalGraph;
use crate::traits::{CausalMechanism, StochasticModel};
use std::collections::HashMap;

/// Root nodes are described by a stochastic model, all other nodes by a causal mechanism of their
/// parents.
pub enum Mechanism {
    Root(Box<dyn StochasticModel>),
    Conditional(Box<dyn CausalMechanism>),
}

pub struct StructuralCausalModel {
    graph: CausalGraph,
    mechanisms: HashMap<String, Mechanism>,
}

impl StructuralCausalModel {
    pub fn new(graph: CausalGraph) -> Self {
        StructuralCausalModel {
            graph,
            mechanisms: HashMap::new(),
        }
    }

    pub fn graph(&self) -> &CausalGraph {
        &self.graph
    }

    pub fn set_root_mechanism(&mut self, node: &str, model: Box<dyn StochasticModel>) -> Result<()> {
        if !self.graph.is_root_node(node)? {
            return Err(RelevanceError::InvalidNode(format!(
                "Node {} has parents and needs a causal mechanism.",
                node
            )));
        }
        self.mechanisms.insert(node.to_string(), Mechanism::Root(model));
        Ok(())
    }

    pub fn set_causal_mechanism(&mut self, node: &str, mechanism: Box<dyn CausalMechanism>) -> Result<()> {
        if self.graph.is_root_node(node)? {
            return Err(RelevanceError::InvalidNode(format!(
                "Node {} is a root node and needs a stochastic model.",
                node
            )));
        }
        self.mechanisms
            .insert(node.to_string(), Mechanism::Conditional(mechanism));
        Ok(())
    }

    pub fn mechanism(&self, node: &str) -> Result<&Mechanism> {
        self.graph.validate_node(node)?;
        self.mechanisms.get(node).ok_or_else(|| {
            RelevanceError::InvalidNode(format!("No mechanism is assigned to node {}.", node))
        })
    }

    pub fn causal_mechanism(&self, node: &str) -> Result<&dyn CausalMechanism> {
        match self.mechanism(node)? {
            Mechanism::Conditional(mechanism) => Ok(mechanism.as_ref()),
            Mechanism::Root(_) => Err(RelevanceError::InvalidNode(format!(
                "Node {} is a root node without a causal mechanism.",
                node
            ))),
        }
    }

    pub fn root_mechanism(&self, node: &str) -> Result<&dyn StochasticModel> {
        match self.mechanism(node)? {
            Mechanism::Root(model) => Ok(model.as_ref()),
            Mechanism::Conditional(_) => Err(RelevanceError::InvalidNode(format!(
                "Node {} is not a root node.",
                node
            ))),
        }
    }
}
