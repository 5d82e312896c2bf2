// src/gcm/graph.rs

//! Directed acyclic causal graph over named nodes.

use crate::core::{RelevanceError, Result};
use petgraph::algo::{has_path_connecting, toposort};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct CausalGraph {
    graph: StableDiGraph<String, ()>,
    indices: HashMap<String, NodeIndex>,
}

impl CausalGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from `(cause, effect)` pairs, adding nodes as they appear.
    pub fn from_edges(edges: &[(&str, &str)]) -> Result<Self> {
        let mut graph = Self::new();
        for &(cause, effect) in edges {
            graph.add_edge(cause, effect)?;
        }
        Ok(graph)
    }

    /// Adds a node if it does not exist yet.
    pub fn add_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.indices.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.indices.insert(name.to_string(), idx);
        idx
    }

    /// Adds the edge `cause -> effect`. Edges closing a cycle are rejected.
    pub fn add_edge(&mut self, cause: &str, effect: &str) -> Result<()> {
        let from = self.add_node(cause);
        let to = self.add_node(effect);
        if from == to || has_path_connecting(&self.graph, to, from, None) {
            return Err(RelevanceError::GraphError(format!(
                "Edge {} -> {} would introduce a cycle.",
                cause, effect
            )));
        }
        self.graph.update_edge(from, to, ());
        Ok(())
    }

    pub fn contains(&self, node: &str) -> bool {
        self.indices.contains_key(node)
    }

    pub fn validate_node(&self, node: &str) -> Result<()> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(RelevanceError::InvalidNode(format!(
                "Node {} can not be found in the given graph!",
                node
            )))
        }
    }

    pub fn is_root_node(&self, node: &str) -> Result<bool> {
        let idx = self.index(node)?;
        Ok(self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .next()
            .is_none())
    }

    /// Direct causes of `node`, sorted by name. This order is the column order of every matrix of
    /// parent samples.
    pub fn ordered_predecessors(&self, node: &str) -> Result<Vec<String>> {
        let idx = self.index(node)?;
        let mut parents: Vec<String> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|p| self.graph[p].clone())
            .collect();
        parents.sort();
        Ok(parents)
    }

    /// Nodes ordered such that every node comes after all of its causes.
    pub fn topological_order(&self) -> Result<Vec<String>> {
        let order = toposort(&self.graph, None).map_err(|cycle| {
            RelevanceError::GraphError(format!(
                "Cycle detected at node {}.",
                self.graph[cycle.node_id()]
            ))
        })?;
        Ok(order.into_iter().map(|idx| self.graph[idx].clone()).collect())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn index(&self, node: &str) -> Result<NodeIndex> {
        self.validate_node(node)?;
        Ok(self.indices[node])
    }
}
