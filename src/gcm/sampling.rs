// src/gcm/sampling.rs

//! Drawing joint samples from a structural causal model.

use crate::core::{Dataset, RelevanceError, Result};
use crate::gcm::model::StructuralCausalModel;
use log::debug;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::RngCore;

/// Samples in tabular form, one column per node.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    nodes: Vec<String>,
    values: Dataset,
}

impl SampleTable {
    pub fn new(nodes: Vec<String>, values: Dataset) -> Result<Self> {
        if nodes.len() != values.ncols() {
            return Err(RelevanceError::IncompatibleDimensions(format!(
                "{} node names for {} columns.",
                nodes.len(),
                values.ncols()
            )));
        }
        Ok(SampleTable { nodes, values })
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn num_samples(&self) -> usize {
        self.values.nrows()
    }

    pub fn column(&self, node: &str) -> Result<ArrayView1<'_, f64>> {
        let idx = self.position(node)?;
        Ok(self.values.column(idx))
    }

    /// Matrix of the given node columns, in the given order.
    pub fn select(&self, nodes: &[String]) -> Result<Dataset> {
        let indices = nodes
            .iter()
            .map(|node| self.position(node))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.values.select(Axis(1), &indices))
    }

    fn position(&self, node: &str) -> Result<usize> {
        self.nodes.iter().position(|n| n == node).ok_or_else(|| {
            RelevanceError::InvalidInput(format!("Samples do not contain node {}.", node))
        })
    }
}

/// Draws `num_samples` joint samples of all nodes. Root nodes are drawn from their stochastic
/// models, every other node is evaluated on its parents' drawn values and fresh noise.
pub fn draw_samples(
    causal_model: &StructuralCausalModel,
    num_samples: usize,
    rng: &mut dyn RngCore,
) -> Result<SampleTable> {
    let graph = causal_model.graph();
    let order = graph.topological_order()?;
    debug!("drawing {} samples of {} nodes", num_samples, order.len());

    let mut drawn: Vec<(String, Array1<f64>)> = Vec::with_capacity(order.len());
    for node in order {
        let values = if graph.is_root_node(&node)? {
            let samples = causal_model.root_mechanism(&node)?.draw_samples(num_samples, rng);
            if samples.dim() != (num_samples, 1) {
                return Err(RelevanceError::ModelPredictionError(format!(
                    "Stochastic model of {} returned samples of shape {:?}.",
                    node,
                    samples.dim()
                )));
            }
            samples.column(0).to_owned()
        } else {
            let mechanism = causal_model.causal_mechanism(&node)?;
            let parents = graph.ordered_predecessors(&node)?;
            let mut parent_samples = Array2::zeros((num_samples, parents.len()));
            for (j, parent) in parents.iter().enumerate() {
                let column = drawn
                    .iter()
                    .find(|(name, _)| name == parent)
                    .map(|(_, values)| values)
                    .ok_or_else(|| {
                        RelevanceError::InternalError(format!(
                            "Parent {} of {} was not drawn before its child.",
                            parent, node
                        ))
                    })?;
                parent_samples.column_mut(j).assign(column);
            }
            let noise = mechanism.draw_noise_samples(num_samples, rng);
            let values = mechanism.evaluate(parent_samples.view(), noise.view())?;
            if values.len() != num_samples {
                return Err(RelevanceError::ModelPredictionError(format!(
                    "Mechanism of {} returned {} values for {} samples.",
                    node,
                    values.len(),
                    num_samples
                )));
            }
            values
        };
        drawn.push((node, values));
    }

    let mut values = Dataset::zeros((num_samples, drawn.len()));
    for (j, (_, column)) in drawn.iter().enumerate() {
        values.column_mut(j).assign(column);
    }
    SampleTable::new(drawn.into_iter().map(|(node, _)| node).collect(), values)
}
