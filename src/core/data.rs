// src/core/data.rs
use ndarray::{Array1, Array2, ArrayView2, Axis};
use std::fmt;

/// Represents a single data instance (a row of features).
pub type Instance = Array1<f64>;

/// Represents a dataset, rows are samples and columns are features (the players of the game).
/// Categorical values such as class labels are encoded as `f64`.
pub type Dataset = Array2<f64>;

/// Turns a one-dimensional sample vector into a single-column matrix.
pub fn shape_into_2d(values: &Instance) -> Dataset {
    values.clone().insert_axis(Axis(1))
}

/// Output of a Shapley feature relevance estimation.
#[derive(Debug, Clone, PartialEq)]
pub enum Relevance {
    /// One value per feature, obtained from the averaged set function.
    Population(Array1<f64>),
    /// One row per sample of interest, one column per feature.
    PerSample(Array2<f64>),
}

impl Relevance {
    pub fn num_features(&self) -> usize {
        match self {
            Relevance::Population(values) => values.len(),
            Relevance::PerSample(values) => values.ncols(),
        }
    }

    pub fn as_population(&self) -> Option<&Array1<f64>> {
        match self {
            Relevance::Population(values) => Some(values),
            Relevance::PerSample(_) => None,
        }
    }

    pub fn as_per_sample(&self) -> Option<ArrayView2<'_, f64>> {
        match self {
            Relevance::Population(_) => None,
            Relevance::PerSample(values) => Some(values.view()),
        }
    }

    /// Population-level view of the result. Per-sample attributions are averaged over the samples,
    /// which by linearity of the Shapley value equals the attribution of the averaged set function.
    pub fn into_population(self) -> Array1<f64> {
        match self {
            Relevance::Population(values) => values,
            Relevance::PerSample(values) => values
                .mean_axis(Axis(0))
                .unwrap_or_else(|| Array1::zeros(values.ncols())),
        }
    }
}

impl fmt::Display for Relevance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relevance::Population(values) => {
                writeln!(f, "Feature relevance (population):")?;
                for (i, val) in values.iter().enumerate() {
                    writeln!(f, "  Feature {}: {:.4}", i, val)?;
                }
            }
            Relevance::PerSample(values) => {
                writeln!(f, "Feature relevance ({} samples):", values.nrows())?;
                for (row_idx, row) in values.rows().into_iter().take(10).enumerate() {
                    let formatted: Vec<String> = row.iter().map(|v| format!("{:.4}", v)).collect();
                    writeln!(f, "  Sample {}: [{}]", row_idx, formatted.join(", "))?;
                }
                if values.nrows() > 10 {
                    writeln!(f, "  ...")?;
                }
            }
        }
        Ok(())
    }
}
