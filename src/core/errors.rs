// src/core/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelevanceError {
    #[error("Invalid Input: {0}")]
    InvalidInput(String),
    /// The node is not part of the graph, or cannot be used for the requested operation.
    #[error("Invalid Node: {0}")]
    InvalidNode(String),
    #[error("Incompatible Dimensions: {0}")]
    IncompatibleDimensions(String),
    #[error("Model Prediction Error: {0}")]
    ModelPredictionError(String),
    #[error("Graph Error: {0}")]
    GraphError(String),
    #[error("Internal Error: {0}")]
    InternalError(String),
    #[error("Ndarray Error: {0}")]
    NdarrayError(#[from] ndarray::ShapeError),
}

// Convenience type alias for Result
pub type Result<T> = std::result::Result<T, RelevanceError>;
