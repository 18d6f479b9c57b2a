use thiserror::Error;

use crate::network::metadata::InputShape;
use crate::preprocess::tensor::Tensor;

/// Failure of a single classifier invocation.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("input tensor has {actual} values, model expects {expected}")]
    InputShape { expected: usize, actual: usize },

    #[error("layer {layer} received {actual} values, expected {expected}")]
    LayerShape { layer: usize, expected: usize, actual: usize },

    #[error("model produced a non-finite output at index {index}")]
    NonFinite { index: usize },

    #[error("{0}")]
    Backend(String),
}

/// An image classifier: maps a normalized `[1, H, W, 3]` tensor to one
/// probability per class.
///
/// Implementations are shared read-only across request threads, so
/// `predict` takes `&self`. A backend that cannot be called concurrently must
/// serialize access internally.
pub trait Classifier: Send + Sync {
    /// Spatial size the input tensor must have.
    fn input_shape(&self) -> InputShape;

    /// Width of the probability vector `predict` returns.
    fn num_classes(&self) -> usize;

    fn predict(&self, input: &Tensor) -> Result<Vec<f32>, ModelError>;
}
