pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod artifact;
pub mod preprocess;
pub mod labels;
pub mod advice;
pub mod pipeline;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::{Classifier, InputShape, ModelError, ModelMetadata, Network};
pub use artifact::ArtifactLoadError;
pub use preprocess::{ImageProcessingError, Tensor};
pub use labels::{LabelCodec, LabelError};
pub use pipeline::{InferenceError, PredictError, PredictionResult, Predictor, RetryPolicy};
