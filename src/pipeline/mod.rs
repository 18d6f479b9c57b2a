pub mod predictor;
pub mod result;
pub mod retry;

pub use predictor::{InferenceError, PredictError, Predictor};
pub use result::PredictionResult;
pub use retry::{RetryExhausted, RetryPolicy};
