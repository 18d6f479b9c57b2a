pub mod classifier;
pub mod metadata;
pub mod network;

pub use classifier::{Classifier, ModelError};
pub use metadata::{InputShape, ModelMetadata};
pub use network::Network;
