use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::activation::activation::ActivationFunction;
use crate::artifact::{load_json, ArtifactLoadError};
use crate::layers::dense::Layer;
use crate::network::classifier::{Classifier, ModelError};
use crate::network::metadata::{InputShape, ModelMetadata};
use crate::preprocess::tensor::Tensor;

/// A feed-forward network of dense layers loaded from a JSON model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub metadata: ModelMetadata,
    pub layers: Vec<Layer>,
}

impl Network {
    /// Builds and validates a network.
    pub fn new(metadata: ModelMetadata, layers: Vec<Layer>) -> Result<Network, ArtifactLoadError> {
        let network = Network { metadata, layers };
        network.validate()?;
        Ok(network)
    }

    /// Deserializes a network from a model artifact and validates that its
    /// layers chain together and accept the declared input shape.
    pub fn load_json(path: &Path) -> Result<Network, ArtifactLoadError> {
        let network: Network = load_json(path)?;
        network.validate()?;
        debug!(
            path = %path.display(),
            layers = network.layers.len(),
            classes = network.num_classes(),
            "model artifact parsed"
        );
        Ok(network)
    }

    /// Serializes the network to a pretty-printed JSON file.
    pub fn save_json(&self, path: &Path) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).map_err(std::io::Error::other)
    }

    fn validate(&self) -> Result<(), ArtifactLoadError> {
        let input = self.metadata.input;
        if input.is_empty() {
            return Err(ArtifactLoadError::InvalidModel(format!(
                "input shape {}x{} is empty",
                input.height, input.width
            )));
        }
        let first = self
            .layers
            .first()
            .ok_or_else(|| ArtifactLoadError::InvalidModel("model has no layers".into()))?;

        for (i, layer) in self.layers.iter().enumerate() {
            layer
                .validate()
                .map_err(|e| ArtifactLoadError::InvalidModel(format!("layer {}: {}", i, e)))?;
        }
        if first.input_size() != input.flat_len() {
            return Err(ArtifactLoadError::InvalidModel(format!(
                "first layer takes {} inputs but a {}x{}x3 image has {}",
                first.input_size(),
                input.height,
                input.width,
                input.flat_len()
            )));
        }
        for (i, pair) in self.layers.windows(2).enumerate() {
            if pair[0].size() != pair[1].input_size() {
                return Err(ArtifactLoadError::InvalidModel(format!(
                    "layer {} outputs {} values but layer {} takes {}",
                    i,
                    pair[0].size(),
                    i + 1,
                    pair[1].input_size()
                )));
            }
        }
        // The pipeline reads the last layer as class probabilities.
        if let Some(last) = self.layers.last() {
            let probabilistic = matches!(
                last.activation,
                ActivationFunction::Softmax | ActivationFunction::Sigmoid
            );
            if !probabilistic {
                return Err(ArtifactLoadError::InvalidModel(format!(
                    "output layer uses {:?}; expected Softmax or Sigmoid",
                    last.activation
                )));
            }
        }
        Ok(())
    }
}

impl Classifier for Network {
    fn input_shape(&self) -> InputShape {
        self.metadata.input
    }

    fn num_classes(&self) -> usize {
        self.layers.last().map(Layer::size).unwrap_or(0)
    }

    fn predict(&self, input: &Tensor) -> Result<Vec<f32>, ModelError> {
        let expected = self.metadata.input.flat_len();
        if input.as_slice().len() != expected {
            return Err(ModelError::InputShape {
                expected,
                actual: input.as_slice().len(),
            });
        }

        let mut current = input.as_slice().to_vec();
        for (i, layer) in self.layers.iter().enumerate() {
            current = layer.forward(&current).ok_or(ModelError::LayerShape {
                layer: i,
                expected: layer.input_size(),
                actual: current.len(),
            })?;
        }

        if let Some(index) = current.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite { index });
        }
        Ok(current)
    }
}
