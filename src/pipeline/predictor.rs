use std::path::Path;
use std::time::Instant;

use image::DynamicImage;
use thiserror::Error;
use tracing::{debug, info};

use crate::advice::rules::{is_healthy, recommend};
use crate::artifact::ArtifactLoadError;
use crate::labels::codec::{LabelCodec, LabelError};
use crate::network::classifier::{Classifier, ModelError};
use crate::network::metadata::InputShape;
use crate::network::network::Network;
use crate::pipeline::result::PredictionResult;
use crate::pipeline::retry::RetryPolicy;
use crate::preprocess::normalize::{decode_image, normalize, ImageProcessingError};
use crate::preprocess::tensor::Tensor;

/// Inference failed in a way the caller cannot fix by sending another image.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model invocation failed after {attempts} attempts: {source}")]
    Model {
        attempts: u32,
        #[source]
        source: ModelError,
    },

    #[error("model returned no probabilities")]
    EmptyOutput,

    #[error("model returned {actual} probabilities, expected {expected}")]
    OutputWidth { expected: usize, actual: usize },

    #[error("model returned a non-finite probability at index {index}")]
    NonFinite { index: usize },

    #[error("model returned {value} at index {index}, outside [0, 1]")]
    OutOfRange { index: usize, value: f32 },

    #[error(transparent)]
    Label(#[from] LabelError),
}

#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Image(#[from] ImageProcessingError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// The prediction pipeline: owns the classifier and label codec for the
/// lifetime of the process.
///
/// `predict` takes `&self` and keeps no per-call state, so one `Predictor`
/// can be shared across request threads.
pub struct Predictor {
    classifier: Box<dyn Classifier>,
    labels: LabelCodec,
    retry: RetryPolicy,
}

impl Predictor {
    /// Pairs a classifier with its label codec. The classifier's output width
    /// must equal the number of classes.
    pub fn new(
        classifier: Box<dyn Classifier>,
        labels: LabelCodec,
    ) -> Result<Predictor, ArtifactLoadError> {
        if classifier.num_classes() != labels.len() {
            return Err(ArtifactLoadError::ClassCountMismatch {
                model: classifier.num_classes(),
                labels: labels.len(),
            });
        }
        Ok(Predictor { classifier, labels, retry: RetryPolicy::INFERENCE })
    }

    /// Loads the model and label encoder artifacts.
    ///
    /// # Errors
    /// Any missing, unreadable, malformed or mutually inconsistent artifact.
    pub fn from_artifacts(
        model_path: &Path,
        labels_path: &Path,
    ) -> Result<Predictor, ArtifactLoadError> {
        let network = Network::load_json(model_path)?;
        info!(
            path = %model_path.display(),
            input_height = network.metadata.input.height,
            input_width = network.metadata.input.width,
            "model loaded"
        );

        let labels = LabelCodec::load_json(labels_path)?;
        info!(path = %labels_path.display(), classes = ?labels.classes(), "label encoder loaded");

        Predictor::new(Box::new(network), labels)
    }

    pub fn input_shape(&self) -> InputShape {
        self.classifier.input_shape()
    }

    pub fn labels(&self) -> &LabelCodec {
        &self.labels
    }

    /// Decodes raw image bytes and runs the full pipeline.
    pub fn predict_bytes(&self, bytes: &[u8]) -> Result<PredictionResult, PredictError> {
        let image = decode_image(bytes)?;
        self.predict(&image)
    }

    /// Normalizes `image`, runs the classifier (retried once on failure),
    /// then decodes the most probable class and attaches a recommendation.
    pub fn predict(&self, image: &DynamicImage) -> Result<PredictionResult, PredictError> {
        let started = Instant::now();
        let tensor = normalize(image, self.input_shape())?;
        let probabilities = self.infer(&tensor)?;

        let (best, confidence) = argmax(&probabilities).ok_or(InferenceError::EmptyOutput)?;
        let predicted_label = self.labels.decode(best).map_err(InferenceError::from)?.to_owned();
        let all_probabilities = self
            .labels
            .decode_all(&probabilities)
            .map_err(InferenceError::from)?;

        let result = PredictionResult {
            is_healthy: is_healthy(&predicted_label),
            recommendation: recommend(&predicted_label, confidence),
            predicted_label,
            confidence,
            all_probabilities,
        };
        debug!(
            label = %result.predicted_label,
            confidence = result.confidence,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "prediction complete"
        );
        Ok(result)
    }

    fn infer(&self, tensor: &Tensor) -> Result<Vec<f32>, InferenceError> {
        let probabilities = self
            .retry
            .run(|_| self.classifier.predict(tensor))
            .map_err(|e| InferenceError::Model { attempts: e.attempts, source: e.last })?;

        if probabilities.is_empty() {
            return Err(InferenceError::EmptyOutput);
        }
        if probabilities.len() != self.labels.len() {
            return Err(InferenceError::OutputWidth {
                expected: self.labels.len(),
                actual: probabilities.len(),
            });
        }
        if let Some(index) = probabilities.iter().position(|p| !p.is_finite()) {
            return Err(InferenceError::NonFinite { index });
        }
        if let Some((index, &value)) =
            probabilities.iter().enumerate().find(|(_, p)| !(0.0..=1.0).contains(*p))
        {
            return Err(InferenceError::OutOfRange { index, value });
        }
        Ok(probabilities)
    }
}

/// Index and value of the largest entry; the first one wins on ties.
fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    let mut iter = values.iter().copied().enumerate();
    let first = iter.next()?;
    Some(iter.fold(first, |best, (i, v)| if v > best.1 { (i, v) } else { best }))
}
