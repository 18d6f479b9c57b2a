use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use flockscan::{ArtifactLoadError, Predictor};

use crate::config::Config;
use crate::errors::ApiError;

/// Whether startup managed to load the prediction pipeline.
pub enum Readiness {
    Ready(Predictor),
    /// Artifacts failed to load. `reason` is safe to show to clients: it
    /// names artifact files but never their directories.
    Degraded { reason: String },
}

/// Everything request handlers need, built once before the accept loop and
/// never mutated afterwards.
pub struct ServiceContext {
    readiness: Readiness,
    max_body_bytes: usize,
}

impl ServiceContext {
    /// Loads the model and label encoder named by `config`.
    ///
    /// Never fails: a missing or broken artifact leaves the service running
    /// in degraded mode so `/health` can report it.
    pub fn initialize(config: &Config) -> ServiceContext {
        info!(
            model_path = %config.model_path.display(),
            model_exists = config.model_path.exists(),
            labels_path = %config.labels_path.display(),
            labels_exists = config.labels_path.exists(),
            "loading artifacts"
        );

        let readiness = match Predictor::from_artifacts(&config.model_path, &config.labels_path) {
            Ok(predictor) => {
                info!(classes = predictor.labels().len(), "disease detector initialized");
                Readiness::Ready(predictor)
            }
            Err(e) => {
                error!(
                    error = %e,
                    "failed to initialize disease detector; serving in degraded mode"
                );
                Readiness::Degraded { reason: public_reason(&e) }
            }
        };
        ServiceContext::new(readiness, config.max_body_bytes)
    }

    pub fn new(readiness: Readiness, max_body_bytes: usize) -> ServiceContext {
        ServiceContext { readiness, max_body_bytes }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.readiness, Readiness::Ready(_))
    }

    /// The loaded pipeline, or `ApiError::ModelNotLoaded` in degraded mode.
    pub fn predictor(&self) -> Result<&Predictor, ApiError> {
        match &self.readiness {
            Readiness::Ready(predictor) => Ok(predictor),
            Readiness::Degraded { .. } => Err(ApiError::ModelNotLoaded),
        }
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        match &self.readiness {
            Readiness::Ready(_) => None,
            Readiness::Degraded { reason } => Some(reason),
        }
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }
}

/// Describes a load failure without leaking the install layout.
fn public_reason(err: &ArtifactLoadError) -> String {
    let name = |path: &Path| {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "artifact".to_owned())
    };
    match err {
        ArtifactLoadError::Missing { path } => format!("artifact not found: {}", name(path)),
        ArtifactLoadError::Io { path, .. } => format!("failed to read {}", name(path)),
        ArtifactLoadError::Parse { path, .. } => format!("failed to parse {}", name(path)),
        other => other.to_string(),
    }
}

/// Shared context type, an `Arc<ServiceContext>` handed to every request thread.
pub type SharedContext = Arc<ServiceContext>;
