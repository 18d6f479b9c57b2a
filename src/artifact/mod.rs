//! Loading of the persisted artifacts the service depends on: the trained
//! classifier and the label encoder. Both are JSON files read once at startup.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failure to acquire a startup artifact. Non-fatal to the process: the
/// service keeps running in degraded mode and reports it via `/health`.
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("artifact not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("invalid label encoder: {0}")]
    InvalidLabels(String),

    #[error("model produces {model} outputs but the label encoder has {labels} classes")]
    ClassCountMismatch { model: usize, labels: usize },
}

/// Deserializes a JSON artifact, distinguishing a missing file from an
/// unreadable or malformed one.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactLoadError> {
    if !path.exists() {
        return Err(ArtifactLoadError::Missing { path: path.to_path_buf() });
    }
    let file = File::open(path).map_err(|source| ArtifactLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
