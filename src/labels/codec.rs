use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::artifact::{load_json, ArtifactLoadError};

#[derive(Debug, Error, PartialEq)]
pub enum LabelError {
    #[error("class index {index} is out of range for {len} classes")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("probability vector has {actual} entries, expected {expected}")]
    WidthMismatch { expected: usize, actual: usize },
}

/// Accepted on-disk shapes of the label encoder artifact.
#[derive(Deserialize)]
#[serde(untagged)]
enum LabelFile {
    Bare(Vec<String>),
    Wrapped { classes: Vec<String> },
}

/// Bidirectional mapping between model output indices and class names.
#[derive(Debug, Clone)]
pub struct LabelCodec {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelCodec {
    /// Builds a codec from class names in output order.
    ///
    /// Fails on an empty list, blank names, or duplicates, any of which would
    /// break the one-entry-per-class guarantee of `decode_all`.
    pub fn new(classes: Vec<String>) -> Result<LabelCodec, ArtifactLoadError> {
        if classes.is_empty() {
            return Err(ArtifactLoadError::InvalidLabels("no classes".into()));
        }
        let mut index = HashMap::with_capacity(classes.len());
        for (i, name) in classes.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ArtifactLoadError::InvalidLabels(format!(
                    "class {} has an empty name",
                    i
                )));
            }
            if index.insert(name.clone(), i).is_some() {
                return Err(ArtifactLoadError::InvalidLabels(format!(
                    "duplicate class name '{}'",
                    name
                )));
            }
        }
        Ok(LabelCodec { classes, index })
    }

    /// Loads a label encoder artifact: either a JSON array of class names or
    /// an object with a `classes` array.
    pub fn load_json(path: &Path) -> Result<LabelCodec, ArtifactLoadError> {
        let classes = match load_json::<LabelFile>(path)? {
            LabelFile::Bare(classes) | LabelFile::Wrapped { classes } => classes,
        };
        LabelCodec::new(classes)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn decode(&self, index: usize) -> Result<&str, LabelError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or(LabelError::IndexOutOfRange { index, len: self.classes.len() })
    }

    pub fn encode(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Pairs every class with its probability. Values are copied as given;
    /// nothing is renormalized.
    pub fn decode_all(&self, probabilities: &[f32]) -> Result<BTreeMap<String, f32>, LabelError> {
        if probabilities.len() != self.classes.len() {
            return Err(LabelError::WidthMismatch {
                expected: self.classes.len(),
                actual: probabilities.len(),
            });
        }
        Ok(self
            .classes
            .iter()
            .cloned()
            .zip(probabilities.iter().copied())
            .collect())
    }
}
