use std::collections::BTreeMap;

use serde::Serialize;

/// Outcome of classifying one image.
///
/// `predicted_label` is always the key of the largest value in
/// `all_probabilities`, and `confidence` is that value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub predicted_label: String,
    pub confidence: f32,
    pub all_probabilities: BTreeMap<String, f32>,
    pub is_healthy: bool,
    pub recommendation: String,
}
