pub mod health;
pub mod predict;
pub mod predict_base64;

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use tracing::info;

use flockscan::Predictor;

use crate::errors::ApiError;

/// Runs the pipeline on decoded request bytes and builds the success body
/// shared by both prediction endpoints.
fn predict_response(predictor: &Predictor, image_bytes: &[u8]) -> Result<Value, ApiError> {
    let result = predictor.predict_bytes(image_bytes)?;
    info!(
        label = %result.predicted_label,
        confidence = result.confidence,
        healthy = result.is_healthy,
        "prediction complete"
    );
    Ok(json!({
        "success": true,
        "prediction": result,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }))
}
