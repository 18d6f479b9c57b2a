use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::{ApiError, RequestError};
use crate::state::ServiceContext;

#[derive(Deserialize)]
struct Base64Request {
    #[serde(default)]
    image: Option<String>,
}

/// `POST /predict-base64`
///
/// Expects a JSON body `{"image": "<base64>"}`. A `data:` URL prefix is
/// accepted and stripped.
pub fn handle(ctx: &ServiceContext, body: &[u8]) -> Result<Value, ApiError> {
    let predictor = ctx.predictor()?;

    let request: Base64Request = serde_json::from_slice(body).map_err(RequestError::InvalidJson)?;
    let encoded = request
        .image
        .filter(|s| !s.trim().is_empty())
        .ok_or(RequestError::MissingBase64Image)?;
    let bytes = decode_image_payload(&encoded)?;

    super::predict_response(predictor, &bytes)
}

/// Decodes standard base64, ignoring ASCII whitespace and an optional
/// `data:<mime>;base64,` prefix.
fn decode_image_payload(payload: &str) -> Result<Vec<u8>, RequestError> {
    let payload = payload.trim();
    let data = match payload.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, d)| d).unwrap_or(rest),
        None => payload,
    };
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD.decode(compact.as_bytes()).map_err(RequestError::InvalidBase64)
}
