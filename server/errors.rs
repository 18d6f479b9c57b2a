//! The single place where failures become HTTP status codes and JSON bodies.

use serde_json::{json, Value};
use thiserror::Error;

use flockscan::{ImageProcessingError, InferenceError, PredictError};

const MULTIPART_HINT: &str = "Expected multipart/form-data with image field";
const BASE64_HINT: &str = "Expected JSON body {\"image\": \"<base64>\"}";

/// The request itself is malformed.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("expected a multipart/form-data request")]
    NotMultipart,

    #[error("no image provided")]
    MissingImage,

    #[error("no image selected")]
    EmptyFilename,

    #[error("uploaded image is empty")]
    EmptyImage,

    #[error("request body is not valid JSON")]
    InvalidJson(#[source] serde_json::Error),

    #[error("no base64 image provided")]
    MissingBase64Image,

    #[error("image is not valid base64")]
    InvalidBase64(#[source] base64::DecodeError),

    #[error("failed to read request body")]
    Body(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("model not loaded")]
    ModelNotLoaded,

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("invalid image file")]
    ImageDecode(#[source] ImageProcessingError),

    #[error("prediction failed")]
    Inference(#[source] InferenceError),

    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("not found")]
    NotFound,
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::Image(e) => ApiError::ImageDecode(e),
            PredictError::Inference(e) => ApiError::Inference(e),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Request(_) | ApiError::ImageDecode(_) => 400,
            ApiError::NotFound => 404,
            ApiError::PayloadTooLarge { .. } => 413,
            ApiError::ModelNotLoaded | ApiError::Inference(_) => 500,
        }
    }

    /// Underlying cause, as a plain message.
    fn details(&self) -> Option<String> {
        match self {
            ApiError::ModelNotLoaded => {
                Some("model initialization failed; check server logs".into())
            }
            ApiError::ImageDecode(e) => Some(e.to_string()),
            ApiError::Inference(e) => Some(e.to_string()),
            ApiError::Request(RequestError::InvalidJson(e)) => Some(e.to_string()),
            ApiError::Request(RequestError::InvalidBase64(e)) => Some(e.to_string()),
            ApiError::Request(RequestError::Body(e)) => Some(e.to_string()),
            _ => None,
        }
    }

    fn hint(&self) -> Option<&'static str> {
        match self {
            ApiError::Request(RequestError::NotMultipart | RequestError::MissingImage) => {
                Some(MULTIPART_HINT)
            }
            ApiError::Request(RequestError::InvalidJson(_) | RequestError::MissingBase64Image) => {
                Some(BASE64_HINT)
            }
            _ => None,
        }
    }

    pub fn body(&self) -> Value {
        let mut body = json!({ "success": false, "error": self.to_string() });
        if let Some(details) = self.details() {
            body["details"] = Value::String(details);
        }
        if let Some(hint) = self.hint() {
            body["hint"] = Value::String(hint.to_owned());
        }
        body
    }
}

/// Turns a handler outcome into the status code and JSON body to send.
pub fn into_reply(outcome: Result<Value, ApiError>) -> (u16, Value) {
    match outcome {
        Ok(body) => (200, body),
        Err(err) => (err.status(), err.body()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flockscan::ModelError;

    #[test]
    fn each_kind_maps_to_its_status() {
        let inference = ApiError::Inference(InferenceError::Model {
            attempts: 2,
            source: ModelError::Backend("device lost".into()),
        });
        let cases = [
            (ApiError::ModelNotLoaded, 500),
            (ApiError::Request(RequestError::MissingImage), 400),
            (ApiError::ImageDecode(ImageProcessingError::EmptyPayload), 400),
            (inference, 500),
            (ApiError::PayloadTooLarge { limit: 1 }, 413),
            (ApiError::NotFound, 404),
        ];
        for (err, status) in cases {
            assert_eq!(err.status(), status, "{}", err);
            assert_eq!(err.body()["success"], false);
        }
    }

    #[test]
    fn model_not_loaded_body() {
        let (status, body) = into_reply(Err(ApiError::ModelNotLoaded));
        assert_eq!(status, 500);
        assert_eq!(body["error"], "model not loaded");
    }

    #[test]
    fn inference_failure_carries_cause_in_details() {
        let err = ApiError::from(PredictError::Inference(InferenceError::Model {
            attempts: 2,
            source: ModelError::Backend("device lost".into()),
        }));
        let body = err.body();
        assert_eq!(body["error"], "prediction failed");
        let details = body["details"].as_str().unwrap();
        assert!(details.contains("after 2 attempts"));
        assert!(details.contains("device lost"));
    }

    #[test]
    fn missing_image_includes_hint() {
        let body = ApiError::from(RequestError::MissingImage).body();
        assert_eq!(body["error"], "no image provided");
        assert_eq!(body["hint"], MULTIPART_HINT);
        assert!(body.get("details").is_none());
    }
}
