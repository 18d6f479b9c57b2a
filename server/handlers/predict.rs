use serde_json::Value;
use tracing::debug;

use crate::errors::{ApiError, RequestError};
use crate::state::ServiceContext;
use crate::util::multipart::{extract_boundary, find_file_part};

const IMAGE_FIELD: &str = "image";

/// `POST /predict`
///
/// Expects `multipart/form-data` with a file in the `image` field.
pub fn handle(ctx: &ServiceContext, content_type: &str, body: &[u8]) -> Result<Value, ApiError> {
    let predictor = ctx.predictor()?;

    if !content_type
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("multipart/form-data")
    {
        return Err(RequestError::NotMultipart.into());
    }
    let boundary = extract_boundary(content_type).ok_or(RequestError::NotMultipart)?;

    let part = find_file_part(body, &boundary, IMAGE_FIELD).ok_or(RequestError::MissingImage)?;
    if part.filename.is_empty() {
        return Err(RequestError::EmptyFilename.into());
    }
    if part.data.is_empty() {
        return Err(RequestError::EmptyImage.into());
    }
    debug!(filename = %part.filename, bytes = part.data.len(), "processing uploaded image");

    super::predict_response(predictor, &part.data)
}
