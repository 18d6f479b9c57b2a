use serde_json::{json, Value};

use crate::state::ServiceContext;

/// `GET /health`
///
/// Always answers 200; the body says whether predictions can be served.
pub fn handle(ctx: &ServiceContext) -> Value {
    let loaded = ctx.is_ready();
    let mut body = json!({
        "status": if loaded { "healthy" } else { "model_not_loaded" },
        "model_loaded": loaded,
    });
    if let Some(reason) = ctx.degraded_reason() {
        body["detail"] = Value::String(reason.to_owned());
    }
    body
}
