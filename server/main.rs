//! flockscan server
//!
//! Serves poultry disease predictions over HTTP from a synchronous tiny_http
//! server. The model and label encoder are loaded once at startup; if either
//! is missing the server still comes up and reports `model_not_loaded` on
//! `/health` until it is restarted with valid artifacts.
//!
//! Run with:
//!   cargo run --bin flockscan-server --release
//!
//! Endpoints:
//!   GET  /health          readiness
//!   POST /predict         multipart upload, field `image`
//!   POST /predict-base64  JSON `{"image": "<base64>"}`

mod config;
mod errors;
mod handlers;
mod routes;
mod state;
mod util;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use tiny_http::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use state::ServiceContext;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();

    tracing::info!("starting flockscan disease detection service");

    let config = Config::from_env()?;
    let ctx = Arc::new(ServiceContext::initialize(&config));
    if ctx.is_ready() {
        tracing::info!("service ready to accept prediction requests");
    } else {
        tracing::warn!("service started but the disease detector failed to initialize");
    }

    let addr = config.bind_addr();
    let server = Server::http(&addr)?;
    tracing::info!("listening on http://{}", addr);

    // One thread per request; the context is read-only so threads share it
    // without locking.
    for request in server.incoming_requests() {
        let ctx = Arc::clone(&ctx);
        std::thread::spawn(move || {
            routes::dispatch(request, ctx);
        });
    }

    Ok(())
}
