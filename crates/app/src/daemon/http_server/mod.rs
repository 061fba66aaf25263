use axum::extract::DefaultBodyLimit;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use axum::http::{HeaderValue, Method};
use axum::Router;
use tokio::sync::watch;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse};
use tower_http::LatencyUnit;

pub mod api;
mod config;
pub mod error;
pub mod extract;
mod handlers;
mod health;
mod middleware;

pub use config::Config;
pub use error::{ErrorBody, HttpError};
pub use health::{HealthRequest, HealthResponse};

use crate::daemon::storage::LOCAL_URL_PREFIX;
use crate::ServiceState;

const API_PREFIX: &str = "/api";

/// Maximum JSON request body (10 MB)
pub const MAX_JSON_BODY_BYTES: usize = 10 * 1024 * 1024;

/// The complete application: API routes, locally stored photos, CORS and
/// error masking. Tracing is added by [`run_api`].
pub fn router(state: ServiceState) -> Router {
    let mut router = Router::new()
        .nest(API_PREFIX, api::router(state.clone()))
        .fallback(handlers::not_found_handler);

    if let Some(dir) = state.photos().local_dir() {
        router = router.nest_service(LOCAL_URL_PREFIX, ServeDir::new(dir));
    }

    let mut router = router
        .layer(DefaultBodyLimit::max(MAX_JSON_BODY_BYTES))
        .layer(cors_layer(&state));

    if state.environment().is_production() {
        router = router.layer(axum::middleware::from_fn(middleware::mask_internal_errors));
    }

    router.with_state(state)
}

/// Any origin in development. In production, the configured frontend only
/// (any origin when none is configured).
fn cors_layer(state: &ServiceState) -> CorsLayer {
    let origin = match (state.environment().is_production(), state.frontend_url()) {
        (true, Some(url)) => match HeaderValue::from_str(url.trim_end_matches('/')) {
            Ok(value) => AllowOrigin::exact(value),
            Err(e) => {
                tracing::warn!(frontend_url = url, error = %e, "unusable frontend_url, allowing any origin");
                AllowOrigin::from(Any)
            }
        },
        _ => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_methods(vec![Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(vec![ACCEPT, CONTENT_TYPE, ORIGIN, AUTHORIZATION])
        .allow_origin(origin)
        .allow_credentials(false)
}

/// Run the API HTTP server until `shutdown_rx` fires.
pub async fn run_api(
    config: Config,
    state: ServiceState,
    mut shutdown_rx: watch::Receiver<()>,
) -> Result<(), HttpServerError> {
    let listen_addr = config.listen_addr;
    let log_level = config.log_level;
    let trace_layer = TraceLayer::new_for_http()
        .on_response(
            DefaultOnResponse::new()
                .include_headers(false)
                .level(log_level)
                .latency_unit(LatencyUnit::Micros),
        )
        .on_failure(DefaultOnFailure::new().latency_unit(LatencyUnit::Micros));

    let router = router(state).layer(trace_layer);

    tracing::info!(addr = ?listen_addr, "API server listening");
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error("an error occurred running the HTTP server: {0}")]
    ServingFailed(#[from] std::io::Error),
}
