use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;

pub mod client;
pub mod entries;
pub mod messages;
pub mod session;
pub mod upload;

use crate::daemon::http_server::health;
use crate::daemon::storage::MAX_PHOTO_BYTES;
use crate::ServiceState;

/// Multipart framing on top of the photo itself.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/health", get(health::handler))
        .route("/login", post(session::login))
        .route("/me", get(session::me))
        .route("/partner", get(session::partner))
        .route("/entries", get(entries::list).post(entries::create))
        .route("/entries/:id", put(entries::update).delete(entries::delete))
        .route(
            "/upload",
            post(upload::handler)
                .layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES + UPLOAD_OVERHEAD_BYTES)),
        )
        .route("/messages", get(messages::list).post(messages::send))
        .route("/messages/mark-read", put(messages::mark_read))
        .with_state(state)
}
