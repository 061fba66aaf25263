use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::daemon::http_server::error::ErrorBody;

pub async fn not_found_handler() -> Response {
    let body = ErrorBody {
        error: "Not found".to_string(),
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
