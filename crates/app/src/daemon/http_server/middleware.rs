use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::error::{ErrorBody, INTERNAL_ERROR_MESSAGE};

/// Replace the body of every 500 with a generic message. Installed in
/// production only; the detailed error has already been logged.
pub async fn mask_internal_errors(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if response.status() != StatusCode::INTERNAL_SERVER_ERROR {
        return response;
    }

    let body = ErrorBody {
        error: INTERNAL_ERROR_MESSAGE.to_string(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    use super::*;
    use crate::daemon::http_server::error::HttpError;

    fn app() -> Router {
        Router::new()
            .route(
                "/boom",
                get(|| async { HttpError::Internal("disk on fire at /var/db".to_string()) }),
            )
            .route(
                "/missing",
                get(|| async { HttpError::NotFound("Entry not found".to_string()) }),
            )
            .layer(axum::middleware::from_fn(mask_internal_errors))
    }

    async fn body_of(response: Response) -> ErrorBody {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_internal_errors_are_masked() {
        let response = app()
            .oneshot(axum::http::Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await.error, INTERNAL_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_other_errors_pass_through() {
        let response = app()
            .oneshot(axum::http::Request::get("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await.error, "Entry not found");
    }
}
