use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;

use super::error::HttpError;
use crate::daemon::auth::Claims;
use crate::ServiceState;

/// `axum::Json` whose rejections come back as `{"error": ...}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(HttpError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query` whose rejections come back as `{"error": ...}`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(HttpError))]
pub struct ApiQuery<T>(pub T);

/// The authenticated caller, taken from an `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<ServiceState> for AuthUser {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    if rejection.is_missing() {
                        HttpError::Authentication("No token provided".to_string())
                    } else {
                        HttpError::Authentication("Invalid token".to_string())
                    }
                })?;

        let claims = state.tokens().verify(bearer.token()).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            HttpError::Authentication("Invalid token".to_string())
        })?;

        Ok(AuthUser(claims))
    }
}
