use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use common::prelude::{AccessError, ValidationError};

use crate::daemon::auth::{PasswordError, TokenError};
use crate::daemon::database::{CoupleSetupError, EntryWriteError};
use crate::daemon::storage::PhotoStoreError;

/// Message returned in place of a 500's body in production.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Failure of a request handler, rendered as `{"error": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("{0}")]
    Authentication(String),
    #[error("{0}")]
    Authorization(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    Internal(String),
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Authentication(_) => StatusCode::UNAUTHORIZED,
            HttpError::Authorization(_) => StatusCode::FORBIDDEN,
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::Validation(_) => StatusCode::BAD_REQUEST,
            HttpError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid_credentials() -> Self {
        HttpError::Authentication("Invalid credentials".to_string())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            HttpError::Internal(msg) => tracing::error!(error = %msg, "request failed"),
            other => tracing::debug!(status = %status, error = %other, "request rejected"),
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<AccessError> for HttpError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotFound | AccessError::NoPartner => HttpError::NotFound(err.to_string()),
            AccessError::Forbidden => HttpError::Authorization(err.to_string()),
        }
    }
}

impl From<EntryWriteError> for HttpError {
    fn from(err: EntryWriteError) -> Self {
        match err {
            EntryWriteError::Access(err) => err.into(),
            EntryWriteError::Database(err) => err.into(),
        }
    }
}

impl From<ValidationError> for HttpError {
    fn from(err: ValidationError) -> Self {
        HttpError::Validation(err.to_string())
    }
}

impl From<sqlx::Error> for HttpError {
    fn from(err: sqlx::Error) -> Self {
        HttpError::Internal(err.to_string())
    }
}

impl From<CoupleSetupError> for HttpError {
    fn from(err: CoupleSetupError) -> Self {
        HttpError::Internal(err.to_string())
    }
}

impl From<TokenError> for HttpError {
    fn from(err: TokenError) -> Self {
        HttpError::Internal(err.to_string())
    }
}

impl From<PasswordError> for HttpError {
    fn from(err: PasswordError) -> Self {
        HttpError::Internal(err.to_string())
    }
}

impl From<PhotoStoreError> for HttpError {
    fn from(err: PhotoStoreError) -> Self {
        match err {
            PhotoStoreError::UnsupportedType => HttpError::Validation(err.to_string()),
            PhotoStoreError::TooLarge => HttpError::PayloadTooLarge(err.to_string()),
            err => HttpError::Internal(err.to_string()),
        }
    }
}

impl From<MultipartError> for HttpError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return PhotoStoreError::TooLarge.into();
        }
        HttpError::Validation(err.body_text())
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return HttpError::PayloadTooLarge(rejection.body_text());
        }
        HttpError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        HttpError::Validation(rejection.body_text())
    }
}
