use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::daemon::http_server::api::client::{ApiError, ApiRequest};
use crate::daemon::http_server::error::HttpError;
use crate::daemon::http_server::extract::AuthUser;
use crate::ServiceState;

/// Multipart field carrying the photo.
pub const PHOTO_FIELD: &str = "photo";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

/// `POST /api/upload`
pub async fn handler(
    State(state): State<ServiceState>,
    AuthUser(claims): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        if file_name.is_empty() || data.is_empty() {
            break;
        }

        let stored = state.photos().put_photo(&file_name, data).await?;
        tracing::info!(user = %claims.id, key = %stored.key, "stored photo");
        return Ok(Json(UploadResponse { url: stored.url }));
    }

    Err(HttpError::Validation("No file uploaded".to_string()))
}

/// `POST /api/upload`
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub data: Bytes,
}

impl ApiRequest for UploadRequest {
    type Response = UploadResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let part = Part::bytes(self.data.to_vec()).file_name(self.file_name);
        let form = Form::new().part(PHOTO_FIELD, part);
        Ok(client.post(base_url.join("/api/upload")?).multipart(form))
    }
}
