use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::time::timeout;

use crate::daemon::http_server::api::client::{ApiError, ApiRequest};
use crate::daemon::process::version::build_info;
use crate::ServiceState;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub environment: String,
    pub version: String,
}

#[tracing::instrument(skip(state))]
pub async fn handler(State(state): State<ServiceState>) -> Response {
    let status = match timeout(HEALTH_CHECK_TIMEOUT, state.database().ping()).await {
        Ok(Ok(())) => "ok",
        Ok(Err(e)) => {
            tracing::error!(error = %e, "health check: database unavailable");
            "failure"
        }
        Err(_) => {
            tracing::error!("health check timed out");
            "failure"
        }
    };

    let code = if status == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        status: status.to_string(),
        timestamp: OffsetDateTime::now_utc(),
        environment: state.environment().as_str().to_string(),
        version: build_info().version.to_string(),
    };
    (code, Json(body)).into_response()
}

/// `GET /api/health`
#[derive(Debug, Clone, Default)]
pub struct HealthRequest;

impl ApiRequest for HealthRequest {
    type Response = HealthResponse;

    fn build_request(
        self,
        base_url: &url::Url,
        client: &reqwest::Client,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        Ok(client.get(base_url.join("/api/health")?))
    }
}
