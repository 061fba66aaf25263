use reqwest::Client;
use url::Url;

use super::error::ApiError;
use super::ApiRequest;
use crate::daemon::http_server::api::session::{LoginRequest, LoginResponse};
use crate::daemon::http_server::error::ErrorBody;

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(remote: &Url) -> Result<Self, ApiError> {
        let client = Client::builder().build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
            token: None,
        })
    }

    /// Send subsequent requests as the holder of `token`.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, ApiError> {
        let mut request_builder = request.build_request(&self.remote, &self.client)?;
        if let Some(token) = &self.token {
            request_builder = request_builder.bearer_auth(token);
        }
        let response = request_builder.send().await?;

        if response.status().is_success() {
            Ok(response.json::<T::Response>().await?)
        } else {
            let status = response.status();
            let text = response.text().await?;
            // Prefer the server's `{"error": ...}` message over the raw body
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            Err(ApiError::HttpStatus(status, message))
        }
    }

    /// Exchange credentials for a token, returning a client that uses it.
    pub async fn login(&self, email: &str, password: &str) -> Result<(Self, LoginResponse), ApiError> {
        let response = self
            .call(LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        let authed = self.clone().with_token(response.token.clone());
        Ok((authed, response))
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }
}
