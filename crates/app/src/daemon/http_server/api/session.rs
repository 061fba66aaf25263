use axum::extract::State;
use axum::Json;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use common::prelude::{AccessError, UserSummary};

use crate::daemon::auth::{verify_password, Claims};
use crate::daemon::http_server::api::client::{ApiError, ApiRequest};
use crate::daemon::http_server::error::HttpError;
use crate::daemon::http_server::extract::{ApiJson, AuthUser};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct LoginRequest {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

/// `POST /api/login`
pub async fn login(
    State(state): State<ServiceState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let Some(user) = state.database().user_by_email(&req.email).await? else {
        tracing::info!(email = %req.email, "login for unknown email");
        return Err(HttpError::invalid_credentials());
    };

    if !verify_password(&req.password, &user.password_hash)? {
        tracing::info!(user = %user.id, "login with wrong password");
        return Err(HttpError::invalid_credentials());
    }

    let summary = user.summary();
    let token = state.tokens().issue(&summary)?;
    tracing::info!(user = %summary.id, "user logged in");

    Ok(Json(LoginResponse {
        token,
        user: summary,
    }))
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.post(base_url.join("/api/login")?).json(&self))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: Claims,
}

/// `GET /api/me`
pub async fn me(AuthUser(claims): AuthUser) -> Json<MeResponse> {
    Json(MeResponse { user: claims })
}

#[derive(Debug, Clone, Default)]
pub struct MeRequest;

impl ApiRequest for MeRequest {
    type Response = MeResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(base_url.join("/api/me")?))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerResponse {
    pub partner: UserSummary,
}

/// `GET /api/partner`
pub async fn partner(
    State(state): State<ServiceState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<PartnerResponse>, HttpError> {
    let database = state.database();
    let partner_id = database
        .partner_of(&claims.id)
        .await?
        .ok_or(AccessError::NoPartner)?;
    let partner = database
        .user_by_id(&partner_id)
        .await?
        .ok_or(AccessError::NoPartner)?;

    Ok(Json(PartnerResponse {
        partner: partner.summary(),
    }))
}

#[derive(Debug, Clone, Default)]
pub struct PartnerRequest;

impl ApiRequest for PartnerRequest {
    type Response = PartnerResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(base_url.join("/api/partner")?))
    }
}
