use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use common::prelude::{AccessError, Message, MessageDraft};

use crate::daemon::http_server::api::client::{ApiError, ApiRequest};
use crate::daemon::http_server::error::HttpError;
use crate::daemon::http_server::extract::{ApiJson, AuthUser};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: Message,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkReadResponse {
    pub success: bool,
    pub updated: u64,
}

/// `GET /api/messages`: the caller's conversation, oldest first.
pub async fn list(
    State(state): State<ServiceState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<MessagesResponse>, HttpError> {
    let messages = state.database().messages_for(&claims.id).await?;
    Ok(Json(MessagesResponse { messages }))
}

/// `POST /api/messages`: always addressed to the caller's partner.
pub async fn send(
    State(state): State<ServiceState>,
    AuthUser(claims): AuthUser,
    ApiJson(draft): ApiJson<MessageDraft>,
) -> Result<(StatusCode, Json<MessageResponse>), HttpError> {
    draft.validate()?;

    let receiver = state
        .database()
        .partner_of(&claims.id)
        .await?
        .ok_or(AccessError::NoPartner)?;
    let message = state
        .database()
        .send_message(&claims.id, &receiver, &draft.message)
        .await?;
    tracing::debug!(sender = %claims.id, receiver = %receiver, "sent message");

    Ok((StatusCode::CREATED, Json(MessageResponse { message })))
}

/// `PUT /api/messages/mark-read`
pub async fn mark_read(
    State(state): State<ServiceState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<MarkReadResponse>, HttpError> {
    let updated = state.database().mark_read(&claims.id).await?;
    Ok(Json(MarkReadResponse {
        success: true,
        updated,
    }))
}

#[derive(Debug, Clone, Default)]
pub struct ListMessagesRequest;

impl ApiRequest for ListMessagesRequest {
    type Response = MessagesResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(base_url.join("/api/messages")?))
    }
}

#[derive(Debug, Clone)]
pub struct SendMessageRequest(pub MessageDraft);

impl ApiRequest for SendMessageRequest {
    type Response = MessageResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.post(base_url.join("/api/messages")?).json(&self.0))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarkReadRequest;

impl ApiRequest for MarkReadRequest {
    type Response = MarkReadResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.put(base_url.join("/api/messages/mark-read")?))
    }
}
