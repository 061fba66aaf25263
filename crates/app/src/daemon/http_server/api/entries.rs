use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use common::prelude::{
    AccessError, Entry, EntryDraft, EntryEdit, EntryFilter, EntryKind, Mode,
};

use crate::daemon::database::EntryWriteError;
use crate::daemon::http_server::api::client::{ApiError, ApiRequest};
use crate::daemon::http_server::error::HttpError;
use crate::daemon::http_server::extract::{ApiJson, ApiQuery, AuthUser};
use crate::ServiceState;

/// Query of `GET /api/entries`. Both parameters are optional; an unknown
/// `mode` lists everything the caller may see, an unknown `type` is an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, clap::Args)]
pub struct ListEntriesRequest {
    /// me, partner or couple (everything visible if omitted)
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// journal, note, moment, gallery or mind
    #[arg(long = "type")]
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ListEntriesRequest {
    fn mode(&self) -> Mode {
        self.mode.as_deref().map(Mode::from).unwrap_or_default()
    }

    fn kind(&self) -> Result<Option<EntryKind>, HttpError> {
        match self.kind.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Ok(Some(raw.parse::<EntryKind>()?)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntriesResponse {
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryResponse {
    pub entry: Entry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// `GET /api/entries`
pub async fn list(
    State(state): State<ServiceState>,
    AuthUser(claims): AuthUser,
    ApiQuery(query): ApiQuery<ListEntriesRequest>,
) -> Result<Json<EntriesResponse>, HttpError> {
    let mode = query.mode();
    let kind = query.kind()?;
    let partner = state.database().partner_of(&claims.id).await?;

    let filter = EntryFilter::for_request(claims.id, partner, mode, kind)?;
    let entries = state.database().list_entries(&filter).await?;
    tracing::debug!(user = %claims.id, %mode, count = entries.len(), "listed entries");

    Ok(Json(EntriesResponse { entries }))
}

/// `POST /api/entries`
pub async fn create(
    State(state): State<ServiceState>,
    AuthUser(claims): AuthUser,
    ApiJson(draft): ApiJson<EntryDraft>,
) -> Result<(StatusCode, Json<EntryResponse>), HttpError> {
    draft.validate()?;
    let entry = state.database().create_entry(&claims.id, &draft).await?;
    tracing::info!(user = %claims.id, entry = %entry.id, kind = %entry.kind, "created entry");

    Ok((StatusCode::CREATED, Json(EntryResponse { entry })))
}

/// `PUT /api/entries/:id`
pub async fn update(
    State(state): State<ServiceState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    ApiJson(edit): ApiJson<EntryEdit>,
) -> Result<Json<EntryResponse>, HttpError> {
    let id = parse_entry_id(&id)?;
    edit.validate()?;

    let entry = state
        .database()
        .edit_entry(&claims.id, &id, &edit)
        .await
        .map_err(|e| write_error(e, "You can only edit your own content"))?;
    tracing::info!(user = %claims.id, entry = %entry.id, "updated entry");

    Ok(Json(EntryResponse { entry }))
}

/// `DELETE /api/entries/:id`
pub async fn delete(
    State(state): State<ServiceState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, HttpError> {
    let id = parse_entry_id(&id)?;

    state
        .database()
        .delete_entry(&claims.id, &id)
        .await
        .map_err(|e| write_error(e, "You can only delete your own content"))?;
    tracing::info!(user = %claims.id, entry = %id, "deleted entry");

    Ok(Json(DeleteResponse { success: true }))
}

/// Ids that are not UUIDs cannot name an entry.
fn parse_entry_id(raw: &str) -> Result<Uuid, HttpError> {
    Uuid::parse_str(raw).map_err(|_| AccessError::NotFound.into())
}

fn write_error(err: EntryWriteError, forbidden: &str) -> HttpError {
    match err {
        EntryWriteError::Access(AccessError::Forbidden) => {
            HttpError::Authorization(forbidden.to_string())
        }
        other => other.into(),
    }
}

impl ApiRequest for ListEntriesRequest {
    type Response = EntriesResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(base_url.join("/api/entries")?).query(&self))
    }
}

/// `POST /api/entries`
#[derive(Debug, Clone)]
pub struct CreateEntryRequest(pub EntryDraft);

impl ApiRequest for CreateEntryRequest {
    type Response = EntryResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.post(base_url.join("/api/entries")?).json(&self.0))
    }
}

/// `PUT /api/entries/:id`
#[derive(Debug, Clone)]
pub struct UpdateEntryRequest {
    pub id: Uuid,
    pub edit: EntryEdit,
}

impl ApiRequest for UpdateEntryRequest {
    type Response = EntryResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = base_url.join(&format!("/api/entries/{}", self.id))?;
        Ok(client.put(url).json(&self.edit))
    }
}

/// `DELETE /api/entries/:id`
#[derive(Debug, Clone)]
pub struct DeleteEntryRequest {
    pub id: Uuid,
}

impl ApiRequest for DeleteEntryRequest {
    type Response = DeleteResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.delete(base_url.join(&format!("/api/entries/{}", self.id))?))
    }
}
