//! The typed API client against a live listener

mod common;

use axum::http::StatusCode;
use url::Url;

use ::common::prelude::{EntryDraft, EntryKind, Visibility};
use tandem::http_server;
use tandem::http_server::api::client::{ApiClient, ApiError};
use tandem::http_server::api::entries::{CreateEntryRequest, ListEntriesRequest};
use tandem::http_server::api::session::MeRequest;

async fn serve(app: &common::TestApp) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = http_server::router(app.state.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}")).unwrap()
}

#[tokio::test]
async fn test_login_returns_an_authenticated_client() {
    let app = common::setup().await;
    let remote = serve(&app).await;

    let client = ApiClient::new(&remote).unwrap();
    let (authed, response) = client
        .login("neha@couple.app", common::PASSWORD)
        .await
        .unwrap();
    assert_eq!(response.user.id, app.neha.id);

    let me = authed.call(MeRequest).await.unwrap();
    assert_eq!(me.user.email, "neha@couple.app");

    let created = authed
        .call(CreateEntryRequest(EntryDraft {
            kind: EntryKind::Note,
            visibility: Visibility::ForPartner,
            title: Some("Hi".to_string()),
            body: None,
            tags: vec![],
            photos: vec![],
            entry_date: None,
        }))
        .await
        .unwrap();
    let listed = authed
        .call(ListEntriesRequest {
            mode: Some("me".to_string()),
            kind: None,
        })
        .await
        .unwrap();
    assert_eq!(listed.entries, vec![created.entry]);
}

#[tokio::test]
async fn test_client_surfaces_the_server_error_message() {
    let app = common::setup().await;
    let remote = serve(&app).await;
    let client = ApiClient::new(&remote).unwrap();

    match client.login("neha@couple.app", "wrong").await {
        Err(ApiError::HttpStatus(status, message)) => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected a 401, got {other:?}"),
    }

    let err = client.call(MeRequest).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
}
