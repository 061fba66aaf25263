//! Shared test utilities for API integration tests
#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::prelude::UserSummary;
use tandem::daemon::auth::hash_password;
use tandem::daemon::seed::{seed_couple, NewUser};
use tandem::{http_server, Environment, ServiceConfig, ServiceState};

pub const PASSWORD: &str = "password123";

/// A running application with a seeded couple.
pub struct TestApp {
    pub router: Router,
    pub state: ServiceState,
    pub ayush: UserSummary,
    pub neha: UserSummary,
}

pub async fn setup() -> TestApp {
    setup_with(ServiceConfig::ephemeral("integration-test-secret")).await
}

pub async fn setup_production() -> TestApp {
    let mut config = ServiceConfig::ephemeral("integration-test-secret");
    config.environment = Environment::Production;
    setup_with(config).await
}

async fn setup_with(config: ServiceConfig) -> TestApp {
    let state = ServiceState::from_config(&config).await.unwrap();

    let report = seed_couple(
        state.database(),
        &new_user("Ayush", "ayush@couple.app"),
        &new_user("Neha", "neha@couple.app"),
    )
    .await
    .unwrap();

    TestApp {
        router: http_server::router(state.clone()),
        state,
        ayush: report.first,
        neha: report.second,
    }
}

fn new_user(name: &str, email: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: PASSWORD.to_string(),
    }
}

impl TestApp {
    /// Create a user who belongs to no couple, returning their token.
    pub async fn single_user(&self, email: &str) -> String {
        let hash = hash_password(PASSWORD).unwrap();
        self.state
            .database()
            .create_user("Solo", email, &hash)
            .await
            .unwrap();
        self.login(email).await
    }

    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/login",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.request(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Send a raw request, decoding the body as JSON (`Null` when empty or not JSON).
    pub async fn request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    /// Create an entry and return its id.
    pub async fn create_entry(&self, token: &str, entry: Value) -> String {
        let (status, body) = self.post("/api/entries", token, entry).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body["entry"]["id"].as_str().unwrap().to_string()
    }

    /// Ids of the entries listed at `uri`, in response order.
    pub async fn entry_ids(&self, uri: &str, token: &str) -> Vec<String> {
        let (status, body) = self.get(uri, token).await;
        assert_eq!(status, StatusCode::OK, "list failed: {body}");
        body["entries"]
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["id"].as_str().unwrap().to_string())
            .collect()
    }
}

/// A multipart/form-data body with a single file field.
pub fn multipart_body(field: &str, file_name: &str, data: &[u8]) -> (String, Vec<u8>) {
    let boundary = "tandem-test-boundary".to_string();
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}
