//! Integration tests for the couple's chat

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn test_message_goes_to_the_partner() {
    let app = common::setup().await;
    let ayush = app.login("ayush@couple.app").await;

    let (status, body) = app
        .post("/api/messages", &ayush, json!({ "message": "good morning" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let message = &body["message"];
    assert_eq!(message["sender_id"], app.ayush.id.to_string());
    assert_eq!(message["receiver_id"], app.neha.id.to_string());
    assert_eq!(message["message"], "good morning");
    assert_eq!(message["read"], false);
    assert_eq!(message["read_at"], json!(null));
}

#[tokio::test]
async fn test_both_members_see_the_conversation_in_order() {
    let app = common::setup().await;
    let ayush = app.login("ayush@couple.app").await;
    let neha = app.login("neha@couple.app").await;

    for (token, text) in [(&ayush, "one"), (&neha, "two"), (&ayush, "three")] {
        let (status, _) = app
            .post("/api/messages", token, json!({ "message": text }))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    for token in [&ayush, &neha] {
        let (status, body) = app.get("/api/messages", token).await;
        assert_eq!(status, StatusCode::OK);
        let texts = body["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["message"].as_str().unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(texts, ["one", "two", "three"]);
    }
}

#[tokio::test]
async fn test_mark_read_only_touches_unread_messages_to_me() {
    let app = common::setup().await;
    let ayush = app.login("ayush@couple.app").await;
    let neha = app.login("neha@couple.app").await;

    app.post("/api/messages", &ayush, json!({ "message": "hi" }))
        .await;
    app.post("/api/messages", &neha, json!({ "message": "hey" }))
        .await;

    let (status, body) = app
        .send(Method::PUT, "/api/messages/mark-read", Some(&neha), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "updated": 1 }));

    let (_, body) = app.get("/api/messages", &ayush).await;
    let after_first = body["messages"].clone();
    assert_eq!(after_first[0]["message"], "hi");
    assert_eq!(after_first[0]["read"], true);
    assert!(after_first[0]["read_at"].is_string());
    assert_eq!(after_first[1]["message"], "hey");
    assert_eq!(after_first[1]["read"], false);
    assert_eq!(after_first[1]["read_at"], json!(null));

    let (_, body) = app
        .send(Method::PUT, "/api/messages/mark-read", Some(&neha), None)
        .await;
    assert_eq!(body["updated"], 0);

    // A second pass leaves read and read_at exactly as the first left them
    let (_, body) = app.get("/api/messages", &ayush).await;
    assert_eq!(body["messages"], after_first);
}

#[tokio::test]
async fn test_blank_messages_are_rejected() {
    let app = common::setup().await;
    let ayush = app.login("ayush@couple.app").await;

    for body in [json!({ "message": "   " }), json!({ "text": "hi" })] {
        let (status, response) = app.post("/api/messages", &ayush, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["error"].is_string());
    }

    let (_, body) = app.get("/api/messages", &ayush).await;
    assert_eq!(body["messages"], json!([]));
}

#[tokio::test]
async fn test_single_user_has_nobody_to_message() {
    let app = common::setup().await;
    let solo = app.single_user("solo@couple.app").await;

    let (status, body) = app
        .post("/api/messages", &solo, json!({ "message": "anyone?" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Partner not found");

    let (status, body) = app.get("/api/messages", &solo).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"], json!([]));
}

#[tokio::test]
async fn test_messages_require_a_token() {
    let app = common::setup().await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/messages",
            None,
            Some(json!({ "message": "hi" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(Method::GET, "/api/messages", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");
}
