//! HTTP coverage of the `/api/auth/*` register → verify → login flow
//! (spec.md §2's auth supplement, §6).

mod common;

use axum_test::TestServer;
use serde_json::json;

#[tokio::test]
async fn register_then_verify_then_login_round_trips() {
    let server = TestServer::new(common::test_app()).unwrap();

    server
        .post("/api/auth/register")
        .json(&json!({ "email": "alice@example.com" }))
        .await
        .assert_status_ok();

    let verify_response = server
        .post("/api/auth/verify-register")
        .json(&json!({
            "email": "alice@example.com",
            "otp": "000000",
            "password": "hunter2",
            "phone": "+15551234567",
        }))
        .await;
    verify_response.assert_status_ok();
    let verify_body = verify_response.json::<serde_json::Value>();
    assert_eq!(verify_body["success"], true);
    assert!(verify_body["token"].is_string());

    let login_response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "alice@example.com", "password": "hunter2" }))
        .await;
    login_response.assert_status_ok();
    assert!(login_response.json::<serde_json::Value>()["token"].is_string());
}

#[tokio::test]
async fn verifying_with_the_wrong_otp_is_rejected() {
    let server = TestServer::new(common::test_app()).unwrap();

    server
        .post("/api/auth/register")
        .json(&json!({ "email": "bob@example.com" }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/auth/verify-register")
        .json(&json!({
            "email": "bob@example.com",
            "otp": "999999",
            "password": "hunter2",
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn registering_twice_is_a_conflict() {
    let server = TestServer::new(common::test_app()).unwrap();

    server
        .post("/api/auth/register")
        .json(&json!({ "email": "carol@example.com" }))
        .await
        .assert_status_ok();

    server
        .post("/api/auth/verify-register")
        .json(&json!({
            "email": "carol@example.com",
            "otp": "000000",
            "password": "hunter2",
        }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/auth/register")
        .json(&json!({ "email": "carol@example.com" }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn logging_in_with_the_wrong_password_is_rejected() {
    let server = TestServer::new(common::test_app()).unwrap();

    server
        .post("/api/auth/register")
        .json(&json!({ "email": "dave@example.com" }))
        .await
        .assert_status_ok();
    server
        .post("/api/auth/verify-register")
        .json(&json!({
            "email": "dave@example.com",
            "otp": "000000",
            "password": "correct-horse",
        }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "dave@example.com", "password": "wrong-password" }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bearer_token_from_verify_register_authorizes_a_lock() {
    let server = TestServer::new(common::test_app()).unwrap();

    server
        .post("/api/auth/register")
        .json(&json!({ "email": "erin@example.com" }))
        .await
        .assert_status_ok();
    let verify_response = server
        .post("/api/auth/verify-register")
        .json(&json!({
            "email": "erin@example.com",
            "otp": "000000",
            "password": "hunter2",
        }))
        .await;
    let token = verify_response.json::<serde_json::Value>()["token"]
        .as_str()
        .unwrap()
        .to_string();

    server
        .post("/api/lock")
        .authorization_bearer(&token)
        .json(&json!({ "seatId": "A2" }))
        .await
        .assert_status_ok();
}
