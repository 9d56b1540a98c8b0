//! End-to-end HTTP coverage of spec.md §8's lock/pay/release walkthrough.

mod common;

use axum_test::TestServer;
use serde_json::json;

#[tokio::test]
async fn locking_an_available_seat_succeeds() {
    let server = TestServer::new(common::test_app()).unwrap();
    let token = common::bearer_token_for("alice");

    let response = server
        .post("/api/lock")
        .authorization_bearer(&token)
        .json(&json!({ "seatId": "A1" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["success"], true);
}

#[tokio::test]
async fn locking_an_already_held_seat_is_a_conflict() {
    let server = TestServer::new(common::test_app()).unwrap();
    let alice = common::bearer_token_for("alice");
    let bob = common::bearer_token_for("bob");

    server
        .post("/api/lock")
        .authorization_bearer(&alice)
        .json(&json!({ "seatId": "A1" }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/lock")
        .authorization_bearer(&bob)
        .json(&json!({ "seatId": "A1" }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Seat Unavailable");
}

#[tokio::test]
async fn locking_without_a_bearer_token_is_unauthenticated() {
    let server = TestServer::new(common::test_app()).unwrap();

    let response = server.post("/api/lock").json(&json!({ "seatId": "A1" })).await;

    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn paying_for_a_held_seat_books_it() {
    let server = TestServer::new(common::test_app()).unwrap();
    let token = common::bearer_token_for("alice");

    server
        .post("/api/lock")
        .authorization_bearer(&token)
        .json(&json!({ "seatId": "C3" }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/pay")
        .authorization_bearer(&token)
        .json(&json!({ "idempotencyKey": "idem-1", "seatId": "C3" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["success"], true);
    assert!(body["txId"].is_string());

    let seats = server.get("/api/seats").await;
    seats.assert_status_ok();
    let seats_body = seats.json::<serde_json::Value>();
    let c3 = seats_body["seats"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"] == "C3")
        .unwrap();
    assert_eq!(c3["state"], "booked");
}

#[tokio::test]
async fn paying_without_a_prior_hold_is_rejected() {
    let server = TestServer::new(common::test_app()).unwrap();
    let token = common::bearer_token_for("alice");

    let response = server
        .post("/api/pay")
        .authorization_bearer(&token)
        .json(&json!({ "idempotencyKey": "idem-2", "seatId": "D4" }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn releasing_a_held_seat_frees_it_for_another_user() {
    let server = TestServer::new(common::test_app()).unwrap();
    let alice = common::bearer_token_for("alice");
    let bob = common::bearer_token_for("bob");

    server
        .post("/api/lock")
        .authorization_bearer(&alice)
        .json(&json!({ "seatId": "E5" }))
        .await
        .assert_status_ok();

    server
        .post("/api/release")
        .json(&json!({ "seatId": "E5", "userId": "alice" }))
        .await
        .assert_status_ok();

    server
        .post("/api/lock")
        .authorization_bearer(&bob)
        .json(&json!({ "seatId": "E5" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn reset_clears_all_holds_and_sales() {
    let server = TestServer::new(common::test_app()).unwrap();
    let token = common::bearer_token_for("alice");

    server
        .post("/api/lock")
        .authorization_bearer(&token)
        .json(&json!({ "seatId": "F6" }))
        .await
        .assert_status_ok();

    server.post("/api/reset").await.assert_status_ok();

    server
        .post("/api/lock")
        .authorization_bearer(&token)
        .json(&json!({ "seatId": "F6" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn health_and_readiness_report_ok() {
    let server = TestServer::new(common::test_app()).unwrap();

    server.get("/health").await.assert_status_ok();
    server.get("/ready").await.assert_status_ok();
}
