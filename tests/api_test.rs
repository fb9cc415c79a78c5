//! End-to-end tests driving the service over a real listener.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crypto_server::config::ServerConfig;

mod common;

async fn post_text(addr: std::net::SocketAddr, route: &str, text: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{addr}/api/crypto/{route}"))
        .json(&json!({ "text": text }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn encrypt_decrypt_round_trip() {
    let addr = common::spawn_server(common::loopback_config()).await;

    let resp = post_text(addr, "encrypt", "attack at dawn").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    let envelope = body["result"].as_str().unwrap().to_string();

    let resp = post_text(addr, "decrypt", &envelope).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"], "attack at dawn");
}

#[tokio::test]
async fn same_text_encrypts_to_different_envelopes() {
    let addr = common::spawn_server(common::loopback_config()).await;

    let first: Value = post_text(addr, "encrypt", "repeat me")
        .await
        .json()
        .await
        .unwrap();
    let second: Value = post_text(addr, "encrypt", "repeat me")
        .await
        .json()
        .await
        .unwrap();

    assert_ne!(first["result"], second["result"]);
}

#[tokio::test]
async fn empty_allow_list_denies_everything() {
    // Default config has no allow-list entries: deny-all.
    let addr = common::spawn_server(ServerConfig::default()).await;

    let resp = post_text(addr, "encrypt", "hello").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized access");

    // The health endpoint sits behind the same gate.
    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_matching_allow_list_denies_loopback() {
    let mut config = ServerConfig::default();
    config.access.allowed_ips = vec!["10.0.0.0/24".to_string()];
    let addr = common::spawn_server(config).await;

    let resp = post_text(addr, "encrypt", "hello").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_text_is_bad_request() {
    let addr = common::spawn_server(common::loopback_config()).await;

    for route in ["encrypt", "decrypt"] {
        let resp = post_text(addr, route, "").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("empty"));
    }
}

#[tokio::test]
async fn malformed_envelope_is_bad_request() {
    let addr = common::spawn_server(common::loopback_config()).await;

    let resp = post_text(addr, "decrypt", "not-base64!!").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let short = BASE64.encode([0u8; 8]);
    let resp = post_text(addr, "decrypt", &short).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tampered_envelope_is_generic_failure() {
    let addr = common::spawn_server(common::loopback_config()).await;

    let body: Value = post_text(addr, "encrypt", "tamper me please")
        .await
        .json()
        .await
        .unwrap();
    let mut payload = BASE64.decode(body["result"].as_str().unwrap()).unwrap();
    let last = payload.len() - 1;
    payload[last] ^= 0xFF;

    let resp = post_text(addr, "decrypt", &BASE64.encode(&payload)).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Decryption failed");
}

#[tokio::test]
async fn oversized_text_is_rejected() {
    let addr = common::spawn_server(common::loopback_config()).await;

    let resp = post_text(addr, "encrypt", &"x".repeat(10_001)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_healthy_for_allowed_client() {
    let addr = common::spawn_server(common::loopback_config()).await;

    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert!(resp.headers().contains_key("x-request-id"));

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}
