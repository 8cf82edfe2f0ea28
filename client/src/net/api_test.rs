use std::sync::atomic::{AtomicUsize, Ordering};

use futures::executor::block_on;

use super::*;
use crate::net::testing::test_api;
use crate::util::token_store::MemoryTokenStore;

fn counting_signal() -> (UnauthorizedSignal, Arc<AtomicUsize>) {
    let signal = UnauthorizedSignal::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    signal.subscribe(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (signal, hits)
}

// =============================================================
// Outbound interception
// =============================================================

#[test]
fn bearer_header_attached_when_token_stored() {
    let tokens = MemoryTokenStore::with_token("tok1");
    let (signal, _) = counting_signal();
    let (api, transport) = test_api(&tokens, &signal);
    transport.push_json(200, serde_json::json!({ "user": null }));

    block_on(api.fetch_me()).unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].header("authorization"), Some("Bearer tok1"));
    assert_eq!(sent[0].method, Method::Get);
    assert_eq!(sent[0].url, "http://api.test/api/users/me");
}

#[test]
fn no_authorization_header_without_token() {
    let tokens = MemoryTokenStore::new();
    let (signal, _) = counting_signal();
    let (api, transport) = test_api(&tokens, &signal);
    transport.push_json(200, serde_json::json!({}));

    block_on(api.fetch_me()).unwrap();

    assert_eq!(transport.sent()[0].header("Authorization"), None);
}

#[test]
fn token_is_read_per_request() {
    let tokens = MemoryTokenStore::new();
    let (signal, _) = counting_signal();
    let (api, transport) = test_api(&tokens, &signal);
    transport.push_json(200, serde_json::json!({}));
    transport.push_json(200, serde_json::json!({}));

    block_on(api.fetch_me()).unwrap();
    tokens.save("late");
    block_on(api.fetch_me()).unwrap();

    let sent = transport.sent();
    assert_eq!(sent[0].header("Authorization"), None);
    assert_eq!(sent[1].header("Authorization"), Some("Bearer late"));
}

#[test]
fn post_sets_json_content_type_and_body() {
    let tokens = MemoryTokenStore::new();
    let (signal, _) = counting_signal();
    let (api, transport) = test_api(&tokens, &signal);
    transport.push_json(
        200,
        serde_json::json!({ "token": "t", "user": { "id": 1, "username": "ana" } }),
    );

    let request = LoginRequest { identifier: "ana".to_owned(), password: "secret1".to_owned() };
    let resp = block_on(api.login(&request)).unwrap();

    assert_eq!(resp.token, "t");
    let sent = transport.sent();
    assert_eq!(sent[0].method, Method::Post);
    assert_eq!(sent[0].url, "http://api.test/api/auth/login");
    assert_eq!(sent[0].header("Content-Type"), Some("application/json"));
    let body: serde_json::Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body, serde_json::json!({ "login": "ana", "password": "secret1" }));
}

// =============================================================
// Inbound interception
// =============================================================

#[test]
fn unauthorized_raises_signal_once_and_returns_error() {
    let tokens = MemoryTokenStore::with_token("stale");
    let (signal, hits) = counting_signal();
    let (api, transport) = test_api(&tokens, &signal);
    transport.push_json(401, serde_json::json!({ "error": "Unauthorized" }));

    let err = block_on(api.fetch_me()).unwrap_err();

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(err.is_unauthorized());
    assert_eq!(err.server_message(), Some("Unauthorized"));
}

#[test]
fn forbidden_and_server_errors_do_not_raise_signal() {
    let tokens = MemoryTokenStore::with_token("tok");
    let (signal, hits) = counting_signal();
    let (api, transport) = test_api(&tokens, &signal);
    transport.push_json(403, serde_json::json!({ "error": "Please verify your email" }));
    transport.push_json(500, serde_json::json!({ "error": "Login failed" }));

    let first = block_on(api.fetch_me()).unwrap_err();
    let second = block_on(api.fetch_me()).unwrap_err();

    assert_eq!(first.status(), Some(403));
    assert_eq!(second.status(), Some(500));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn network_failure_propagates_without_signal() {
    let tokens = MemoryTokenStore::with_token("tok");
    let (signal, hits) = counting_signal();
    let (api, transport) = test_api(&tokens, &signal);
    transport.push(Err(ApiError::Network("offline".to_owned())));

    let err = block_on(api.fetch_me()).unwrap_err();

    assert_eq!(err, ApiError::Network("offline".to_owned()));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn wrapper_does_not_touch_token_store() {
    let tokens = MemoryTokenStore::with_token("tok");
    let (signal, _) = counting_signal();
    let (api, transport) = test_api(&tokens, &signal);
    transport.push_json(401, serde_json::json!({}));

    let _ = block_on(api.fetch_me());

    assert_eq!(tokens.load().as_deref(), Some("tok"));
}

#[test]
fn success_body_with_wrong_shape_is_decode_error() {
    let tokens = MemoryTokenStore::new();
    let (signal, _) = counting_signal();
    let (api, transport) = test_api(&tokens, &signal);
    transport.push(Ok(HttpResponse::new(200, "not json")));

    let err = block_on(api.fetch_me()).unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

// =============================================================
// Error shaping and helpers
// =============================================================

#[test]
fn status_error_prefers_error_then_message() {
    let err = ApiError::from_response(&HttpResponse::new(409, r#"{"message":"m","error":"e"}"#));
    assert_eq!(err.server_message(), Some("e"));
    let err = ApiError::from_response(&HttpResponse::new(409, r#"{"message":"m"}"#));
    assert_eq!(err.server_message(), Some("m"));
}

#[test]
fn status_error_without_json_body_has_generic_text() {
    let err = ApiError::from_response(&HttpResponse::new(502, "<html>bad gateway</html>"));
    assert_eq!(err.server_message(), None);
    assert_eq!(err.to_string(), "request failed: 502");
}

#[test]
fn status_error_keeps_field_errors() {
    let err = ApiError::from_response(&HttpResponse::new(
        409,
        r#"{"errors":{"email":"Email already exists"}}"#,
    ));
    assert_eq!(
        err.field_errors().get("email").map(String::as_str),
        Some("Email already exists")
    );
    assert_eq!(err.to_string(), "request failed: 409");
}

#[test]
fn url_joins_base_and_path() {
    let tokens = MemoryTokenStore::new();
    let (signal, _) = counting_signal();
    let (api, _) = test_api(&tokens, &signal);
    assert_eq!(api.base_url(), "http://api.test/api");
    assert_eq!(api.url("/users/me"), "http://api.test/api/users/me");
    assert_eq!(api.url("users/me"), "http://api.test/api/users/me");
}

#[test]
fn verify_email_path_encodes_token() {
    assert_eq!(verify_email_path("abc123"), "/auth/verify-email?token=abc123");
    assert_eq!(verify_email_path("a b&c"), "/auth/verify-email?token=a%20b%26c");
}

#[test]
fn empty_success_body_decodes_as_null() {
    let decoded: Option<u32> = decode_body("  ").unwrap();
    assert_eq!(decoded, None);
}
