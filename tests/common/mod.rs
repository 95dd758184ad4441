// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Helpers shared by the HTTP-level tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use coffee_shop_server::{
    api::router,
    auth::{AuthGate, KeyResolver, StaticKeySet, TokenVerifier},
    config::AuthConfig,
    state::AppState,
    store::InMemoryStore,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const TEST_KID: &str = "test-key-1";
pub const ROTATED_KID: &str = "test-key-2";
pub const TEST_DOMAIN: &str = "coffee-shop.test.auth0.com";
pub const TEST_AUDIENCE: &str = "drinks";

pub const SIGNING_KEY_PEM: &str = include_str!("../fixtures/signing_key.pem");
pub const ROTATED_KEY_PEM: &str = include_str!("../fixtures/rotated_key.pem");
pub const JWKS_JSON: &str = include_str!("../fixtures/jwks.json");
/// [`JWKS_JSON`] plus the key published under [`ROTATED_KID`].
pub const JWKS_ROTATED_JSON: &str = include_str!("../fixtures/jwks_rotated.json");

pub const BARISTA: &[&str] = &["get:drinks-detail"];
pub const MANAGER: &[&str] = &[
    "get:drinks-detail",
    "post:drinks",
    "patch:drinks",
    "delete:drinks",
];

pub fn test_config() -> AuthConfig {
    AuthConfig::new(TEST_DOMAIN, TEST_AUDIENCE).unwrap()
}

pub fn claims(permissions: &[&str]) -> Value {
    let now = Utc::now().timestamp();
    json!({
        "iss": format!("https://{TEST_DOMAIN}/"),
        "sub": "auth0|staff",
        "aud": TEST_AUDIENCE,
        "iat": now,
        "exp": now + 3600,
        "permissions": permissions,
    })
}

pub fn sign_with(pem: &str, kid: &str, claims: &Value) -> String {
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap();
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    encode(&header, claims, &key).unwrap()
}

pub fn token(permissions: &[&str]) -> String {
    sign_with(SIGNING_KEY_PEM, TEST_KID, &claims(permissions))
}

pub fn app_with_keys(config: AuthConfig, keys: Arc<dyn KeyResolver>, store: InMemoryStore) -> Router {
    let gate = AuthGate::new(TokenVerifier::new(config, keys));
    router(AppState::new(store, gate))
}

/// App backed by the fixture key set, no network involved.
pub fn static_app(store: InMemoryStore) -> Router {
    let keys = StaticKeySet::from_json(JWKS_JSON).unwrap();
    app_with_keys(test_config(), Arc::new(keys), store)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    TestResponse { status, body }
}

pub fn assert_auth_error(response: &TestResponse, code: &str) {
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"], 401);
    assert_eq!(response.body["code"], code, "body: {}", response.body);
}
