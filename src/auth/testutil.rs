// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared helpers for auth unit tests: fixture keys, signed tokens and a
//! verifier wired to a static key set.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

use super::{StaticKeySet, TokenVerifier};
use crate::config::AuthConfig;

pub const TEST_KID: &str = "test-key-1";
pub const TEST_DOMAIN: &str = "coffee-shop.test.auth0.com";
pub const TEST_AUDIENCE: &str = "drinks";

/// Private half of the key published in [`JWKS_JSON`].
pub const SIGNING_KEY_PEM: &str = include_str!("../../tests/fixtures/signing_key.pem");
/// A key the provider never published.
pub const ROGUE_KEY_PEM: &str = include_str!("../../tests/fixtures/rogue_key.pem");
pub const JWKS_JSON: &str = include_str!("../../tests/fixtures/jwks.json");

pub fn test_config() -> AuthConfig {
    AuthConfig::new(TEST_DOMAIN, TEST_AUDIENCE).unwrap()
}

/// Claims that pass verification under [`test_config`], expiring in an hour.
pub fn valid_claims(permissions: &[&str]) -> Value {
    let now = Utc::now().timestamp();
    json!({
        "iss": format!("https://{TEST_DOMAIN}/"),
        "sub": "auth0|barista",
        "aud": TEST_AUDIENCE,
        "iat": now,
        "exp": now + 3600,
        "permissions": permissions,
    })
}

pub fn sign_with(pem: &str, alg: Algorithm, kid: Option<&str>, claims: &Value) -> String {
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap();
    let mut header = Header::new(alg);
    header.kid = kid.map(str::to_string);
    encode(&header, claims, &key).unwrap()
}

/// RS256 token signed with the published fixture key.
pub fn sign(claims: &Value) -> String {
    sign_with(SIGNING_KEY_PEM, Algorithm::RS256, Some(TEST_KID), claims)
}

pub fn static_verifier() -> TokenVerifier {
    let keys = StaticKeySet::from_json(JWKS_JSON).unwrap();
    TokenVerifier::new(test_config(), Arc::new(keys))
}
