// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified JWT claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the claim holding granted permission strings.
pub const PERMISSIONS_CLAIM: &str = "permissions";

/// Decoded token payload.
///
/// Holds every claim exactly as the token carried it. A `Claims` value is
/// only produced by the token verifier after signature, issuer, audience
/// and expiry have been checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Look up a claim by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Subject (user ID)
    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    /// Issuer
    pub fn issuer(&self) -> Option<&str> {
        self.get("iss").and_then(Value::as_str)
    }

    /// Expiration timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.get("exp")
            .and_then(Value::as_i64)
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Raw `permissions` entry, if the token carried one.
    pub fn permissions(&self) -> Option<&Value> {
        self.get(PERMISSIONS_CLAIM)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Claims(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_claims() -> Claims {
        serde_json::from_value(json!({
            "sub": "auth0|barista",
            "iss": "https://shop.auth0.com/",
            "aud": "drinks",
            "exp": 1700003600,
            "permissions": ["get:drinks-detail"]
        }))
        .unwrap()
    }

    #[test]
    fn typed_accessors() {
        let claims = sample_claims();
        assert_eq!(claims.subject(), Some("auth0|barista"));
        assert_eq!(claims.issuer(), Some("https://shop.auth0.com/"));
        assert_eq!(claims.expires_at().map(|t| t.timestamp()), Some(1700003600));
        assert_eq!(claims.permissions(), Some(&json!(["get:drinks-detail"])));
    }

    #[test]
    fn serializes_as_plain_object() {
        let claims = sample_claims();
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["aud"], "drinks");

        let back: Claims = serde_json::from_value(value).unwrap();
        assert_eq!(back, claims);
    }
}
