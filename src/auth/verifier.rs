// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT verification against the identity provider's signing keys.

use std::sync::Arc;

use jsonwebtoken::{decode, decode_header, errors::ErrorKind, DecodingKey, Header, Validation};
use serde_json::{Map, Value};
use tracing::instrument;

use super::{AuthError, Claims, KeyResolver};
use crate::config::AuthConfig;

/// Claims every accepted token must carry.
const REQUIRED_CLAIMS: [&str; 3] = ["exp", "iss", "aud"];

/// Verifies bearer tokens and yields their claims.
///
/// Verification order:
///
/// 1. Parse the unverified header (`MalformedToken` if impossible)
/// 2. Require a `kid` (`MissingKeyId`)
/// 3. Resolve the signing key (resolver errors pass through)
/// 4. Require the header algorithm to be in the configured allow-list
/// 5. Check signature, `exp`, `nbf`, `iss` and `aud`
pub struct TokenVerifier {
    config: AuthConfig,
    issuer: String,
    keys: Arc<dyn KeyResolver>,
}

impl TokenVerifier {
    pub fn new(config: AuthConfig, keys: Arc<dyn KeyResolver>) -> Self {
        let issuer = config.issuer();
        Self {
            config,
            issuer,
            keys,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Whether the key source can currently serve keys.
    pub async fn keys_ready(&self) -> bool {
        self.keys.is_ready().await
    }

    /// Verify `token` and return its claims, unmodified.
    #[instrument(skip_all)]
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = unverified_header(token)?;
        let kid = header.kid.as_deref().ok_or(AuthError::MissingKeyId)?;

        let jwk = self.keys.resolve(kid).await?;

        if !self.config.algorithms.contains(&header.alg) {
            tracing::warn!(alg = ?header.alg, "Token algorithm not in allow-list");
            return Err(AuthError::InvalidToken);
        }

        let decoding_key = DecodingKey::from_jwk(&jwk).map_err(|e| {
            tracing::warn!(kid = %kid, error = %e, "Unusable key in JWKS");
            AuthError::InvalidToken
        })?;

        let token_data = decode::<Map<String, Value>>(token, &decoding_key, &self.validation(&header))
            .map_err(|e| classify(e.kind()))?;

        let claims = Claims::from(token_data.claims);
        tracing::debug!(
            sub = claims.subject().unwrap_or_default(),
            expires_at = ?claims.expires_at(),
            "Token verified"
        );
        Ok(claims)
    }

    /// Validation for exactly the algorithm the header names, which the
    /// caller has already checked against the allow-list.
    fn validation(&self, header: &Header) -> Validation {
        let mut validation = Validation::new(header.alg);
        validation.leeway = self.config.leeway;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&REQUIRED_CLAIMS);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation
    }
}

/// Parse the header of a compact JWS without trusting anything in it.
fn unverified_header(token: &str) -> Result<Header, AuthError> {
    if token.split('.').count() != 3 {
        return Err(AuthError::MalformedToken);
    }
    decode_header(token).map_err(|_| AuthError::MalformedToken)
}

fn classify(kind: &ErrorKind) -> AuthError {
    let err = match kind {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
        _ => AuthError::InvalidToken,
    };
    tracing::debug!(reason = ?kind, code = err.error_code(), "Token rejected");
    err
}
