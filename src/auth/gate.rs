// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The auth gate guarding protected operations.
//!
//! Use the `Authorized` extractor in handlers to require a permission:
//!
//! ```rust,ignore
//! async fn create_drink(auth: Authorized<PostDrinks>, ...) -> Result<..., ApiError> {
//!     // auth.claims holds the verified token payload
//! }
//! ```
//!
//! The gate runs extraction, verification and (for a non-empty permission)
//! the permission check in that order. The first failure ends the request
//! with an [`AuthError`]; the handler body never runs.

use std::marker::PhantomData;
use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};

use super::{
    bearer_token_from_headers, check_permissions, AuthError, Authenticated, Claims, Permission,
    TokenVerifier,
};

/// Extract → verify → check pipeline, shared by all protected routes.
#[derive(Clone)]
pub struct AuthGate {
    verifier: Arc<TokenVerifier>,
}

impl AuthGate {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }

    /// Authorize a request for `permission` and return its verified claims.
    ///
    /// An empty `permission` requires a valid token only.
    pub async fn authorize(&self, headers: &HeaderMap, permission: &str) -> Result<Claims, AuthError> {
        let outcome = self.run(headers, permission).await;
        if let Err(err) = &outcome {
            tracing::debug!(code = err.error_code(), permission, "Request not authorized");
        }
        outcome
    }

    async fn run(&self, headers: &HeaderMap, permission: &str) -> Result<Claims, AuthError> {
        let token = bearer_token_from_headers(headers)?;
        tracing::trace!("Token extracted");

        let claims = self.verifier.verify(token).await?;
        tracing::trace!("Token verified");

        if !permission.is_empty() {
            check_permissions(permission, &claims)?;
            tracing::trace!(permission, "Permission checked");
        }
        Ok(claims)
    }

    /// Whether signing keys are currently obtainable.
    pub async fn is_ready(&self) -> bool {
        self.verifier.keys_ready().await
    }
}

/// Extractor for requests authorized for permission `P`.
///
/// Rejects with [`AuthError`] before the handler runs.
pub struct Authorized<P: Permission = Authenticated> {
    pub claims: Claims,
    permission: PhantomData<P>,
}

impl<P: Permission> Authorized<P> {
    pub fn into_claims(self) -> Claims {
        self.claims
    }
}

impl<S, P> FromRequestParts<S> for Authorized<P>
where
    S: Send + Sync,
    AuthGate: FromRef<S>,
    P: Permission,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = AuthGate::from_ref(state);
        let claims = gate.authorize(&parts.headers, P::NAME).await?;
        Ok(Self {
            claims,
            permission: PhantomData,
        })
    }
}
