// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication and authorization failure.
///
/// Only the auth core constructs these. Every variant is reported to the
/// client as 401; the variants stay distinct internally through
/// [`AuthError::error_code`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is expected in the request")]
    MissingHeader,
    /// Scheme is not `Bearer`, or extra segments follow the token
    #[error("Authorization header must be of the form 'Bearer <token>'")]
    MalformedHeader,
    /// `Bearer` given without a credential
    #[error("Token not found in authorization header")]
    MissingToken,
    /// Token is not a parseable JWT
    #[error("Token is not a well-formed JWT")]
    MalformedToken,
    /// Token header has no `kid`
    #[error("Token header does not name a signing key")]
    MissingKeyId,
    /// No key with the token's `kid` in the provider's key set
    #[error("Token was signed with an unknown key")]
    UnknownSigningKey,
    /// Key set could not be fetched
    #[error("Unable to fetch signing keys from the identity provider")]
    KeyProviderUnavailable,
    /// Token has expired
    #[error("Token has expired")]
    TokenExpired,
    /// Issuer, audience or another required claim is wrong
    #[error("Incorrect claims, please check the audience and issuer")]
    InvalidClaims,
    /// Bad signature, disallowed algorithm, or undecodable claims
    #[error("Unable to verify the token")]
    InvalidToken,
    /// Verified claims carry no `permissions` entry
    #[error("Permissions not present in token")]
    PermissionsClaimMissing,
    /// Required permission not granted
    #[error("You do not have permission to access this resource")]
    PermissionDenied,
}

#[derive(Serialize)]
struct AuthErrorBody {
    success: bool,
    error: u16,
    message: String,
    code: &'static str,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_header",
            AuthError::MalformedHeader => "malformed_header",
            AuthError::MissingToken => "missing_token",
            AuthError::MalformedToken => "malformed_token",
            AuthError::MissingKeyId => "missing_key_id",
            AuthError::UnknownSigningKey => "unknown_signing_key",
            AuthError::KeyProviderUnavailable => "key_provider_unavailable",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims => "invalid_claims",
            AuthError::InvalidToken => "invalid_token",
            AuthError::PermissionsClaimMissing => "permissions_claim_missing",
            AuthError::PermissionDenied => "permission_denied",
        }
    }

    /// Get the HTTP status code for this error.
    ///
    /// Always 401, including `KeyProviderUnavailable` and the permission
    /// failures.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.to_string(),
            code: self.error_code(),
        });
        (status, body).into_response()
    }
}
