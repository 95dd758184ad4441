// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token extraction from the `Authorization` header.
//!
//! The header must hold exactly two whitespace-separated parts: the scheme
//! `Bearer` (matched case-insensitively) and the token. The token is
//! returned verbatim.

use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::AuthError;

const BEARER_SCHEME: &str = "bearer";

/// Extract the bearer token from a raw authorization value.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, AuthError> {
    let value = match authorization {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::MissingHeader),
    };

    let mut parts = value.split_whitespace();

    match parts.next() {
        Some(scheme) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => {}
        _ => return Err(AuthError::MalformedHeader),
    }

    let token = parts.next().ok_or(AuthError::MissingToken)?;

    if parts.next().is_some() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}

/// Extract the bearer token from request headers.
///
/// A header value that is not visible ASCII cannot carry a bearer token and
/// is reported as malformed.
pub fn bearer_token_from_headers(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = match headers.get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| AuthError::MalformedHeader)?),
        None => None,
    };
    bearer_token(value)
}
