// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! This module provides Auth0 JWT authentication and permission checks for
//! the drink catalog API.
//!
//! ## Auth Flow
//!
//! 1. Frontend authenticates the user with Auth0
//! 2. Frontend sends `Authorization: Bearer <access token>`
//! 3. Server:
//!    - Extracts the bearer token from the header
//!    - Fetches the Auth0 JWKS via HTTPS (cached with TTL)
//!    - Verifies JWT signature, expiry, issuer, audience
//!    - Checks the operation's permission against the `permissions` claim
//!
//! ## Security
//!
//! - Only asymmetric algorithms from the configured allow-list are accepted
//! - Claims are only exposed after the full verification succeeds
//! - Every failure is reported as 401 with a machine-readable code

pub mod claims;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod jwks;
pub mod permissions;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testutil;

pub use claims::{Claims, PERMISSIONS_CLAIM};
pub use error::AuthError;
pub use extractor::{bearer_token, bearer_token_from_headers};
pub use gate::{AuthGate, Authorized};
pub use jwks::{JwksManager, KeyResolver, StaticKeySet};
pub use permissions::{
    check_permissions, Authenticated, DeleteDrinks, GetDrinksDetail, PatchDrinks, Permission,
    PostDrinks,
};
pub use verifier::TokenVerifier;
