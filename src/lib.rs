// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Coffee Shop Server - drink catalog API protected by Auth0 access tokens
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer token extraction, JWKS key resolution, JWT verification, permissions
//! - `config` - Environment configuration
//! - `store` - In-memory drink catalog

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
