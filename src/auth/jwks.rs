// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! ## Key resolution
//!
//! - [`JwksManager`] fetches the provider's key set over HTTP and caches it
//!   with a configurable TTL (a zero TTL fetches fresh on every lookup)
//! - An unknown `kid` triggers one refetch, to pick up key rotation, but only
//!   once the cached set is older than the minimum refetch interval; a `kid`
//!   still missing afterwards is rejected
//! - Refreshes are serialized behind a mutex and re-check the cache once
//!   they hold it, so concurrent misses share a single fetch
//! - The network fetch runs with no cache lock held, so lookups of cached
//!   keys are never blocked behind a refresh
//! - [`StaticKeySet`] serves a fixed, injected key set
//!
//! Callers only ever see the single key they asked for.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::Jwk;
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tracing::instrument;
use url::Url;

use super::error::AuthError;
use crate::config::{AuthConfig, ConfigError};

/// Source of signing keys, looked up by key ID.
#[async_trait]
pub trait KeyResolver: Send + Sync {
    /// Return the key published under `kid`.
    ///
    /// # Errors
    ///
    /// `UnknownSigningKey` if no such key exists, `KeyProviderUnavailable`
    /// if the key set could not be obtained.
    async fn resolve(&self, kid: &str) -> Result<Jwk, AuthError>;

    /// Whether keys can currently be served. Used by readiness probes.
    async fn is_ready(&self) -> bool {
        true
    }
}

/// Key set as published, before individual keys are validated.
#[derive(Deserialize)]
struct RawKeySet {
    keys: Vec<serde_json::Value>,
}

/// Index a published key set by `kid`.
///
/// Entries without a `kid` or that are not valid JWKs are skipped. If a `kid`
/// repeats, the first occurrence wins.
fn index_keys(raw: RawKeySet) -> HashMap<String, Jwk> {
    let mut keys = HashMap::with_capacity(raw.keys.len());
    for value in raw.keys {
        let jwk: Jwk = match serde_json::from_value(value) {
            Ok(jwk) => jwk,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unparseable key in JWKS");
                continue;
            }
        };
        let Some(kid) = jwk.common.key_id.clone() else {
            tracing::debug!("Skipping JWKS key without kid");
            continue;
        };
        if keys.contains_key(&kid) {
            tracing::warn!(kid = %kid, "Duplicate kid in JWKS, keeping first");
            continue;
        }
        keys.insert(kid, jwk);
    }
    keys
}

/// JWKS cache entry.
struct CacheEntry {
    keys: HashMap<String, Jwk>,
    fetched_at: Instant,
}

/// Outcome of a cache lookup.
enum Lookup {
    Hit(Jwk),
    /// Fresh set without the key, fetched this long ago.
    Missing(Duration),
    /// Empty or expired.
    Stale,
}

/// JWKS manager with caching.
///
/// Fetches and caches the identity provider's key set for JWT verification.
#[derive(Clone)]
pub struct JwksManager {
    /// JWKS URL
    jwks_url: Url,
    /// Cache TTL
    cache_ttl: Duration,
    /// Unknown kids refetch only once the cached set is this old
    min_refetch: Duration,
    /// Cached key set
    cache: Arc<RwLock<Option<CacheEntry>>>,
    /// Held for the duration of a fetch
    refresh_lock: Arc<Mutex<()>>,
    /// HTTP client
    client: reqwest::Client,
}

impl JwksManager {
    /// Create a new JWKS manager.
    ///
    /// # Arguments
    /// - `jwks_url`: The JWKS endpoint URL (e.g., `https://tenant.auth0.com/.well-known/jwks.json`)
    /// - `timeout`: Upper bound for one fetch of the key set
    ///
    /// # Errors
    ///
    /// `ConfigError::HttpClient` if the HTTP client cannot be built.
    pub fn new(jwks_url: Url, timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            jwks_url,
            cache_ttl: crate::config::DEFAULT_JWKS_CACHE_TTL,
            min_refetch: crate::config::DEFAULT_JWKS_MIN_REFETCH,
            cache: Arc::new(RwLock::new(None)),
            refresh_lock: Arc::new(Mutex::new(())),
            client,
        })
    }

    /// Create from the auth configuration.
    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.jwks_url.clone(), config.jwks_timeout)?
            .with_cache_ttl(config.jwks_cache_ttl)
            .with_min_refetch_interval(config.jwks_min_refetch))
    }

    /// Create with custom cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Minimum age of the cached set before an unknown kid refetches.
    pub fn with_min_refetch_interval(mut self, interval: Duration) -> Self {
        self.min_refetch = interval;
        self
    }

    /// Get the JWKS URL.
    pub fn jwks_url(&self) -> &Url {
        &self.jwks_url
    }

    async fn lookup(&self, kid: &str) -> Lookup {
        let cache = self.cache.read().await;
        match cache.as_ref() {
            Some(entry) if entry.fetched_at.elapsed() < self.cache_ttl => {
                match entry.keys.get(kid) {
                    Some(jwk) => Lookup::Hit(jwk.clone()),
                    None => Lookup::Missing(entry.fetched_at.elapsed()),
                }
            }
            _ => Lookup::Stale,
        }
    }

    /// Answer from the cache if it can settle the lookup without a fetch.
    async fn settle_from_cache(&self, kid: &str) -> Option<Result<Jwk, AuthError>> {
        match self.lookup(kid).await {
            Lookup::Hit(jwk) => {
                tracing::debug!("JWKS cache hit");
                Some(Ok(jwk))
            }
            Lookup::Missing(age) if age < self.min_refetch => {
                tracing::debug!(age_ms = age.as_millis() as u64, "Key not in recently fetched JWKS");
                Some(Err(AuthError::UnknownSigningKey))
            }
            Lookup::Missing(_) | Lookup::Stale => None,
        }
    }

    /// Fetch the key set from the endpoint.
    async fn fetch_keys(&self) -> Result<HashMap<String, Jwk>, AuthError> {
        tracing::debug!(url = %self.jwks_url, "Fetching JWKS");

        let response = self
            .client
            .get(self.jwks_url.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to fetch JWKS");
                AuthError::KeyProviderUnavailable
            })?;

        if !response.status().is_success() {
            tracing::error!(status = %response.status(), "JWKS endpoint returned error");
            return Err(AuthError::KeyProviderUnavailable);
        }

        let raw: RawKeySet = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse JWKS response");
            AuthError::KeyProviderUnavailable
        })?;

        Ok(index_keys(raw))
    }

    /// Replace the cache with a freshly fetched key set.
    async fn store(&self, keys: HashMap<String, Jwk>) {
        tracing::debug!(key_count = keys.len(), "JWKS cache refreshed");
        let mut cache = self.cache.write().await;
        *cache = Some(CacheEntry {
            keys,
            fetched_at: Instant::now(),
        });
    }

    /// Force refresh the JWKS cache.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let _guard = self.refresh_lock.lock().await;
        let keys = self.fetch_keys().await?;
        self.store(keys).await;
        Ok(())
    }

    /// Check if JWKS is currently cached and valid.
    pub async fn is_cached(&self) -> bool {
        let cache = self.cache.read().await;
        if let Some(entry) = &*cache {
            entry.fetched_at.elapsed() < self.cache_ttl
        } else {
            false
        }
    }
}

#[async_trait]
impl KeyResolver for JwksManager {
    #[instrument(skip_all, fields(kid = %kid))]
    async fn resolve(&self, kid: &str) -> Result<Jwk, AuthError> {
        if let Some(settled) = self.settle_from_cache(kid).await {
            return settled;
        }

        let _guard = self.refresh_lock.lock().await;
        // Another task may have refreshed while this one waited.
        if let Some(settled) = self.settle_from_cache(kid).await {
            return settled;
        }

        tracing::debug!("Refetching JWKS");
        let keys = self.fetch_keys().await?;
        let found = keys.get(kid).cloned();
        self.store(keys).await;

        found.ok_or_else(|| {
            tracing::warn!("Key not found in JWKS after refresh");
            AuthError::UnknownSigningKey
        })
    }

    async fn is_ready(&self) -> bool {
        self.is_cached().await || self.refresh().await.is_ok()
    }
}

/// A fixed key set, supplied up front instead of fetched.
#[derive(Debug, Clone, Default)]
pub struct StaticKeySet {
    keys: HashMap<String, Jwk>,
}

impl StaticKeySet {
    /// Build from a JWKS document (`{"keys": [...]}`).
    pub fn from_json(document: &str) -> Result<Self, serde_json::Error> {
        let raw: RawKeySet = serde_json::from_str(document)?;
        Ok(Self {
            keys: index_keys(raw),
        })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[async_trait]
impl KeyResolver for StaticKeySet {
    async fn resolve(&self, kid: &str) -> Result<Jwk, AuthError> {
        self.keys
            .get(kid)
            .cloned()
            .ok_or(AuthError::UnknownSigningKey)
    }
}
