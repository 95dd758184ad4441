// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! typed configuration structs built from them. Configuration is loaded from
//! the environment once at startup and is fixed for the life of the process.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `AUTH0_DOMAIN` | Identity provider domain (issuer is `https://<domain>/`) | Required |
//! | `API_AUDIENCE` | Expected JWT audience claim | Required |
//! | `JWT_ALGORITHMS` | Comma-separated signing algorithm allow-list | `RS256` |
//! | `JWKS_URL` | Override for the key set URL | `https://<domain>/.well-known/jwks.json` |
//! | `JWKS_CACHE_TTL_SECS` | Key set cache lifetime (`0` disables caching) | `300` |
//! | `JWKS_TIMEOUT_SECS` | Key provider request timeout | `10` |
//! | `JWKS_MIN_REFETCH_SECS` | Minimum age of the cached key set before an unknown `kid` triggers a refetch | `30` |
//! | `JWT_LEEWAY_SECS` | Clock skew tolerance for `exp`/`nbf` | `0` |
//! | `SEED_SAMPLE_DRINK` | Start with the sample drink in the catalog | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const AUTH0_DOMAIN_ENV: &str = "AUTH0_DOMAIN";
pub const API_AUDIENCE_ENV: &str = "API_AUDIENCE";
pub const JWT_ALGORITHMS_ENV: &str = "JWT_ALGORITHMS";
pub const JWKS_URL_ENV: &str = "JWKS_URL";
pub const JWKS_CACHE_TTL_ENV: &str = "JWKS_CACHE_TTL_SECS";
pub const JWKS_TIMEOUT_ENV: &str = "JWKS_TIMEOUT_SECS";
pub const JWKS_MIN_REFETCH_ENV: &str = "JWKS_MIN_REFETCH_SECS";
pub const JWT_LEEWAY_ENV: &str = "JWT_LEEWAY_SECS";
pub const SEED_SAMPLE_DRINK_ENV: &str = "SEED_SAMPLE_DRINK";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ALGORITHMS: &str = "RS256";

/// Default JWKS cache TTL (5 minutes).
pub const DEFAULT_JWKS_CACHE_TTL: Duration = Duration::from_secs(300);

/// Default timeout for the key provider request.
pub const DEFAULT_JWKS_TIMEOUT: Duration = Duration::from_secs(10);

/// Unknown key IDs do not trigger a refetch while the cached key set is
/// younger than this.
pub const DEFAULT_JWKS_MIN_REFETCH: Duration = Duration::from_secs(30);

/// Configuration errors. Any of these aborts startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to build key provider HTTP client: {0}")]
    HttpClient(String),
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Settings the auth core depends on.
///
/// Fixed per deployment. Built from the environment in production and
/// constructed directly in tests so a mock provider can stand in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Identity provider domain, e.g. `tenant.eu.auth0.com`.
    pub domain: String,
    /// Expected `aud` claim.
    pub audience: String,
    /// Accepted signing algorithms. Never contains a symmetric algorithm.
    pub algorithms: Vec<Algorithm>,
    /// Where the key set is published.
    pub jwks_url: Url,
    pub jwks_cache_ttl: Duration,
    pub jwks_timeout: Duration,
    /// Cached key sets younger than this are trusted to be complete.
    pub jwks_min_refetch: Duration,
    /// Clock skew tolerance in seconds.
    pub leeway: u64,
}

impl AuthConfig {
    /// Create a configuration for `domain` with defaults for everything but
    /// the audience.
    pub fn new(domain: impl Into<String>, audience: impl Into<String>) -> Result<Self, ConfigError> {
        let domain = domain.into();
        let jwks_url = default_jwks_url(&domain)?;
        Ok(Self {
            domain,
            audience: audience.into(),
            algorithms: vec![Algorithm::RS256],
            jwks_url,
            jwks_cache_ttl: DEFAULT_JWKS_CACHE_TTL,
            jwks_timeout: DEFAULT_JWKS_TIMEOUT,
            jwks_min_refetch: DEFAULT_JWKS_MIN_REFETCH,
            leeway: 0,
        })
    }

    /// Expected `iss` claim.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    pub fn with_jwks_url(mut self, url: Url) -> Self {
        self.jwks_url = url;
        self
    }

    pub fn with_algorithms(mut self, algorithms: Vec<Algorithm>) -> Self {
        self.algorithms = algorithms;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.jwks_cache_ttl = ttl;
        self
    }

    pub fn with_min_refetch_interval(mut self, interval: Duration) -> Self {
        self.jwks_min_refetch = interval;
        self
    }

    pub fn with_leeway(mut self, leeway: u64) -> Self {
        self.leeway = leeway;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let domain = required(&lookup, AUTH0_DOMAIN_ENV)?;
        let audience = required(&lookup, API_AUDIENCE_ENV)?;

        let algorithms = parse_algorithms(
            &lookup(JWT_ALGORITHMS_ENV).unwrap_or_else(|| DEFAULT_ALGORITHMS.to_string()),
        )?;

        let jwks_url = match lookup(JWKS_URL_ENV) {
            Some(raw) => Url::parse(&raw)
                .map_err(|e| ConfigError::invalid(JWKS_URL_ENV, &raw, e.to_string()))?,
            None => default_jwks_url(&domain)?,
        };

        Ok(Self {
            domain,
            audience,
            algorithms,
            jwks_url,
            jwks_cache_ttl: seconds(&lookup, JWKS_CACHE_TTL_ENV)?
                .unwrap_or(DEFAULT_JWKS_CACHE_TTL),
            jwks_timeout: seconds(&lookup, JWKS_TIMEOUT_ENV)?.unwrap_or(DEFAULT_JWKS_TIMEOUT),
            jwks_min_refetch: seconds(&lookup, JWKS_MIN_REFETCH_ENV)?
                .unwrap_or(DEFAULT_JWKS_MIN_REFETCH),
            leeway: seconds(&lookup, JWT_LEEWAY_ENV)?
                .map(|d| d.as_secs())
                .unwrap_or(0),
        })
    }
}

/// HTTP server and process settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub seed_sample_drink: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::invalid(PORT_ENV, &raw, "expected a port number"))?,
            None => DEFAULT_PORT,
        };
        let seed_sample_drink = lookup(SEED_SAMPLE_DRINK_ENV)
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            seed_sample_drink,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(var))
}

fn seconds<F>(lookup: &F, var: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::invalid(var, &raw, "expected a whole number of seconds"))
        })
        .transpose()
}

fn default_jwks_url(domain: &str) -> Result<Url, ConfigError> {
    let raw = format!("https://{domain}/.well-known/jwks.json");
    Url::parse(&raw).map_err(|e| ConfigError::invalid(AUTH0_DOMAIN_ENV, domain, e.to_string()))
}

/// Parse the algorithm allow-list. Symmetric algorithms are refused: keys
/// come from a public key set, so an HMAC entry would let a public key be
/// used as a shared secret.
fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let mut algorithms = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let alg = Algorithm::from_str(name).map_err(|_| {
            ConfigError::invalid(JWT_ALGORITHMS_ENV, raw, format!("unknown algorithm {name}"))
        })?;
        if matches!(alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(ConfigError::invalid(
                JWT_ALGORITHMS_ENV,
                raw,
                format!("{name} is symmetric"),
            ));
        }
        if !algorithms.contains(&alg) {
            algorithms.push(alg);
        }
    }

    if algorithms.is_empty() {
        return Err(ConfigError::invalid(
            JWT_ALGORITHMS_ENV,
            raw,
            "at least one algorithm is required",
        ));
    }
    Ok(algorithms)
}
