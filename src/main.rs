// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, sync::Arc};

use coffee_shop_server::{
    api::router,
    auth::{AuthGate, JwksManager, TokenVerifier},
    config::{AuthConfig, ServerConfig, LOG_FORMAT_ENV},
    state::AppState,
    store::InMemoryStore,
};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let server_config = ServerConfig::from_env().map_err(|e| {
        error!("Failed to load server configuration: {e}");
        e
    })?;
    let auth_config = AuthConfig::from_env().map_err(|e| {
        error!("Failed to load auth configuration: {e}");
        e
    })?;

    info!(
        issuer = %auth_config.issuer(),
        audience = %auth_config.audience,
        jwks_url = %auth_config.jwks_url,
        algorithms = ?auth_config.algorithms,
        "Configuration loaded"
    );

    let jwks = JwksManager::from_config(&auth_config).map_err(|e| {
        error!("Failed to set up key provider client: {e}");
        e
    })?;
    let verifier = TokenVerifier::new(auth_config, Arc::new(jwks));
    let auth = AuthGate::new(verifier);

    let store = if server_config.seed_sample_drink {
        InMemoryStore::with_sample_drink()
    } else {
        InMemoryStore::new()
    };

    let app = router(AppState::new(store, auth));

    let addr: SocketAddr = server_config.bind_address().parse().map_err(|e| {
        error!("Invalid bind address: {e}");
        e
    })?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Coffee shop server listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "coffee_shop_server=info,tower_http=debug".into());
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, shutting down"),
            Err(e) => error!("Failed to listen for SIGINT: {e}"),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, shutting down");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
