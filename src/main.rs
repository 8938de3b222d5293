// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use rec_gateway::api::router;
use rec_gateway::config::{GatewayConfig, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV};
use rec_gateway::ledger::rpc::RpcLedgerSession;
use rec_gateway::registry::{parse_extra_schemas, TypeRegistry};
use rec_gateway::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = GatewayConfig::from_env();

    let session = match RpcLedgerSession::connect(&config).await {
        Ok(session) => Arc::new(session),
        Err(e) => {
            tracing::error!(error = %e, node_url = %config.node_url, "Failed to establish ledger session");
            std::process::exit(1);
        }
    };

    let registry = TypeRegistry::with_builtin();
    for schema in parse_extra_schemas(&config.extra_schemas) {
        tracing::info!(schema = %schema.name, "Registered extension schema");
        registry.register(schema);
    }

    let state = AppState::new(session, registry);
    let shutdown = state.shutdown.clone();
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "REC gateway listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Ends every open update stream so in-flight SSE responses can
            // complete and their subscriptions are released.
            shutdown.cancel();
        })
        .await
        .expect("HTTP server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    match std::env::var(LOG_FORMAT_ENV).as_deref() {
        Ok("json") => subscriber.json().init(),
        _ => subscriber.init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
