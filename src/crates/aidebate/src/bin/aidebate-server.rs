//! aidebate server binary
//!
//! Serves the debate and business idea API over HTTP.

use aidebate::api::create_router;
use aidebate::config::ServerConfig;
use aidebate::context::AppContext;
use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing/logging
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(rust_log).init();

    tracing::info!("Loading server configuration...");
    let config = ServerConfig::load().context(
        "Invalid configuration. Set CONFIG_PATH or fix config/aidebate.toml",
    )?;

    tracing::info!("Server name: {}", config.server.name);
    tracing::info!(
        "Limits: {} rounds, {} ideas",
        config.limits.max_rounds,
        config.limits.max_ideas
    );

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;

    let context = Arc::new(AppContext::from_config(config));
    let configured = context.registry().configured();
    if configured.is_empty() {
        tracing::warn!("No LLM provider has an API key; every job request will be rejected");
    } else {
        let names: Vec<String> = configured.iter().map(ToString::to_string).collect();
        tracing::info!("Providers available: {}", names.join(", "));
    }

    tracing::info!("Building API router");
    let app = create_router(context);

    tracing::info!("Starting aidebate server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("aidebate server shut down gracefully");
    Ok(())
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL-C signal handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down");
        }
    }
}
