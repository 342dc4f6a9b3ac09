//! Serve command - runs the HTTP server

use std::net::SocketAddr;

use anyhow::Context;
use clap::Args;
use tokio::net::{lookup_host, TcpListener};
use tokio::signal;
use tracing::{error, info};

use crate::api::create_router;
use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::observability::init_metrics;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(long)]
    pub port: Option<u16>,
}

/// Run the server until Ctrl+C or SIGTERM
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging)?;

    let state = crate::create_app_state_with_config(&config).await?;
    let metrics = init_metrics(&config.metrics);
    let app = create_router(state, metrics);

    let addr = build_socket_addr(&config, &args).await?;
    info!("Starting operations API on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

/// Resolve the bind address; hosts may be IP literals or names such as `localhost`
async fn build_socket_addr(config: &AppConfig, args: &ServeArgs) -> anyhow::Result<SocketAddr> {
    let host = args.host.as_deref().unwrap_or(&config.server.host);
    let port = args.port.unwrap_or(config.server.port);

    lookup_host((host, port))
        .await
        .with_context(|| format!("Invalid server host '{}'", host))?
        .next()
        .with_context(|| format!("Server host '{}' resolved to no address", host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_socket_addr_from_config() {
        let addr = build_socket_addr(&AppConfig::default(), &ServeArgs::default())
            .await
            .unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:8080");
    }

    #[tokio::test]
    async fn test_socket_addr_overrides() {
        let args = ServeArgs {
            host: Some("127.0.0.1".to_string()),
            port: Some(3000),
        };

        let addr = build_socket_addr(&AppConfig::default(), &args).await.unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }

    #[tokio::test]
    async fn test_localhost_resolves_to_loopback() {
        let args = ServeArgs {
            host: Some("localhost".to_string()),
            port: Some(3000),
        };

        let addr = build_socket_addr(&AppConfig::default(), &args).await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 3000);
    }

    #[tokio::test]
    async fn test_invalid_host_is_an_error() {
        let args = ServeArgs {
            host: Some("not a host".to_string()),
            port: None,
        };

        assert!(build_socket_addr(&AppConfig::default(), &args).await.is_err());
    }
}
