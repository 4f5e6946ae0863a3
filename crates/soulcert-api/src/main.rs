//! # soulcert-api — Binary Entry Point
//!
//! Starts the Axum HTTP server. Configuration comes from the
//! environment:
//!
//! - `PORT` — listen port (default 3000).
//! - `SOULCERT_REGISTRY` — certificate registry file (default `registry.json`).
//! - `SOULCERT_ADMINS` — administrator directory file (default `admins.json`).

use soulcert_api::AppState;
use soulcert_registry::{AdminDirectory, CertificateRegistry, CertificateService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let registry_path =
        std::env::var("SOULCERT_REGISTRY").unwrap_or_else(|_| "registry.json".to_string());
    let admins_path =
        std::env::var("SOULCERT_ADMINS").unwrap_or_else(|_| "admins.json".to_string());

    let registry = CertificateRegistry::open(&registry_path).map_err(|e| {
        tracing::error!("failed to open certificate registry: {e}");
        e
    })?;
    let admins = AdminDirectory::open(&admins_path).map_err(|e| {
        tracing::error!("failed to open administrator directory: {e}");
        e
    })?;

    let state = AppState::new(CertificateService::new(registry), admins);
    let app = soulcert_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Soulcert API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
