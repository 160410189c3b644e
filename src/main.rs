use std::net::SocketAddr;

use anyhow::Context;
use axum::{body::Body, Router};
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use imgdrop::{router, Config, Storage};

const DEFAULT_LOG_FILTER: &str = "imgdrop=info,tower_http=info";


async fn run(app: Router<Body>, addr: SocketAddr) -> anyhow::Result<()> {
    // runs the webserver
    let server = axum::Server::try_bind(&addr)
        .with_context(|| format!("failed to bind {}", addr))?
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "Failed to listen for SIGINT");
            }
            tracing::info!("Shutting down...");
        });

    tracing::info!(%addr, "Server initialized");
    server.await.context("server error")
}


#[tokio::main]
async fn main() -> anyhow::Result<()> {
    drop(dotenv());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::from_env()?;
    let storage = Storage::new(&config.upload_dir);
    storage
        .ensure_ready()
        .await
        .with_context(|| format!("failed to create {}", config.upload_dir.display()))?;
    tracing::info!(dir = %config.upload_dir.display(), "Upload directory ready");

    run(router(storage), config.addr).await
}
