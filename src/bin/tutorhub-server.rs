// ABOUTME: Tutorhub server binary
// ABOUTME: Loads configuration, runs migrations, and serves the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use tutorhub::config::ServerConfig;
use tutorhub::context::ServerResources;
use tutorhub::database_plugins::factory::Database;
use tutorhub::database_plugins::DatabaseProvider;
use tutorhub::llm::OpenAiProvider;
use tutorhub::logging;
use tutorhub::routes;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env().context("failed to load configuration")?;
    logging::init_from_env().context("failed to initialize logging")?;

    let database = Database::new(&config.database_url)
        .await
        .context("failed to initialize database")?;
    database.migrate().await.context("failed to run migrations")?;
    info!(backend = database.backend_info(), "database ready");

    let chat_provider = Arc::new(
        OpenAiProvider::new(config.llm.clone())
            .map_err(|e| anyhow::anyhow!("failed to build chat provider: {e}"))?,
    );

    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(database, config, chat_provider));
    let app = routes::router(resources);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .await
        .context("server terminated unexpectedly")?;

    Ok(())
}
