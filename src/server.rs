//! MCP server initialization for stdio and SSE transports.
//!
//! Both entry points open the store, start background discovery against the
//! same connection, serve until the client or a signal ends the session, then
//! stop discovery before returning.

use crate::config::MemgraphConfig;
use crate::db;
use crate::discovery::{Discovery, DiscoveryScheduler, SchedulerConfig};
use crate::engine::MemoryEngine;
use crate::tools::MemgraphTools;
use anyhow::Result;
use rmcp::ServiceExt;
use std::sync::{Arc, Mutex};

/// Shared setup: open the DB and build the engine plus its discovery scheduler.
fn setup_shared_state(config: &MemgraphConfig) -> Result<(MemoryEngine, DiscoveryScheduler<Discovery>)> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");

    let engine = MemoryEngine::new(
        Arc::new(Mutex::new(conn)),
        &db_path,
        config.retrieval.clone(),
    );

    let discovery = Discovery::new(engine.db(), config.discovery.clone());
    let scheduler = DiscoveryScheduler::new(discovery, SchedulerConfig::from(&config.discovery));

    Ok((engine, scheduler))
}

async fn stop_discovery(scheduler: &DiscoveryScheduler<Discovery>) {
    scheduler.stop().await;
    let status = scheduler.status();
    tracing::info!(
        completed = status.cycles_completed,
        failed = status.cycles_failed,
        last_run = ?status.last_run,
        "discovery summary"
    );
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: MemgraphConfig) -> Result<()> {
    tracing::info!("starting memgraph MCP server on stdio");

    let (engine, scheduler) = setup_shared_state(&config)?;
    scheduler.start();

    let tools = MemgraphTools::new(engine);
    let transport = rmcp::transport::stdio();

    let result = async {
        let server = tools.serve(transport).await?;
        tracing::info!("MCP server running, waiting for client");
        server.waiting().await?;
        anyhow::Ok(())
    }
    .await;

    stop_discovery(&scheduler).await;
    tracing::info!("MCP server shut down");
    result
}

/// Start the MCP server over Streamable HTTP (SSE) transport.
pub async fn serve_sse(config: MemgraphConfig) -> Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;
    let bind_addr = format!("{host}:{port}");

    tracing::info!(addr = %bind_addr, "starting memgraph MCP server on SSE/HTTP");

    let (engine, scheduler) = setup_shared_state(&config)?;
    scheduler.start();

    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(MemgraphTools::new(engine.clone())),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);

    let result = async {
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
        tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "failed to listen for ctrl-c");
                }
                tracing::info!("shutting down SSE server");
            })
            .await?;
        anyhow::Ok(())
    }
    .await;

    stop_discovery(&scheduler).await;
    result
}
