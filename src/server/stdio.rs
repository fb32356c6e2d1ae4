//! Stdio MCP transport.
//!
//! Stdout carries protocol frames only; all logging goes to stderr.

use anyhow::{Context, Result};
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;

use super::TidalServer;
use crate::handlers::ToolContext;

/// Serve MCP on the process stdio until stdin closes
pub async fn run(ctx: ToolContext) -> Result<()> {
    // rmcp handles the JSON-RPC framing and the initialize handshake
    let service = TidalServer::new(ctx)
        .serve(stdio())
        .await
        .context("Failed to start stdio MCP service")?;

    info!("Stdio MCP server running");

    service.waiting().await?;

    info!("Stdio MCP server shutdown");
    Ok(())
}
