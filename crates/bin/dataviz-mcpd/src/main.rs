//! Daemon entry point for the data visualization MCP server.
//!
//! Loads configuration from CLI arguments and the environment, makes sure the
//! output directory exists, and serves the MCP protocol over stdio and/or
//! streamable HTTP. `--check` verifies the setup instead of serving.

mod check;
mod config;

use std::process::ExitCode;
use std::sync::Arc;

use dataviz_core::control::DataVizControlPlane;
use dataviz_core::store::DataStore;
use dataviz_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tokio::task::JoinSet;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::DataVizConfig;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn init_tracing() {
    // stdout belongs to the stdio transport.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode, BoxError> {
    init_tracing();
    let config = DataVizConfig::from_args()?;

    std::fs::create_dir_all(&config.output_dir)?;
    let control = Arc::new(DataVizControlPlane::new(DataStore::new(
        config.data_dir.clone(),
        config.output_dir.clone(),
    )));
    info!(
        data_dir = %config.data_dir.display(),
        output_dir = %config.output_dir.display(),
        "dataviz-mcpd starting"
    );

    if config.check {
        let report = check::verify_setup(&control);
        println!("{report}");
        return Ok(if report.all_passed() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let mut servers: JoinSet<Result<(), BoxError>> = JoinSet::new();
    if config.mcp_serve {
        let http = McpHttpServerConfig::new(config.mcp_http_addr);
        servers.spawn(serve_streamable_http(Arc::clone(&control), http));
    }
    if config.enable_stdio {
        servers.spawn(serve_stdio(Arc::clone(&control)));
    }

    // The first transport to stop ends the daemon.
    if let Some(outcome) = servers.join_next().await {
        match outcome {
            Ok(Ok(())) => info!("transport closed"),
            Ok(Err(err)) => {
                error!(error = %err, "transport failed");
                return Err(err);
            }
            Err(err) => {
                error!(error = %err, "transport task panicked");
                return Err(Box::new(err));
            }
        }
    }
    servers.shutdown().await;
    Ok(ExitCode::SUCCESS)
}
