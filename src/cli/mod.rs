//! Command-line interface.
//!
//! `statgate serve` reads configuration from the environment, probes the
//! downstream backend once, and runs the gateway until a shutdown signal.

mod args;
mod errors;

pub use args::{Cli, Command};
pub use errors::{CliError, CliResult};

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::executor::HttpExecutor;
use crate::gateway::GatewayServer;
use crate::observability::Logger;

/// Parse arguments and dispatch to the selected command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match cli.command {
        Command::Serve { port } => serve(port),
    }
}

fn serve(port_override: Option<u16>) -> CliResult<()> {
    let mut config = GatewayConfig::from_env()?;
    if let Some(port) = port_override {
        config.port = port;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let executor = Arc::new(HttpExecutor::new(&config.downstream_url, &config.api_key)?);

        // Probe once at startup; an unreachable backend is logged, not
        // fatal — the gateway keeps serving and the backend may come up
        // later (DESIGN.md, D5).
        match executor.ping().await {
            Ok(()) => Logger::info(
                "DOWNSTREAM_CONNECTED",
                &[("url", config.downstream_url.as_str())],
            ),
            Err(e) => {
                let message = e.to_string();
                Logger::warn(
                    "DOWNSTREAM_UNREACHABLE",
                    &[
                        ("url", config.downstream_url.as_str()),
                        ("error", message.as_str()),
                    ],
                );
            }
        }

        let server = GatewayServer::new(config, executor);
        server.serve().await?;
        Ok(())
    })
}
