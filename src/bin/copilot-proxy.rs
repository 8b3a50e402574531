// ABOUTME: Copilot proxy server binary
// ABOUTME: Loads configuration once, fails fast without the upstream key, then serves SSE
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! # Copilot Proxy Binary
//!
//! ```bash
//! LOVABLE_API_KEY=... copilot-proxy --http-port 8080
//! ```

use std::sync::Arc;

use alivee_copilot::config::ProxyConfig;
use alivee_copilot::llm::{GatewayProvider, UpstreamProvider};
use alivee_copilot::logging;
use alivee_copilot::server::CopilotServer;
use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "copilot-proxy")]
#[command(about = "Copiloto Alivee - streaming proxy to the AI gateway")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = match ProxyConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Refusing to start: {e}");
            return Err(e.into());
        }
    };
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    info!("Starting Copiloto Alivee proxy");
    info!("{}", config.summary());

    let provider: Arc<dyn UpstreamProvider> = Arc::new(GatewayProvider::new(&config.upstream)?);
    let port = config.http_port;
    let server = CopilotServer::new(Arc::new(config), provider);

    if let Err(e) = server.run(port).await {
        error!("Server error: {e}");
        return Err(e);
    }

    Ok(())
}
