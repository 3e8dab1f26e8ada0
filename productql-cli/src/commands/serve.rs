//! HTTP server command
//!
//! Runs the GraphQL API on a local socket.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use productql_server::http::{run_server, ServerConfig};
use productql_server::{AppConfig, AppState};

use super::{connection_manager, warm_up};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "PRODUCTQL_BIND", default_value = "127.0.0.1:4000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// MongoDB connection string (overrides environment/.env)
    #[arg(long, env = "MONGODB_URI", hide_env_values = true)]
    pub mongodb_uri: Option<String>,

    /// Use a process-local store instead of MongoDB (ignores --mongodb-uri)
    #[arg(long)]
    pub in_memory: bool,

    /// Connect to the store at startup rather than on the first request
    #[arg(long)]
    pub eager_connect: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = AppConfig::from_env().with_mongodb_uri(args.mongodb_uri);
    if config.mongodb_uri.is_none() && !args.in_memory {
        tracing::warn!("MONGODB_URI not set - every request will fail to connect");
    }

    let manager = connection_manager(&config, args.in_memory);
    if args.eager_connect {
        warm_up(&manager).await;
    }

    tracing::info!("Starting productql server on {}", args.bind);

    let server_config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Run server (blocks until shutdown)
    run_server(AppState::new(manager), server_config)
        .await
        .context("Server error")?;

    Ok(())
}
