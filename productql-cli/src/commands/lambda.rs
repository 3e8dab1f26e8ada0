//! Lambda command
//!
//! Serves API Gateway HTTP API events through the GraphQL gateway.

use anyhow::{Context, Result};
use clap::Parser;

use productql_server::gateway::lambda::run_lambda as run_runtime;
use productql_server::{AppConfig, AppState};

use super::{connection_manager, warm_up};

/// Arguments for the lambda command
#[derive(Parser, Debug)]
pub struct LambdaArgs {
    /// Use a process-local store instead of MongoDB
    #[arg(long)]
    pub in_memory: bool,

    /// Connect during cold start rather than on the first invocation
    #[arg(long)]
    pub eager_connect: bool,
}

/// Run the Lambda runtime loop
pub async fn run_lambda(args: LambdaArgs) -> Result<()> {
    let config = AppConfig::from_env();
    let manager = connection_manager(&config, args.in_memory);
    if args.eager_connect {
        warm_up(&manager).await;
    }

    let state = AppState::new(manager);
    run_runtime(state.gateway().clone())
        .await
        .context("Lambda runtime error")?;

    Ok(())
}
