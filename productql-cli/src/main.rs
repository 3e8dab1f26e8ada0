//! productql CLI - GraphQL product catalog server
//!
//! Entry point for the `productql` binary:
//! - `serve`: local HTTP server (`/graphql`, `/health`)
//! - `lambda`: AWS Lambda handler for API Gateway HTTP APIs
//! - `schema`: print the GraphQL SDL

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(name = "productql", version, about = "GraphQL product catalog over MongoDB")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),

    /// Run as an AWS Lambda function behind API Gateway
    Lambda(commands::lambda::LambdaArgs),

    /// Print the GraphQL schema (SDL)
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        without_time: matches!(cli.command, Commands::Lambda(_)),
    })
    .ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Lambda(args) => commands::run_lambda(args).await?,
        Commands::Schema => commands::run_schema(),
    }

    Ok(())
}
