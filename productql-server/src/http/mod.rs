//! HTTP server layer
//!
//! Axum server with:
//! - `/graphql` (GET and POST) through the shared gateway
//! - `/health` with connection status
//! - CORS (localhost only by default)
//! - Request tracing
//! - Graceful shutdown

pub mod routes;
pub mod server;

pub use server::{build_router, run_server, ServerConfig};
