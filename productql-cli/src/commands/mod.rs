//! Subcommand implementations

pub mod lambda;
pub mod schema;
pub mod serve;

use std::sync::Arc;

use productql_server::store::{Connector, MemoryConnector};
use productql_server::{AppConfig, ConnectionManager};

pub use lambda::run_lambda;
pub use schema::run_schema;
pub use serve::run_serve;

/// Connection manager for the configured backend.
///
/// `in_memory` swaps MongoDB for a process-local store (data is lost on exit).
fn connection_manager(config: &AppConfig, in_memory: bool) -> Arc<ConnectionManager> {
    let connector: Arc<dyn Connector> = if in_memory {
        tracing::warn!("Using in-memory product store - data is not persisted");
        Arc::new(MemoryConnector::default())
    } else {
        config.connector()
    };

    Arc::new(ConnectionManager::new(connector))
}

/// Connect at startup instead of on the first request. Failure is logged;
/// resolvers will retry on demand.
async fn warm_up(manager: &ConnectionManager) {
    if let Err(e) = manager.ensure_connected().await {
        tracing::warn!(error = %e, "Eager connect failed; will retry on first request");
    }
}
