//! Application state shared across handlers

use std::sync::Arc;

use crate::connection::ConnectionManager;
use crate::gateway::GraphQLGateway;
use crate::schema::build_schema;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    connection: Arc<ConnectionManager>,
    gateway: GraphQLGateway,
}

impl AppState {
    /// Build the schema around `connection` and wrap it in a gateway.
    pub fn new(connection: Arc<ConnectionManager>) -> Self {
        let gateway = GraphQLGateway::new(build_schema(Arc::clone(&connection)));
        Self {
            inner: Arc::new(AppStateInner {
                connection,
                gateway,
            }),
        }
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.inner.connection
    }

    pub fn gateway(&self) -> &GraphQLGateway {
        &self.inner.gateway
    }
}
