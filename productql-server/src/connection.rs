//! Connection manager - lazy, single-flight store connection
//!
//! One manager is built at startup and shared by every request:
//! - first caller opens the store, later callers reuse the handle (no I/O)
//! - concurrent cold callers wait on the same in-flight attempt
//! - a failed attempt leaves the manager disconnected; the next call retries

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::error::{ProductError, ProductResult};
use crate::store::{Connector, ProductStore};

/// Owns the connector and the store handle it produced, if any.
pub struct ConnectionManager {
    connector: Arc<dyn Connector>,
    store: OnceCell<Arc<dyn ProductStore>>,
}

impl ConnectionManager {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            store: OnceCell::new(),
        }
    }

    /// Return the store, connecting first if no attempt has succeeded yet.
    ///
    /// # Errors
    ///
    /// [`ProductError::Connection`] with the connector's error as source.
    pub async fn ensure_connected(&self) -> ProductResult<Arc<dyn ProductStore>> {
        if let Some(store) = self.store.get() {
            tracing::debug!("=> Using existing {} connection", self.connector.backend());
            return Ok(Arc::clone(store));
        }

        let store = self
            .store
            .get_or_try_init(|| async {
                match self.connector.connect().await {
                    Ok(store) => {
                        tracing::info!("=> Connected to {}", self.connector.backend());
                        Ok(store)
                    }
                    Err(source) => {
                        tracing::error!(
                            error = %source,
                            "Error connecting to {}",
                            self.connector.backend()
                        );
                        Err(ProductError::Connection { source })
                    }
                }
            })
            .await?;

        Ok(Arc::clone(store))
    }

    pub fn is_connected(&self) -> bool {
        self.store.initialized()
    }

    pub fn backend(&self) -> &'static str {
        self.connector.backend()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("backend", &self.connector.backend())
            .field("connected", &self.is_connected())
            .finish()
    }
}
