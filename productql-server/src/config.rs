//! Application configuration - environment loading
//!
//! Configuration is loaded from environment variables (after `.env`):
//! - `MONGODB_URI`: connection string. Optional; when absent every connect
//!   attempt fails and resolvers report a connection error
//! - `MONGODB_DATABASE`: database name (default: the one in the URI, else `test`)
//! - `PRODUCTS_COLLECTION`: collection name (default: `products`)

use std::sync::Arc;

use crate::store::mongo::DEFAULT_COLLECTION;
use crate::store::{Connector, MongoConnector};

/// Store configuration
#[derive(Clone)]
pub struct AppConfig {
    pub mongodb_uri: Option<String>,
    pub database: Option<String>,
    pub collection: String,
}

impl AppConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let config = Self {
            mongodb_uri: non_empty_var("MONGODB_URI"),
            database: non_empty_var("MONGODB_DATABASE"),
            collection: non_empty_var("PRODUCTS_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
        };

        tracing::info!(
            uri_set = config.mongodb_uri.is_some(),
            database = config.database.as_deref().unwrap_or("<from uri>"),
            collection = %config.collection,
            "Config loaded"
        );

        config
    }

    /// Override the connection string (e.g. from a CLI flag).
    pub fn with_mongodb_uri(mut self, uri: Option<String>) -> Self {
        if uri.is_some() {
            self.mongodb_uri = uri;
        }
        self
    }

    /// MongoDB connector for this configuration.
    pub fn connector(&self) -> Arc<dyn Connector> {
        Arc::new(
            MongoConnector::new(self.mongodb_uri.clone())
                .with_database(self.database.clone())
                .with_collection(self.collection.clone()),
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mongodb_uri: None,
            database: None,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

// The URI carries credentials; keep it out of Debug output.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("mongodb_uri", &self.mongodb_uri.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
