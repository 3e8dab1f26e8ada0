//! Product storage - connector and store traits plus backends
//!
//! Two seams keep the resolvers independent of MongoDB:
//! - [`Connector`] opens a store handle (the only step that talks to the
//!   network before a query runs)
//! - [`ProductStore`] performs the three document operations
//!
//! Backends:
//! - `mongo`: MongoDB via the official driver
//! - `memory`: process-local store for tests and offline development

pub mod memory;
pub mod mongo;

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{NewProduct, Product};

pub use memory::{InMemoryProductStore, MemoryConnector};
pub use mongo::{MongoConnector, MongoProductStore};

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("MONGODB_URI is not set")]
    MissingUri,

    #[error("invalid product id '{0}'")]
    InvalidId(String),

    #[error("database error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("unexpected document shape: {0}")]
    Decode(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Document operations over the product collection.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Look up one product. `Ok(None)` when the id is well-formed but absent.
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, StoreError>;

    /// Every product, in the store's natural order. Unbounded.
    ///
    /// Rows are decoded one by one: a document that cannot be read as a
    /// product yields an `Err` entry in place without failing the rest.
    async fn find_all(&self) -> Result<Vec<Result<Product, StoreError>>, StoreError>;

    /// Persist a new product and return it with its generated id.
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError>;
}

/// Opens a [`ProductStore`].
///
/// Called by the connection manager until one attempt succeeds.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn ProductStore>, StoreError>;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}
