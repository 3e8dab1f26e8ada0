//! In-memory product store
//!
//! Generates ObjectId-shaped ids and rejects malformed ones the same way the
//! MongoDB backend does, so resolver behaviour is identical across backends.

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{Connector, ProductStore, StoreError};
use crate::models::{NewProduct, Product};

/// Products kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let oid = ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_owned()))?;
        let key = oid.to_hex();

        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == key).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Result<Product, StoreError>>, StoreError> {
        Ok(self.products.read().await.iter().cloned().map(Ok).collect())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let product = product.with_id(ObjectId::new().to_hex());
        self.products.write().await.push(product.clone());
        Ok(product)
    }
}

/// Connector handing out one shared in-memory store.
#[derive(Debug, Clone)]
pub struct MemoryConnector {
    store: Arc<InMemoryProductStore>,
    failure: Option<String>,
}

impl MemoryConnector {
    pub fn new(store: Arc<InMemoryProductStore>) -> Self {
        Self {
            store,
            failure: None,
        }
    }

    /// A connector whose every attempt fails with `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            store: Arc::new(InMemoryProductStore::new()),
            failure: Some(reason.into()),
        }
    }

    pub fn store(&self) -> Arc<InMemoryProductStore> {
        Arc::clone(&self.store)
    }
}

impl Default for MemoryConnector {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryProductStore::new()))
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self) -> Result<Arc<dyn ProductStore>, StoreError> {
        if let Some(reason) = &self.failure {
            return Err(StoreError::Unavailable(reason.clone()));
        }
        Ok(self.store.clone())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
