//! Mutation resolvers

use async_graphql::{Context, ErrorExtensions, Object, Result};

use super::connection;
use super::types::{ProductInput, ProductObject};
use crate::error::ProductError;
use crate::models::NewProduct;

#[derive(Debug, Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Store a new product and return it with its generated id.
    ///
    /// A null `input` is refused with "Failed to add product" before any
    /// write. Handlers that pass it through instead insert an empty document
    /// and then fail on the non-null fields; the error seen by the caller is
    /// the same, but nothing is left behind in the collection.
    async fn add_product(
        &self,
        ctx: &Context<'_>,
        input: Option<ProductInput>,
    ) -> Result<Option<ProductObject>> {
        let store = connection(ctx)?
            .ensure_connected()
            .await
            .map_err(|e| e.extend())?;

        let Some(input) = input else {
            tracing::error!("Error adding product: input is null");
            return Err(ProductError::CreateFailed.extend());
        };

        match store.insert(NewProduct::from(input)).await {
            Ok(product) => {
                tracing::info!(id = %product.id, "product added");
                Ok(Some(ProductObject::from(product)))
            }
            Err(e) => {
                tracing::error!(error = %e, "Error adding product");
                Err(ProductError::CreateFailed.extend())
            }
        }
    }
}
