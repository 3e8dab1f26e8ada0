//! Query resolvers

use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use super::connection;
use super::types::ProductObject;
use crate::error::ProductError;

#[derive(Debug, Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Fetch a single product by its id. Null when no product has that id.
    async fn product(&self, ctx: &Context<'_>, id: ID) -> Result<Option<ProductObject>> {
        tracing::debug!(id = %id.as_str(), "product resolver");

        let store = connection(ctx)?
            .ensure_connected()
            .await
            .map_err(|e| e.extend())?;

        let product = store
            .find_by_id(id.as_str())
            .await
            .map_err(|e| ProductError::from(e).extend())?;

        Ok(product.map(ProductObject::from))
    }

    /// Every product in the catalog.
    async fn products(&self, ctx: &Context<'_>) -> Result<Option<Vec<Option<ProductObject>>>> {
        tracing::debug!("products resolver");

        let store = connection(ctx)?
            .ensure_connected()
            .await
            .map_err(|e| e.extend())?;

        let rows = store
            .find_all()
            .await
            .map_err(|e| ProductError::from(e).extend())?;

        tracing::debug!(count = rows.len(), "products fetched");

        // An unreadable row becomes a null item plus an error; the rest of
        // the list is still returned.
        let products = rows
            .into_iter()
            .map(|row| match row {
                Ok(product) => Some(ProductObject::from(product)),
                Err(e) => {
                    ctx.add_error(
                        ProductError::from(e)
                            .extend()
                            .into_server_error(ctx.item.pos),
                    );
                    None
                }
            })
            .collect();

        Ok(Some(products))
    }
}
