//! GraphQL object and input types

use async_graphql::{InputObject, SimpleObject, ID};

use crate::models::{NewProduct, Product};

/// A product in the catalog
#[derive(SimpleObject, Debug, Clone, PartialEq)]
#[graphql(name = "Product")]
pub struct ProductObject {
    pub id: ID,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
}

impl From<Product> for ProductObject {
    fn from(p: Product) -> Self {
        Self {
            id: ID(p.id),
            name: p.name,
            description: p.description,
            price: p.price,
            image_url: p.image_url,
        }
    }
}

/// Fields for a new product
#[derive(InputObject, Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
}

impl From<ProductInput> for NewProduct {
    fn from(input: ProductInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
            price: input.price,
            image_url: input.image_url,
        }
    }
}
