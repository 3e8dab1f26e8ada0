//! Product domain types shared by the store and the GraphQL layer

/// A persisted product.
///
/// `id` is assigned by the store on insert and never changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
}

/// Client-supplied fields for a product that has not been stored yet.
///
/// No validation happens here: an empty name is a valid name.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
}

impl NewProduct {
    /// Attach a store-generated id.
    pub fn with_id(self, id: impl Into<String>) -> Product {
        Product {
            id: id.into(),
            name: self.name,
            description: self.description,
            price: self.price,
            image_url: self.image_url,
        }
    }
}
