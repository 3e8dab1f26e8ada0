//! MongoDB product store
//!
//! Documents keep the field names existing product collections already use
//! (`imageUrl`, `__v`), so this backend can share a collection with other
//! writers of the same data.

use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use super::{Connector, ProductStore, StoreError};
use crate::models::{NewProduct, Product};

/// Database used when neither the config nor the URI names one.
pub const DEFAULT_DATABASE: &str = "test";

/// Default collection for product documents.
pub const DEFAULT_COLLECTION: &str = "products";

/// Product document as stored in MongoDB.
///
/// Other writers of the collection enforce no required fields, so every
/// field may be missing; [`Product::try_from`] reports which one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct ProductDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    #[serde(rename = "imageUrl")]
    image_url: Option<String>,
    #[serde(rename = "__v", skip_serializing_if = "Option::is_none")]
    version: Option<i32>,
}

impl From<&NewProduct> for ProductDocument {
    fn from(p: &NewProduct) -> Self {
        Self {
            id: None,
            name: Some(p.name.clone()),
            description: Some(p.description.clone()),
            price: Some(p.price),
            image_url: Some(p.image_url.clone()),
            version: Some(0),
        }
    }
}

impl TryFrom<ProductDocument> for Product {
    type Error = StoreError;

    fn try_from(d: ProductDocument) -> Result<Self, Self::Error> {
        let id = d
            .id
            .ok_or_else(|| StoreError::Decode("product document without _id".into()))?;

        let missing = |field: &str| StoreError::Decode(format!("product {id} has no {field}"));

        Ok(Product {
            id: id.to_hex(),
            name: d.name.ok_or_else(|| missing("name"))?,
            description: d.description.ok_or_else(|| missing("description"))?,
            price: d.price.ok_or_else(|| missing("price"))?,
            image_url: d.image_url.ok_or_else(|| missing("imageUrl"))?,
        })
    }
}

/// Decode one raw document. Wrong field types and missing fields both end
/// up as [`StoreError::Decode`].
fn decode(raw: Document) -> Result<Product, StoreError> {
    let document: ProductDocument =
        bson::from_document(raw).map_err(|e| StoreError::Decode(e.to_string()))?;
    Product::try_from(document)
}

/// Product store backed by one MongoDB collection.
#[derive(Debug, Clone)]
pub struct MongoProductStore {
    collection: Collection<Document>,
}

impl MongoProductStore {
    fn new(collection: Collection<Document>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let oid = ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_owned()))?;

        self.collection
            .find_one(doc! { "_id": oid })
            .await?
            .map(decode)
            .transpose()
    }

    async fn find_all(&self) -> Result<Vec<Result<Product, StoreError>>, StoreError> {
        let mut cursor = self.collection.find(doc! {}).await?;

        let mut products = Vec::new();
        while let Some(raw) = cursor.try_next().await? {
            let product = decode(raw);
            if let Err(e) = &product {
                tracing::warn!(error = %e, "unreadable product document");
            }
            products.push(product);
        }

        Ok(products)
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let document = bson::to_document(&ProductDocument::from(&product))
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let result = self.collection.insert_one(document).await?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Decode("inserted _id is not an ObjectId".into()))?;

        Ok(product.with_id(id.to_hex()))
    }
}

/// Opens a [`MongoProductStore`] from a connection string.
#[derive(Debug, Clone)]
pub struct MongoConnector {
    uri: Option<String>,
    database: Option<String>,
    collection: String,
}

impl MongoConnector {
    /// `uri` may be absent; every connect attempt then fails with
    /// [`StoreError::MissingUri`].
    pub fn new(uri: Option<String>) -> Self {
        Self {
            uri,
            database: None,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    pub fn with_database(mut self, database: Option<String>) -> Self {
        self.database = database;
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }
}

#[async_trait]
impl Connector for MongoConnector {
    async fn connect(&self) -> Result<Arc<dyn ProductStore>, StoreError> {
        let uri = self.uri.as_deref().ok_or(StoreError::MissingUri)?;
        let options = ClientOptions::parse(uri).await?;

        let database_name = self
            .database
            .clone()
            .or_else(|| options.default_database.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(options)?;
        let database = client.database(&database_name);

        // The driver connects lazily; ping so that an unreachable server
        // fails here rather than inside the first query.
        database.run_command(doc! { "ping": 1 }).await?;

        tracing::debug!(
            database = %database_name,
            collection = %self.collection,
            "MongoDB reachable"
        );

        Ok(Arc::new(MongoProductStore::new(
            database.collection(&self.collection),
        )))
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_has_no_id_and_version_zero() {
        let new = NewProduct {
            name: "Widget".into(),
            description: "A widget".into(),
            price: 9.99,
            image_url: "http://x/w.png".into(),
        };

        let raw = bson::to_document(&ProductDocument::from(&new)).unwrap();
        assert!(!raw.contains_key("_id"));
        assert_eq!(raw.get_i32("__v").unwrap(), 0);
        assert_eq!(raw.get_str("imageUrl").unwrap(), "http://x/w.png");
    }

    #[test]
    fn document_without_version_or_float_price_decodes() {
        let oid = ObjectId::new();
        let raw = doc! {
            "_id": oid,
            "name": "Widget",
            "description": "A widget",
            "price": 10,
            "imageUrl": "http://x/w.png",
        };

        let document: ProductDocument = bson::from_document(raw).unwrap();
        let product = Product::try_from(document).unwrap();

        assert_eq!(product.id, oid.to_hex());
        assert_eq!(product.price, 10.0);
    }

    #[test]
    fn document_without_id_is_decode_error() {
        let document = ProductDocument {
            name: Some("Widget".into()),
            ..ProductDocument::default()
        };

        assert!(matches!(
            Product::try_from(document),
            Err(StoreError::Decode(_))
        ));
    }

    #[test]
    fn partial_document_names_missing_field() {
        let oid = ObjectId::new();
        let raw = doc! { "_id": oid, "name": "Legacy", "price": 1.5, "__v": 0 };

        let err = decode(raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("unexpected document shape: product {} has no description", oid.to_hex())
        );
    }

    #[test]
    fn wrongly_typed_field_is_decode_error() {
        let raw = doc! {
            "_id": ObjectId::new(),
            "name": "Widget",
            "description": "A widget",
            "price": "cheap",
            "imageUrl": "",
        };

        assert!(matches!(decode(raw), Err(StoreError::Decode(_))));
    }

    #[tokio::test]
    async fn connect_without_uri_fails() {
        let err = MongoConnector::new(None).connect().await.err().unwrap();
        assert!(matches!(err, StoreError::MissingUri));
    }

    #[tokio::test]
    async fn connect_with_malformed_uri_fails() {
        let err = MongoConnector::new(Some("not-a-mongodb-uri".into()))
            .connect()
            .await
            .err()
            .unwrap();
        assert!(matches!(err, StoreError::Mongo(_)));
    }
}
