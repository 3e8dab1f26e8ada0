//! GraphQL schema definition.
//!
//! This module contains the GraphQL schema, including:
//! - [`types`] - `Product` and `ProductInput`
//! - [`query`] - `product(id)` and `products`
//! - [`mutation`] - `addProduct(input)`
//!
//! Every resolver asks the [`ConnectionManager`] for the store before doing
//! I/O, so the first request of a process pays for the connect.

mod mutation;
mod query;
mod types;

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, Schema};

use crate::connection::ConnectionManager;

pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use types::{ProductInput, ProductObject};

/// The GraphQL schema type for the product API.
pub type ProductSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Create the schema, injecting the connection manager as context data.
pub fn build_schema(connection: Arc<ConnectionManager>) -> ProductSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(connection)
        .finish()
}

/// SDL for the product API (no connection needed).
pub fn schema_sdl() -> String {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .finish()
        .sdl()
}

fn connection<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Arc<ConnectionManager>> {
    ctx.data::<Arc<ConnectionManager>>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewProduct, Product};
    use crate::store::{
        Connector, InMemoryProductStore, MemoryConnector, ProductStore, StoreError,
    };
    use async_graphql::{Request, Variables};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    const ADD: &str = "mutation($input: ProductInput!) { addProduct(input: $input) { id name description price imageUrl } }";
    const GET: &str = "query product($id: ID!) { product(id: $id) { id name description price imageUrl } }";
    const LIST: &str = "{ products { id name description price imageUrl } }";

    fn memory_schema() -> (ProductSchema, Arc<InMemoryProductStore>) {
        let store = Arc::new(InMemoryProductStore::new());
        let connector = MemoryConnector::new(store.clone());
        let schema = build_schema(Arc::new(ConnectionManager::new(Arc::new(connector))));
        (schema, store)
    }

    async fn run(schema: &ProductSchema, query: &str, variables: Value) -> (Value, Vec<String>) {
        let response = schema
            .execute(Request::new(query).variables(Variables::from_json(variables)))
            .await;
        let errors = response.errors.iter().map(|e| e.message.clone()).collect();
        (response.data.into_json().unwrap(), errors)
    }

    async fn add(schema: &ProductSchema, input: Value) -> Value {
        let (data, errors) = run(schema, ADD, json!({ "input": input })).await;
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        data["addProduct"].clone()
    }

    fn widget() -> Value {
        json!({
            "name": "Widget",
            "description": "A widget",
            "price": 9.99,
            "imageUrl": "http://x/w.png"
        })
    }

    #[test]
    fn sdl_matches_wire_contract() {
        let sdl = schema_sdl();

        assert!(sdl.contains("type Product {"));
        assert!(sdl.contains("id: ID!"));
        assert!(sdl.contains("price: Float!"));
        assert!(sdl.contains("imageUrl: String!"));
        assert!(sdl.contains("input ProductInput {"));
        assert!(sdl.contains("product(id: ID!): Product\n"));
        assert!(sdl.contains("products: [Product]\n"));
        assert!(sdl.contains("addProduct(input: ProductInput): Product\n"));
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (schema, _) = memory_schema();

        let created = add(&schema, widget()).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(id.len(), 24);
        assert_eq!(created["name"], "Widget");
        assert_eq!(created["description"], "A widget");
        assert_eq!(created["price"], 9.99);
        assert_eq!(created["imageUrl"], "http://x/w.png");

        let (data, errors) = run(&schema, GET, json!({ "id": id })).await;
        assert!(errors.is_empty());
        assert_eq!(data["product"], created);
    }

    #[tokio::test]
    async fn missing_product_is_null_not_error() {
        let (schema, _) = memory_schema();
        add(&schema, widget()).await;

        let (data, errors) = run(&schema, GET, json!({ "id": "000000000000000000000000" })).await;
        assert!(errors.is_empty());
        assert_eq!(data["product"], Value::Null);
    }

    #[tokio::test]
    async fn malformed_id_is_reported() {
        let (schema, _) = memory_schema();

        let (data, errors) = run(&schema, GET, json!({ "id": "nope" })).await;
        assert_eq!(data["product"], Value::Null);
        assert_eq!(errors, vec!["invalid product id 'nope'".to_string()]);
    }

    #[tokio::test]
    async fn products_lists_everything_created() {
        let (schema, _) = memory_schema();

        let mut created = Vec::new();
        for name in ["A", "B", "C"] {
            let mut input = widget();
            input["name"] = json!(name);
            created.push(add(&schema, input).await);
        }

        let (data, errors) = run(&schema, LIST, json!({})).await;
        assert!(errors.is_empty());

        let mut listed = data["products"].as_array().unwrap().clone();
        listed.sort_by_key(|p| p["name"].as_str().unwrap().to_string());
        assert_eq!(listed, created);
    }

    #[tokio::test]
    async fn empty_strings_are_accepted() {
        let (schema, _) = memory_schema();

        let created = add(
            &schema,
            json!({ "name": "", "description": "", "price": 0, "imageUrl": "" }),
        )
        .await;
        assert_eq!(created["name"], "");
        assert_eq!(created["price"], 0.0);
    }

    #[tokio::test]
    async fn missing_input_field_fails_validation_without_write() {
        let (schema, store) = memory_schema();

        let (_, errors) = run(
            &schema,
            ADD,
            json!({ "input": { "name": "Widget", "description": "A widget", "price": 1.0 } }),
        )
        .await;
        assert!(!errors.is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn null_input_is_create_failure() {
        let (schema, store) = memory_schema();

        let (data, errors) = run(&schema, "mutation { addProduct { id } }", json!({})).await;
        assert_eq!(data["addProduct"], Value::Null);
        assert_eq!(errors, vec!["Failed to add product".to_string()]);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn unreachable_store_fails_every_operation() {
        let connector = MemoryConnector::unavailable("connection refused");
        let written = connector.store();
        let schema = build_schema(Arc::new(ConnectionManager::new(Arc::new(connector))));

        for (query, variables) in [
            (GET, json!({ "id": "000000000000000000000000" })),
            (LIST, json!({})),
            (ADD, json!({ "input": widget() })),
        ] {
            let (_, errors) = run(&schema, query, variables).await;
            assert_eq!(errors, vec!["Could not connect to MongoDB".to_string()]);
        }

        assert!(written.is_empty().await);
    }

    #[tokio::test]
    async fn connection_error_has_code_extension() {
        let connector = MemoryConnector::unavailable("down");
        let schema = build_schema(Arc::new(ConnectionManager::new(Arc::new(connector))));

        let response = schema.execute(LIST).await;
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["errors"][0]["extensions"]["code"], "CONNECTION_ERROR");
        assert_eq!(body["data"]["products"], Value::Null);
    }

    struct BrokenInsertStore;

    #[async_trait]
    impl ProductStore for BrokenInsertStore {
        async fn find_by_id(&self, _id: &str) -> Result<Option<Product>, StoreError> {
            Ok(None)
        }

        async fn find_all(&self) -> Result<Vec<Result<Product, StoreError>>, StoreError> {
            Ok(vec![
                Ok(Product {
                    id: "65a1b2c3d4e5f60718293a4b".into(),
                    name: "Widget".into(),
                    description: "A widget".into(),
                    price: 9.99,
                    image_url: "http://x/w.png".into(),
                }),
                Err(StoreError::Decode(
                    "product 65a1b2c3d4e5f60718293a4c has no description".into(),
                )),
            ])
        }

        async fn insert(&self, _product: NewProduct) -> Result<Product, StoreError> {
            Err(StoreError::Decode("E11000 duplicate key error".into()))
        }
    }

    struct BrokenInsertConnector;

    #[async_trait]
    impl Connector for BrokenInsertConnector {
        async fn connect(&self) -> Result<Arc<dyn ProductStore>, StoreError> {
            Ok(Arc::new(BrokenInsertStore))
        }

        fn backend(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn create_failure_hides_cause() {
        let schema = build_schema(Arc::new(ConnectionManager::new(Arc::new(
            BrokenInsertConnector,
        ))));

        let (data, errors) = run(&schema, ADD, json!({ "input": widget() })).await;
        assert_eq!(data["addProduct"], Value::Null);
        assert_eq!(errors, vec!["Failed to add product".to_string()]);
    }

    #[tokio::test]
    async fn unreadable_row_is_null_item() {
        let schema = build_schema(Arc::new(ConnectionManager::new(Arc::new(
            BrokenInsertConnector,
        ))));

        let response = schema.execute(LIST).await;
        let body = serde_json::to_value(&response).unwrap();

        let products = body["data"]["products"].as_array().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0]["name"], "Widget");
        assert_eq!(products[1], Value::Null);

        assert_eq!(response.errors.len(), 1);
        assert_eq!(
            response.errors[0].message,
            "unexpected document shape: product 65a1b2c3d4e5f60718293a4c has no description"
        );
        assert_eq!(body["errors"][0]["extensions"]["code"], "STORE_ERROR");
    }

    #[tokio::test]
    async fn connection_is_reused_across_requests() {
        let store = Arc::new(InMemoryProductStore::new());
        let manager = Arc::new(ConnectionManager::new(Arc::new(MemoryConnector::new(
            store.clone(),
        ))));
        let schema = build_schema(manager.clone());
        assert!(!manager.is_connected());

        add(&schema, widget()).await;
        assert!(manager.is_connected());

        let (data, _) = run(&schema, LIST, json!({})).await;
        assert_eq!(data["products"].as_array().map(Vec::len), Some(1));
        assert_eq!(store.len().await, 1);
    }
}
