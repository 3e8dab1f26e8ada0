//! productql-server: GraphQL product catalog over MongoDB
//!
//! A thin resolver layer exposing one `Product` entity:
//! - `product(id)`, `products` and `addProduct(input)` resolvers
//! - a lazy, single-flight [`ConnectionManager`] shared by all requests
//! - a transport-neutral [`GraphQLGateway`] hosted by axum or AWS Lambda
//!
//! ```text
//! request → host (axum | lambda) → gateway → schema → resolver
//!         → ConnectionManager::ensure_connected() → ProductStore
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod gateway;
pub mod http;
pub mod models;
pub mod schema;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use connection::ConnectionManager;
pub use error::{ProductError, ProductResult, ServerError};
pub use gateway::{GatewayRequest, GatewayResponse, GraphQLGateway};
pub use models::{NewProduct, Product};
pub use schema::{build_schema, schema_sdl, ProductSchema};
pub use state::AppState;
