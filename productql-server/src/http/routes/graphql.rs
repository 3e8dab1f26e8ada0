//! GraphQL endpoint

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::routing::any;
use axum::Router;

use crate::gateway::{GatewayRequest, GatewayResponse};
use crate::state::AppState;

/// ANY /graphql - method checks happen in the gateway
async fn graphql(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> GatewayResponse {
    let request = GatewayRequest {
        method,
        headers,
        query: uri.query().map(str::to_owned),
        body: body.to_vec(),
    };

    state.gateway().handle(request).await
}

/// GraphQL routes
pub fn router() -> Router<AppState> {
    Router::new().route("/graphql", any(graphql))
}
