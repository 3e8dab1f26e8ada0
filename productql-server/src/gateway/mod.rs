//! Gateway - wire request in, GraphQL execution, wire response out
//!
//! Transport-neutral so the axum server and the Lambda adapter share it:
//! - `POST` with a JSON body `{query, variables?, operationName?}`
//! - `GET` with the same fields in the query string (queries only)
//! - anything else is 405
//!
//! Executed operations always answer 200; the GraphQL `errors` array carries
//! resolver failures. Requests that never reach the executor get a 4xx with a
//! GraphQL-shaped error body.

pub mod lambda;

use async_graphql::parser::types::{DocumentOperations, OperationType};
use async_graphql::Variables;
use axum::extract::Query;
use axum::http::header::{ALLOW, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

use crate::schema::ProductSchema;

const APPLICATION_JSON: &str = "application/json";

/// Requests rejected before execution
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    BadRequest(String),

    #[error("GraphQL only supports GET and POST requests.")]
    MethodNotAllowed,

    #[error("Can only perform a mutation operation from a POST request.")]
    MutationOverGet,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed | Self::MutationOverGet => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

/// A decoded wire-level request
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub method: Method,
    pub headers: HeaderMap,
    /// Raw query string without the leading `?`
    pub query: Option<String>,
    pub body: Vec<u8>,
}

/// A wire-level response ready for the host to send
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl GatewayResponse {
    fn json(status: StatusCode, body: String) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        Self {
            status,
            headers,
            body,
        }
    }

    /// GraphQL-shaped error body for a rejected request.
    pub fn from_error(error: &GatewayError) -> Self {
        let body = json!({ "errors": [{ "message": error.to_string() }] }).to_string();
        let mut response = Self::json(error.status(), body);

        if matches!(error, GatewayError::MethodNotAllowed | GatewayError::MutationOverGet) {
            response
                .headers
                .insert(ALLOW, HeaderValue::from_static("GET, POST"));
        }

        response
    }
}

impl IntoResponse for GatewayResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}

/// GET parameters, GraphQL-over-HTTP naming
#[derive(Debug, Deserialize)]
struct GetParams {
    query: Option<String>,
    variables: Option<String>,
    #[serde(rename = "operationName")]
    operation_name: Option<String>,
}

/// Executes wire requests against the product schema.
#[derive(Clone)]
pub struct GraphQLGateway {
    schema: ProductSchema,
}

impl GraphQLGateway {
    pub fn new(schema: ProductSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &ProductSchema {
        &self.schema
    }

    /// Handle one request. Never fails: every outcome is a response.
    pub async fn handle(&self, request: GatewayRequest) -> GatewayResponse {
        let operation = match decode(&request) {
            Ok(operation) => operation,
            Err(error) => {
                tracing::debug!(%error, method = %request.method, "request rejected");
                return GatewayResponse::from_error(&error);
            }
        };

        let response = self.schema.execute(operation).await;
        if response.is_err() {
            tracing::debug!(errors = response.errors.len(), "operation finished with errors");
        }

        match serde_json::to_string(&response) {
            Ok(body) => GatewayResponse::json(StatusCode::OK, body),
            Err(e) => {
                tracing::error!(error = %e, "failed to encode GraphQL response");
                let body = json!({ "errors": [{ "message": "failed to encode response" }] });
                GatewayResponse::json(StatusCode::INTERNAL_SERVER_ERROR, body.to_string())
            }
        }
    }
}

fn decode(request: &GatewayRequest) -> Result<async_graphql::Request, GatewayError> {
    match request.method {
        Method::POST => decode_post(request),
        Method::GET => decode_get(request),
        _ => Err(GatewayError::MethodNotAllowed),
    }
}

fn decode_post(request: &GatewayRequest) -> Result<async_graphql::Request, GatewayError> {
    let content_type = request
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !content_type.starts_with(APPLICATION_JSON) {
        return Err(GatewayError::BadRequest(format!(
            "POST requests must use content-type {APPLICATION_JSON}"
        )));
    }

    if request.body.is_empty() {
        return Err(GatewayError::BadRequest("POST body missing".into()));
    }

    serde_json::from_slice(&request.body)
        .map_err(|e| GatewayError::BadRequest(format!("invalid GraphQL request body: {e}")))
}

fn decode_get(request: &GatewayRequest) -> Result<async_graphql::Request, GatewayError> {
    let uri: Uri = format!("/?{}", request.query.as_deref().unwrap_or_default())
        .parse()
        .map_err(|_| GatewayError::BadRequest("malformed query string".into()))?;

    let Query(params) = Query::<GetParams>::try_from_uri(&uri)
        .map_err(|e| GatewayError::BadRequest(e.body_text()))?;

    let query = params
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| GatewayError::BadRequest("GET query missing".into()))?;

    if is_mutation(&query, params.operation_name.as_deref()) {
        return Err(GatewayError::MutationOverGet);
    }

    let mut operation = async_graphql::Request::new(query);

    if let Some(raw) = params.variables {
        let value: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| GatewayError::BadRequest(format!("variables are not valid JSON: {e}")))?;
        operation = operation.variables(Variables::from_json(value));
    }

    if let Some(name) = params.operation_name {
        operation = operation.operation_name(name);
    }

    Ok(operation)
}

/// Whether the selected operation is a mutation. Unparseable documents are
/// left to the executor to report.
fn is_mutation(query: &str, operation_name: Option<&str>) -> bool {
    let Ok(document) = async_graphql::parser::parse_query(query) else {
        return false;
    };

    match (&document.operations, operation_name) {
        (DocumentOperations::Single(op), _) => op.node.ty == OperationType::Mutation,
        (DocumentOperations::Multiple(ops), Some(name)) => ops
            .iter()
            .any(|(n, op)| n.as_str() == name && op.node.ty == OperationType::Mutation),
        (DocumentOperations::Multiple(_), None) => false,
    }
}
