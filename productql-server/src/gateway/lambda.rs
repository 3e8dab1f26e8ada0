//! AWS Lambda adapter for API Gateway HTTP APIs (payload format 2.0)
//!
//! Only the event fields the gateway needs are decoded; everything else in
//! the payload is ignored.

use std::collections::HashMap;

use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use lambda_runtime::{service_fn, LambdaEvent};
use serde::{Deserialize, Serialize};

use super::{GatewayError, GatewayRequest, GatewayResponse, GraphQLGateway};
use crate::error::ServerError;

/// API Gateway v2 proxy event
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayV2Request {
    #[serde(default)]
    pub raw_path: String,
    #[serde(default)]
    pub raw_query_string: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub request_context: RequestContext,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestContext {
    pub http: HttpDescription,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpDescription {
    pub method: String,
    #[serde(default)]
    pub path: String,
}

/// API Gateway v2 proxy response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayV2Response {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl TryFrom<ApiGatewayV2Request> for GatewayRequest {
    type Error = GatewayError;

    fn try_from(event: ApiGatewayV2Request) -> Result<Self, Self::Error> {
        let method = Method::from_bytes(event.request_context.http.method.as_bytes())
            .map_err(|_| GatewayError::MethodNotAllowed)?;

        let mut headers = HeaderMap::new();
        for (name, value) in &event.headers {
            // Headers that are not valid HTTP are dropped, not rejected.
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.insert(name, value);
            }
        }

        let body = match event.body {
            Some(body) if event.is_base64_encoded => BASE64
                .decode(body.as_bytes())
                .map_err(|e| GatewayError::BadRequest(format!("invalid base64 body: {e}")))?,
            Some(body) => body.into_bytes(),
            None => Vec::new(),
        };

        let query = Some(event.raw_query_string).filter(|q| !q.is_empty());

        Ok(Self {
            method,
            headers,
            query,
            body,
        })
    }
}

impl From<GatewayResponse> for ApiGatewayV2Response {
    fn from(response: GatewayResponse) -> Self {
        let headers = response
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        Self {
            status_code: response.status.as_u16(),
            headers,
            body: response.body,
            is_base64_encoded: false,
        }
    }
}

/// Handle one Lambda invocation.
pub async fn handle_event(
    gateway: &GraphQLGateway,
    event: ApiGatewayV2Request,
) -> ApiGatewayV2Response {
    tracing::debug!(
        method = %event.request_context.http.method,
        path = %event.request_context.http.path,
        "lambda invocation"
    );

    let response = match GatewayRequest::try_from(event) {
        Ok(request) => gateway.handle(request).await,
        Err(error) => GatewayResponse::from_error(&error),
    };

    response.into()
}

/// Run the Lambda runtime loop until the environment shuts it down.
pub async fn run_lambda(gateway: GraphQLGateway) -> Result<(), ServerError> {
    tracing::info!("Starting Lambda runtime");

    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<ApiGatewayV2Request>| {
            let gateway = gateway.clone();
            async move {
                Ok::<_, lambda_runtime::Error>(handle_event(&gateway, event.payload).await)
            }
        },
    ))
    .await
    .map_err(ServerError::Lambda)
}
