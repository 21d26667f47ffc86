//! REST client that normalizes every outcome into an [`ApiResponse`] envelope.
//!
//! SYSTEM CONTEXT
//! ==============
//! All auth-service traffic goes through [`ApiClient::request`]. Callers never
//! see a transport error or a panic: failures come back as an envelope whose
//! `error` carries a code (`REQUEST_FAILED`, `NETWORK_ERROR`,
//! `INVALID_RESPONSE`, or whatever the server supplied).
//!
//! TRADE-OFFS
//! ==========
//! One attempt per call. No retry, no timeout, no backoff; a hung request
//! leaves the caller waiting.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::transport::{HttpRequest, HttpResponse, Method, Transport};
use super::types::{ApiError, ApiResponse, INVALID_RESPONSE, NETWORK_ERROR, REQUEST_FAILED};
use crate::config::ClientConfig;

/// Fallback message for a failed request without a usable error body.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Request failed";
/// Error code for a request body that could not be serialized.
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url, transport }
    }

    pub fn from_config(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self::new(config.api_base(), transport)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request against `endpoint` and normalize the outcome.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
        token: Option<&str>,
    ) -> ApiResponse<T> {
        let body = body.map(|value| value.to_string());
        self.send(endpoint, method, body, token, DEFAULT_FAILURE_MESSAGE).await
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, token: Option<&str>) -> ApiResponse<T> {
        self.send(endpoint, Method::Get, None, token, DEFAULT_FAILURE_MESSAGE).await
    }

    pub async fn post<B, T>(&self, endpoint: &str, body: &B, token: Option<&str>) -> ApiResponse<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(endpoint, Method::Post, body, token, DEFAULT_FAILURE_MESSAGE).await
    }

    pub async fn put<B, T>(&self, endpoint: &str, body: &B, token: Option<&str>) -> ApiResponse<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(endpoint, Method::Put, body, token, DEFAULT_FAILURE_MESSAGE).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str, token: Option<&str>) -> ApiResponse<T> {
        self.send(endpoint, Method::Delete, None, token, DEFAULT_FAILURE_MESSAGE).await
    }

    /// Serialize `body` and send it, using `fallback_message` when the server
    /// fails without an explanation.
    pub(crate) async fn send_json<B, T>(
        &self,
        endpoint: &str,
        method: Method,
        body: &B,
        token: Option<&str>,
        fallback_message: &str,
    ) -> ApiResponse<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        match serde_json::to_string(body) {
            Ok(raw) => self.send(endpoint, method, Some(raw), token, fallback_message).await,
            Err(e) => ApiResponse::err(ApiError::new(INVALID_REQUEST, e.to_string())),
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<String>,
        token: Option<&str>,
        fallback_message: &str,
    ) -> ApiResponse<T> {
        let request = build_request(&self.base_url, endpoint, method, body, token);
        log::debug!("api {} {}", method.as_str(), request.url);

        match self.transport.send(request).await {
            Ok(response) => {
                if !response.is_success() {
                    log::debug!("api {} {} -> {}", method.as_str(), endpoint, response.status);
                }
                interpret(&response, fallback_message)
            }
            Err(e) => {
                log::warn!("api {} {} failed: {e}", method.as_str(), endpoint);
                ApiResponse::err(ApiError::new(NETWORK_ERROR, e.to_string()))
            }
        }
    }
}

// =============================================================================
// PURE HELPERS
// =============================================================================

fn join_url(base_url: &str, endpoint: &str) -> String {
    if endpoint.starts_with('/') {
        format!("{base_url}{endpoint}")
    } else {
        format!("{base_url}/{endpoint}")
    }
}

fn build_request(
    base_url: &str,
    endpoint: &str,
    method: Method,
    body: Option<String>,
    token: Option<&str>,
) -> HttpRequest {
    let mut headers = vec![("Content-Type".to_owned(), "application/json".to_owned())];
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        headers.push(("Authorization".to_owned(), format!("Bearer {token}")));
    }
    HttpRequest { method, url: join_url(base_url, endpoint), headers, body }
}

/// Turn a raw HTTP response into an envelope.
fn interpret<T: DeserializeOwned>(response: &HttpResponse, fallback_message: &str) -> ApiResponse<T> {
    if !response.is_success() {
        return ApiResponse::err(failure_error(&response.body, fallback_message));
    }
    match serde_json::from_str::<RawEnvelope>(&response.body) {
        Ok(raw) => raw.into_envelope(fallback_message),
        Err(e) => ApiResponse::err(ApiError::new(INVALID_RESPONSE, e.to_string())),
    }
}

/// Prefer the server's `error` object, then its `message`, then the fallback.
fn failure_error(body: &str, fallback_message: &str) -> ApiError {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return ApiError::new(REQUEST_FAILED, fallback_message);
    };
    if let Some(error) = value.get("error").and_then(|e| server_error(e, fallback_message)) {
        return error;
    }
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(fallback_message);
    ApiError::new(REQUEST_FAILED, message)
}

/// Read a server error object. Only a string `code` is required; a missing
/// `message` takes `fallback_message`, and `details` that is not an object is
/// dropped rather than failing the whole error.
fn server_error(value: &Value, fallback_message: &str) -> Option<ApiError> {
    let code = value.get("code").and_then(Value::as_str)?;
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(fallback_message);
    Some(ApiError {
        code: code.to_owned(),
        message: message.to_owned(),
        details: value.get("details").and_then(Value::as_object).cloned(),
        trace_id: value.get("traceId").and_then(Value::as_str).map(str::to_owned),
    })
}

#[derive(serde::Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    meta: Option<super::types::ResponseMeta>,
}

impl RawEnvelope {
    /// Enforce the exactly-one-of invariant. A `null` payload is accepted
    /// only when `T` itself can be built from `null` (unit, `Value`, ...).
    fn into_envelope<T: DeserializeOwned>(self, fallback_message: &str) -> ApiResponse<T> {
        let meta = self.meta;
        if let Some(raw) = self.error {
            let error = server_error(&raw, fallback_message)
                .unwrap_or_else(|| ApiError::new(INVALID_RESPONSE, format!("unrecognized error object: {raw}")));
            return ApiResponse { data: None, error: Some(error), meta };
        }
        match serde_json::from_value::<T>(self.data) {
            Ok(data) => ApiResponse { data: Some(data), error: None, meta },
            Err(e) => ApiResponse { data: None, error: Some(ApiError::new(INVALID_RESPONSE, e.to_string())), meta },
        }
    }
}
