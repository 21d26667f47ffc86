//! Typed wrappers for the auth-service endpoints.
//!
//! All paths are relative to the API base (`{PUBLIC_API_URL}/api/v1`).

#[cfg(test)]
#[path = "auth_api_test.rs"]
mod auth_api_test;

use serde_json::Value;

use super::api::{ApiClient, DEFAULT_FAILURE_MESSAGE};
use super::transport::Method;
use super::types::{ApiResponse, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest, User};

pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const REGISTER_ENDPOINT: &str = "/auth/register";
pub const LOGOUT_ENDPOINT: &str = "/auth/logout";
pub const REFRESH_ENDPOINT: &str = "/auth/refresh";
pub const ME_ENDPOINT: &str = "/auth/me";

const LOGIN_FAILED_MESSAGE: &str = "Login failed";

#[derive(Clone, Debug)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// `POST /auth/login`.
    pub async fn login(&self, email: &str, password: &str) -> ApiResponse<LoginResponse> {
        let body = LoginRequest { email, password };
        self.client
            .send_json(LOGIN_ENDPOINT, Method::Post, &body, None, LOGIN_FAILED_MESSAGE)
            .await
    }

    /// `POST /auth/register`. The response payload is passed through untyped.
    pub async fn register(&self, request: &RegisterRequest<'_>) -> ApiResponse<Value> {
        self.client
            .send_json(REGISTER_ENDPOINT, Method::Post, request, None, DEFAULT_FAILURE_MESSAGE)
            .await
    }

    /// `POST /auth/logout` with the current access token.
    pub async fn logout(&self, access_token: &str) -> ApiResponse<Value> {
        self.client
            .post(LOGOUT_ENDPOINT, &serde_json::json!({}), Some(access_token))
            .await
    }

    /// `POST /auth/refresh` exchanging a refresh token for a new pair.
    pub async fn refresh(&self, refresh_token: &str) -> ApiResponse<RefreshResponse> {
        self.client
            .post(REFRESH_ENDPOINT, &RefreshRequest { refresh_token }, None)
            .await
    }

    /// `GET /auth/me`.
    pub async fn current_user(&self, access_token: &str) -> ApiResponse<User> {
        self.client.get(ME_ENDPOINT, Some(access_token)).await
    }
}
