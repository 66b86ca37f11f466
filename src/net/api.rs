//! REST client for the Fairway API.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning transport errors since these
//! endpoints are only meaningful in the browser.
//!
//! The bearer token is attached per request from the `ApiClient`
//! instance instead of a process-wide default header, so a client built
//! from stale state can never leak credentials into later requests.

#![allow(clippy::unused_async)]

use super::error::ApiError;
use super::types::{
    AuthResponse, Credentials, MeResponse, ProfilePayload, ProfileResponse, RefreshResponse,
    RegisterData,
};

/// Base path of the REST API, fixed at build time.
pub const API_BASE_URL: &str = "/api/v1";

/// One-shot API client carrying the credential for a single operation.
/// Constructed from the session state at each call site.
#[derive(Clone, Debug, Default)]
pub struct ApiClient {
    token: Option<String>,
}

impl ApiClient {
    /// Client for unauthenticated endpoints (login, register, reset).
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    /// Client sending `Authorization: Bearer <token>`.
    pub fn with_token(token: String) -> Self {
        Self { token: Some(token) }
    }

    /// `POST /auth/login`
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = Credentials {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        self.post_json("/auth/login", &body).await
    }

    /// `POST /auth/register`
    pub async fn register(&self, data: &RegisterData) -> Result<AuthResponse, ApiError> {
        self.post_json("/auth/register", data).await
    }

    /// `POST /auth/logout` — the response body is ignored.
    pub async fn logout(&self) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = self
                .authorized(gloo_net::http::Request::post(&url("/auth/logout")))
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            if resp.ok() {
                Ok(())
            } else {
                Err(status_error(resp).await)
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(server_stub())
        }
    }

    /// `GET /auth/me`
    pub async fn current_user(&self) -> Result<MeResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = self
                .authorized(gloo_net::http::Request::get(&url("/auth/me")))
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            decode(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(server_stub())
        }
    }

    /// `POST /auth/refresh`
    pub async fn refresh(&self) -> Result<RefreshResponse, ApiError> {
        self.post_empty("/auth/refresh").await
    }

    /// `PUT /users/profile`
    pub async fn update_profile(
        &self,
        payload: &ProfilePayload,
    ) -> Result<ProfileResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = self
                .authorized(gloo_net::http::Request::put(&url("/users/profile")))
                .json(payload)
                .map_err(|e| ApiError::Network(e.to_string()))?
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            decode(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = payload;
            Err(server_stub())
        }
    }

    /// `POST /auth/request-password-reset`
    pub async fn request_password_reset(&self, email: &str) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let body = serde_json::json!({ "email": email });
            let resp = self
                .authorized(gloo_net::http::Request::post(&url(
                    "/auth/request-password-reset",
                )))
                .json(&body)
                .map_err(|e| ApiError::Network(e.to_string()))?
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            if resp.ok() {
                Ok(())
            } else {
                Err(status_error(resp).await)
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = email;
            Err(server_stub())
        }
    }

    #[cfg(feature = "hydrate")]
    fn authorized(&self, builder: gloo_net::http::RequestBuilder) -> gloo_net::http::RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }

    /// POST a JSON body and decode a typed response.
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        #[cfg(feature = "hydrate")]
        {
            let resp = self
                .authorized(gloo_net::http::Request::post(&url(path)))
                .json(body)
                .map_err(|e| ApiError::Network(e.to_string()))?
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            decode(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (path, body);
            Err(server_stub())
        }
    }

    /// POST with no body (logout, refresh) and decode a typed response.
    async fn post_empty<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        #[cfg(feature = "hydrate")]
        {
            let resp = self
                .authorized(gloo_net::http::Request::post(&url(path)))
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            decode(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = path;
            Err(server_stub())
        }
    }
}

#[cfg(feature = "hydrate")]
fn url(path: &str) -> String {
    format!("{API_BASE_URL}{path}")
}

#[cfg(feature = "hydrate")]
async fn decode<T>(resp: gloo_net::http::Response) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    if !resp.ok() {
        return Err(status_error(resp).await);
    }
    resp.json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(feature = "hydrate")]
async fn status_error(resp: gloo_net::http::Response) -> ApiError {
    let status = resp.status();
    let body = resp
        .json::<serde_json::Value>()
        .await
        .unwrap_or(serde_json::Value::Null);
    ApiError::Status { status, body }
}

#[cfg(not(feature = "hydrate"))]
fn server_stub() -> ApiError {
    ApiError::Network("not available on server".to_owned())
}
