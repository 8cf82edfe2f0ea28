//! REST client wrapper: the single gateway for backend calls.
//!
//! Every request goes through [`ApiClient::execute`], which layers two
//! cross-cutting behaviors onto a plain request/response exchange:
//!
//! - outbound: the persisted bearer token, if any, is attached as an
//!   `Authorization` header;
//! - inbound: a 401 response raises the [`UnauthorizedSignal`] once and the
//!   original error is still returned to the caller.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): the transport reports itself unavailable, since these
//! endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers get typed [`ApiError`] results instead of panics. Only 401 is
//! recovered centrally (forced logout); everything else is left to the
//! nearest UI boundary.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::signal::UnauthorizedSignal;
use super::types::{
    ErrorBody, LoginRequest, LoginResponse, MeResponse, RegisterRequest, RegisterResponse,
    VerifyEmailResponse,
};
use crate::util::token_store::TokenStore;

/// HTTP status that triggers the unauthorized broadcast.
pub const STATUS_UNAUTHORIZED: u16 = 401;

/// Failure modes of a backend call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No response was received.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-2xx status.
    #[error("{}", status_error_text(.status, .message))]
    Status {
        status: u16,
        /// Server-provided `error`/`message` text, if any.
        message: Option<String>,
        /// Server-provided per-field messages, if any.
        fields: BTreeMap<String, String>,
    },
    /// A 2xx body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

#[allow(clippy::trivially_copy_pass_by_ref, clippy::ref_option)]
fn status_error_text(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("request failed: {status}"),
    }
}

impl ApiError {
    /// HTTP status, when the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(STATUS_UNAUTHORIZED)
    }

    /// Server-provided message, verbatim.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    /// Server-provided per-field messages; empty for non-status errors.
    #[must_use]
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        match self {
            Self::Status { fields, .. } => fields.clone(),
            Self::Network(_) | Self::Decode(_) => BTreeMap::new(),
        }
    }

    /// Build a status error from a raw non-2xx response body.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        let body: ErrorBody = serde_json::from_str(&response.body).unwrap_or_default();
        Self::Status {
            status: response.status,
            message: body.error.or(body.message).filter(|m| !m.is_empty()),
            fields: body.errors,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Outbound request after interception.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value matching `name` (ASCII case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response: status plus body text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Request/response exchange underneath [`ApiClient`].
///
/// Implementations report only "no response" as an error; any HTTP status,
/// including 4xx/5xx, comes back as an `HttpResponse`.
pub trait Transport: Clone + Send + Sync + 'static {
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, ApiError>>;
}

/// Browser `fetch` transport via `gloo-net`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            use gloo_net::http::Request;

            let mut builder = match request.method {
                Method::Get => Request::get(&request.url),
                Method::Post => Request::post(&request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            let built = match request.body {
                Some(body) => builder.body(body),
                None => builder.build(),
            }
            .map_err(|e| ApiError::Network(e.to_string()))?;
            let resp = built.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Ok(HttpResponse { status, body })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(ApiError::Network("not available on server".to_owned()))
        }
    }
}

/// Single chokepoint for backend calls.
#[derive(Clone, Debug)]
pub struct ApiClient<T, S> {
    transport: T,
    tokens: S,
    unauthorized: UnauthorizedSignal,
    base_url: Arc<str>,
}

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    /// Wire the client to its transport, the token store it reads from, and
    /// the signal it raises on 401.
    pub fn new(transport: T, tokens: S, unauthorized: UnauthorizedSignal, base_url: &str) -> Self {
        Self {
            transport,
            tokens,
            unauthorized,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API-relative `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Build a request, attaching the bearer token when one is stored.
    #[must_use]
    pub fn prepare(&self, method: Method, path: &str, body: Option<String>) -> HttpRequest {
        let mut headers = Vec::new();
        if body.is_some() {
            headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
        }
        if let Some(token) = self.tokens.load() {
            headers.push(("Authorization".to_owned(), bearer_header(&token)));
        }
        HttpRequest { method, url: self.url(path), headers, body }
    }

    /// Send a prepared request and apply inbound interception.
    ///
    /// # Errors
    ///
    /// `Network` when no response arrived, `Status` for any non-2xx status.
    /// A 401 additionally raises the unauthorized signal before returning.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method;
        let url = request.url.clone();
        let resp = self.transport.send(request).await?;
        if resp.status == STATUS_UNAUTHORIZED {
            leptos::logging::warn!("{} {url} rejected with 401; broadcasting unauthorized", method.as_str());
            self.unauthorized.raise();
        }
        if !resp.ok() {
            return Err(ApiError::from_response(&resp));
        }
        Ok(resp)
    }

    async fn request_json<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<R, ApiError> {
        let resp = self.execute(self.prepare(method, path, body)).await?;
        decode_body(&resp.body)
    }

    /// `GET` an API path and decode the JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also `Decode` when the body shape is wrong.
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.request_json(Method::Get, path, None).await
    }

    /// `POST` a JSON payload and decode the JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also `Decode` when the body shape is wrong.
    pub async fn post_json<B: Serialize, R: DeserializeOwned>(&self, path: &str, payload: &B) -> Result<R, ApiError> {
        let body = serde_json::to_string(payload).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request_json(Method::Post, path, Some(body)).await
    }

    /// Fetch the identity behind the stored token via `GET /users/me`.
    ///
    /// # Errors
    ///
    /// Any transport, status, or decode failure.
    pub async fn fetch_me(&self) -> Result<MeResponse, ApiError> {
        self.get_json("/users/me").await
    }

    /// Exchange credentials for a token via `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// `Status` with the server's message for rejected credentials.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post_json("/auth/login", request).await
    }

    /// Create an account via `POST /auth/register`.
    ///
    /// # Errors
    ///
    /// `Status` with the server's message or per-field conflicts.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.post_json("/auth/register", request).await
    }

    /// Confirm an email address via `GET /auth/verify-email?token=...`.
    ///
    /// # Errors
    ///
    /// `Status` when the verification token is invalid or expired.
    pub async fn verify_email(&self, token: &str) -> Result<VerifyEmailResponse, ApiError> {
        self.get_json(&verify_email_path(token)).await
    }
}

fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}

fn verify_email_path(token: &str) -> String {
    format!("/auth/verify-email?token={}", urlencoding::encode(token))
}

fn decode_body<R: DeserializeOwned>(body: &str) -> Result<R, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}
