//! # Nulyun Client SDK
//!
//! Headless Rust client for the Nulyun file-hosting API. Provides typed
//! async methods for passkey (WebAuthn) authentication and WebDAV
//! access-token management, with automatic cookie-jar handling and an
//! auth-token slot populated on successful login.
//!
//! The actual credential creation/signing step is the platform's job: the
//! client hands the normalized ceremony options to an external credential
//! API and forwards whatever opaque signed value it gets back. No WebAuthn
//! cryptography happens here.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nulyun_client::{ClientOptions, NulyunClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = NulyunClient::new(ClientOptions {
//!         base_url: "https://files.example.com".into(),
//!         ..Default::default()
//!     });
//!
//!     // Begin a passkey login; hand `begin.options` to the platform
//!     // credential API, then echo the correlator on finish.
//!     let begin = client.begin_passkey_login().await?;
//!     let assertion = sign_with_platform(&begin.options);
//!     client.finish_passkey_login(&begin.session_id, &assertion).await?;
//!
//!     // Authenticated from here on.
//!     let tokens = client.list_webdav_tokens().await?;
//!     println!("{} tokens", tokens.len());
//!     Ok(())
//! }
//! # fn sign_with_platform(_: &serde_json::Value) -> serde_json::Value { unimplemented!() }
//! ```

mod ceremony;
mod error;
mod passkey;
mod types;
mod webdav;

pub use ceremony::*;
pub use error::*;
pub use passkey::*;
pub use types::*;

use std::sync::Arc;
use tokio::sync::RwLock;

/// Header carrying the session auth token (JWT) on authenticated requests.
pub const AUTH_HEADER: &str = "X-Auth";

// ─── Client Options ────────────────────────────────────────────────

/// Configuration for the Nulyun client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the server (e.g. `https://files.example.com`).
    pub base_url: String,

    /// Base path for API endpoints (default: `/api`).
    pub base_path: String,

    /// Optional auth token to start with. If unset, the client is anonymous
    /// until a passkey login succeeds.
    pub auth_token: Option<String>,

    /// HTTP request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            base_path: "/api".to_string(),
            auth_token: None,
            timeout_secs: 30,
        }
    }
}

// ─── Client ────────────────────────────────────────────────────────

/// Headless async HTTP client for a Nulyun server.
///
/// Every operation is a single outstanding request: the caller suspends at
/// the await point and resumes with a decoded response or a [`ClientError`].
/// Nothing is retried, cached, or logged internally, and concurrent ceremony
/// attempts are independent — each owns its own correlator.
#[derive(Clone)]
pub struct NulyunClient {
    http: reqwest::Client,
    base_url: String,
    options: ClientOptions,
    auth_token: Arc<RwLock<Option<String>>>,
}

impl NulyunClient {
    /// Create a new client with the given options.
    pub fn new(options: ClientOptions) -> Self {
        let cookie_store = Arc::new(reqwest::cookie::Jar::default());

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .cookie_provider(cookie_store)
            .timeout(std::time::Duration::from_secs(options.timeout_secs))
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let base_url = format!(
            "{}{}",
            options.base_url.trim_end_matches('/'),
            options.base_path
        );

        Self {
            http,
            base_url,
            auth_token: Arc::new(RwLock::new(options.auth_token.clone())),
            options,
        }
    }

    /// Replace the auth token, returning the client for chaining.
    ///
    /// The token slot is fresh, not shared with the client this was cloned
    /// from.
    pub fn with_token(mut self, token: &str) -> Self {
        self.auth_token = Arc::new(RwLock::new(Some(token.to_string())));
        self
    }

    /// Set or clear the auth token used on subsequent requests.
    pub async fn set_auth_token(&self, token: Option<String>) {
        *self.auth_token.write().await = token;
    }

    /// The auth token currently in use, if any.
    pub async fn auth_token(&self) -> Option<String> {
        self.auth_token.read().await.clone()
    }

    /// Get a reference to the underlying `reqwest::Client`.
    pub fn http_client(&self) -> &reqwest::Client {
        &self.http
    }

    /// Get the options this client was created with.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Get the full base URL (base_url + base_path).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ─── Internal helpers ───────────────────────────────────────────

    /// Build a full URL for the given endpoint path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request builder with the auth header attached when present.
    pub(crate) async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, self.url(path));
        if let Some(token) = self.auth_token.read().await.as_ref() {
            req = req.header(AUTH_HEADER, token);
        }
        req
    }

    /// Send a GET request and deserialize the response.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let resp = self
            .request(reqwest::Method::GET, path)
            .await
            .send()
            .await
            .map_err(ClientError::network)?;
        Self::handle_response(resp).await
    }

    /// Send a POST request with a JSON body and deserialize the response.
    pub(crate) async fn post<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .request(reqwest::Method::POST, path)
            .await
            .json(body)
            .send()
            .await
            .map_err(ClientError::network)?;
        Self::handle_response(resp).await
    }

    /// Send a POST request without a body.
    pub(crate) async fn post_empty<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let resp = self
            .request(reqwest::Method::POST, path)
            .await
            .send()
            .await
            .map_err(ClientError::network)?;
        Self::handle_response(resp).await
    }

    /// Send a POST request and return the raw response.
    ///
    /// Used by the login-begin path, which must read the session correlator
    /// from the response headers before consuming the body.
    pub(crate) async fn post_raw(&self, path: &str) -> Result<reqwest::Response, ClientError> {
        self.request(reqwest::Method::POST, path)
            .await
            .send()
            .await
            .map_err(ClientError::network)
    }

    /// Send a PUT request with a JSON body and deserialize the response.
    pub(crate) async fn put<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .request(reqwest::Method::PUT, path)
            .await
            .json(body)
            .send()
            .await
            .map_err(ClientError::network)?;
        Self::handle_response(resp).await
    }

    /// Send a DELETE request; the response body, if any, is ignored.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let resp = self
            .request(reqwest::Method::DELETE, path)
            .await
            .send()
            .await
            .map_err(ClientError::network)?;
        Self::expect_success(resp).await
    }

    /// Handle an HTTP response, mapping status codes to errors.
    pub(crate) async fn handle_response<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        if !resp.status().is_success() {
            return Err(Self::error_from_response(resp).await);
        }

        let body = resp.text().await.map_err(ClientError::network)?;
        // 204 and bare-status responses arrive with an empty body; unit and
        // Option targets deserialize from `null`.
        let body = if body.is_empty() { "null" } else { &body };
        serde_json::from_str(body).map_err(|e| {
            ClientError::Deserialization(format!(
                "failed to deserialize response: {} (body: {})",
                e,
                truncate_on_char_boundary(body, 200)
            ))
        })
    }

    /// Consume a response where only the status matters.
    pub(crate) async fn expect_success(resp: reqwest::Response) -> Result<(), ClientError> {
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from_response(resp).await)
        }
    }

    /// Map a non-success response to a [`ClientError`].
    ///
    /// The backend renders errors as plain text, so the body is carried as
    /// the message verbatim.
    pub(crate) async fn error_from_response(resp: reqwest::Response) -> ClientError {
        let status = resp.status();
        let message = match resp.text().await {
            Ok(body) if !body.is_empty() => body,
            _ => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };

        match status.as_u16() {
            400 => ClientError::BadRequest { message },
            401 => ClientError::Unauthorized { message },
            403 => ClientError::Forbidden { message },
            404 => ClientError::NotFound { message },
            s => ClientError::Server { status: s, message },
        }
    }
}

/// Truncate to at most `max` bytes without splitting a UTF-8 sequence.
///
/// Error messages quote a prefix of the offending body; the body is
/// arbitrary text (a proxy may answer 200 with an HTML page), so the cut
/// must land on a char boundary.
fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

impl std::fmt::Debug for NulyunClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NulyunClient")
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
