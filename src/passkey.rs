//! Passkey ceremonies and credential management.
//!
//! Both ceremonies are two-phase begin/finish exchanges. Registration rides
//! the existing authenticated session; login is unauthenticated and is
//! correlated across the two requests by an opaque session ID the server
//! returns in a response header (kept out of the body so it never leaks into
//! ceremony option payloads). Ceremonies are single-attempt: a stale
//! challenge cannot be reused, so no step is ever retried.

use serde_json::Value;

use crate::ceremony::normalize_options;
use crate::error::ClientError;
use crate::types::{PasskeyCredential, PasskeyLoginBegin};
use crate::NulyunClient;

/// Header carrying the ceremony session correlator on login begin/finish.
pub const PASSKEY_SESSION_HEADER: &str = "X-Passkey-Session-ID";

/// Extract the session correlator from a login-begin response's headers.
fn session_id_from_headers(headers: &reqwest::header::HeaderMap) -> Option<String> {
    headers
        .get(PASSKEY_SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

/// Build the registration-finish body: the signed credential with the
/// human-readable name merged in at the top level.
fn registration_finish_body(name: &str, credential: &Value) -> Result<Value, ClientError> {
    let Value::Object(credential) = credential else {
        return Err(ClientError::Protocol(
            "signed credential is not a JSON object".into(),
        ));
    };
    let mut body = credential.clone();
    body.insert("name".to_string(), Value::String(name.to_string()));
    Ok(Value::Object(body))
}

/// Decode a login-finish response body.
///
/// JSON when it parses, `Null` when the body is empty or whitespace, and a
/// bare token string otherwise (older backends answer with the raw JWT).
fn login_finish_body(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}

/// Pull an auth token out of a login-finish response body, if one is there.
///
/// The server answers with either a bare JWT string or an object carrying a
/// `token` field, depending on version. Anything else is returned to the
/// caller unparsed.
fn auth_token_from_body(body: &Value) -> Option<String> {
    match body {
        Value::String(token) if !token.is_empty() => Some(token.clone()),
        Value::Object(map) => map
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string()),
        _ => None,
    }
}

impl NulyunClient {
    // ─── Credential registry ────────────────────────────────────────

    /// List all passkey credentials for the current user.
    ///
    /// `GET /passkeys`.
    pub async fn list_passkeys(&self) -> Result<Vec<PasskeyCredential>, ClientError> {
        self.get("/passkeys").await
    }

    /// Delete a passkey credential by id.
    ///
    /// `DELETE /passkeys/{id}`. Deletion is unconditional by id; whether a
    /// missing id is an error is the server's call.
    pub async fn delete_passkey(&self, id: u64) -> Result<(), ClientError> {
        self.delete(&format!("/passkeys/{}", id)).await
    }

    // ─── Registration ceremony ──────────────────────────────────────

    /// Begin passkey registration for the authenticated user.
    ///
    /// `POST /passkeys/register/begin`. The response is normalized into the
    /// canonical `publicKey` shape before being returned; hand it to the
    /// platform credential API as-is.
    pub async fn begin_passkey_registration(&self) -> Result<Value, ClientError> {
        let options: Value = self.post_empty("/passkeys/register/begin").await?;
        Ok(normalize_options(options))
    }

    /// Finish passkey registration.
    ///
    /// `POST /passkeys/register/finish` with the platform-produced credential
    /// and a human-readable name for the new passkey. On success the server
    /// returns the stored credential record.
    pub async fn finish_passkey_registration(
        &self,
        name: &str,
        credential: &Value,
    ) -> Result<PasskeyCredential, ClientError> {
        let body = registration_finish_body(name, credential)?;
        self.post("/passkeys/register/finish", &body).await
    }

    // ─── Login ceremony ─────────────────────────────────────────────

    /// Begin a passkey login ceremony.
    ///
    /// `POST /passkey/login/begin`, unauthenticated. The session correlator
    /// arrives in the [`PASSKEY_SESSION_HEADER`] response header and is
    /// mandatory: a success response without it fails the attempt with
    /// [`ClientError::MissingSessionId`] before the body is even read, so no
    /// finish request can follow.
    pub async fn begin_passkey_login(&self) -> Result<PasskeyLoginBegin, ClientError> {
        let resp = self.post_raw("/passkey/login/begin").await?;
        if !resp.status().is_success() {
            return Err(Self::error_from_response(resp).await);
        }

        let session_id =
            session_id_from_headers(resp.headers()).ok_or(ClientError::MissingSessionId)?;
        let options: Value = Self::handle_response(resp).await?;

        Ok(PasskeyLoginBegin {
            session_id,
            options: normalize_options(options),
        })
    }

    /// Finish a passkey login ceremony.
    ///
    /// `POST /passkey/login/finish`, echoing the exact correlator from
    /// [`begin_passkey_login`](Self::begin_passkey_login) in the request
    /// header and forwarding the signed assertion verbatim. On success the
    /// server issues a session auth token; when the response carries one it
    /// is stored in the client's auth-token slot. The decoded body is
    /// returned either way (`Null` for an empty body).
    pub async fn finish_passkey_login(
        &self,
        session_id: &str,
        credential: &Value,
    ) -> Result<Value, ClientError> {
        let resp = self
            .request(reqwest::Method::POST, "/passkey/login/finish")
            .await
            .header(PASSKEY_SESSION_HEADER, session_id)
            .json(credential)
            .send()
            .await
            .map_err(ClientError::network)?;

        if !resp.status().is_success() {
            return Err(Self::error_from_response(resp).await);
        }

        // Token responses have come back both as JSON and as a bare JWT
        // body; an empty body decodes to `Null` so callers can tell it
        // apart from a token string.
        let text = resp.text().await.map_err(ClientError::network)?;
        let body = login_finish_body(&text);

        if let Some(token) = auth_token_from_body(&body) {
            self.set_auth_token(Some(token)).await;
        }

        Ok(body)
    }
}
