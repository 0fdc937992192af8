//! WebDAV access-token lifecycle.
//!
//! Tokens are capability-scoped bearer credentials: a secret bound to a path
//! subtree and three independent rights, with an active/suspended status.
//! The client is a thin state-transition trigger — no path syntax or rights
//! validation happens here, and scope enforcement is entirely server-side.

use crate::error::ClientError;
use crate::types::{WebDAVToken, WebDAVTokenRequest};
use crate::NulyunClient;

impl NulyunClient {
    /// List all WebDAV tokens for the current user.
    ///
    /// `GET /webdav/tokens`. The server truncates the secret in list
    /// responses; fetch a single token for the full value.
    pub async fn list_webdav_tokens(&self) -> Result<Vec<WebDAVToken>, ClientError> {
        self.get("/webdav/tokens").await
    }

    /// Get a single WebDAV token by id, including the full secret.
    ///
    /// `GET /webdav/tokens/{id}`.
    pub async fn get_webdav_token(&self, id: u64) -> Result<WebDAVToken, ClientError> {
        self.get(&format!("/webdav/tokens/{}", id)).await
    }

    /// Create a new WebDAV token.
    ///
    /// `POST /webdav/tokens`. The secret is minted server-side at creation
    /// and never rotates afterwards.
    pub async fn create_webdav_token(
        &self,
        request: &WebDAVTokenRequest,
    ) -> Result<WebDAVToken, ClientError> {
        self.post("/webdav/tokens", request).await
    }

    /// Update a WebDAV token's name, path, and rights.
    ///
    /// `PUT /webdav/tokens/{id}`. A full replace of the mutable fields; the
    /// secret and status are untouched.
    pub async fn update_webdav_token(
        &self,
        id: u64,
        request: &WebDAVTokenRequest,
    ) -> Result<WebDAVToken, ClientError> {
        self.put(&format!("/webdav/tokens/{}", id), request).await
    }

    /// Delete a WebDAV token.
    ///
    /// `DELETE /webdav/tokens/{id}`.
    pub async fn delete_webdav_token(&self, id: u64) -> Result<(), ClientError> {
        self.delete(&format!("/webdav/tokens/{}", id)).await
    }

    /// Suspend a WebDAV token.
    ///
    /// `POST /webdav/tokens/{id}/suspend`. Status-only transition;
    /// suspending an already-suspended token is the server's idempotency
    /// decision, not a client-side error.
    pub async fn suspend_webdav_token(&self, id: u64) -> Result<(), ClientError> {
        self.post_empty(&format!("/webdav/tokens/{}/suspend", id))
            .await
    }

    /// Reactivate a suspended WebDAV token.
    ///
    /// `POST /webdav/tokens/{id}/activate`.
    pub async fn activate_webdav_token(&self, id: u64) -> Result<(), ClientError> {
        self.post_empty(&format!("/webdav/tokens/{}/activate", id))
            .await
    }
}
