//! Request and response types for the Nulyun client.
//!
//! Well-known shapes are typed camelCase structs; heterogeneous payloads
//! (ceremony options, signed credentials) stay `serde_json::Value` and are
//! forwarded verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Passkeys ───────────────────────────────────────────────────────

/// A registered passkey credential, as listed by `GET /passkeys`.
///
/// Timestamps are preformatted display strings on this endpoint; the client
/// observes them read-only and never parses them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasskeyCredential {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub last_used_at: String,
}

/// Result of a successful login-begin call: the session correlator from the
/// `X-Passkey-Session-ID` response header plus the normalized ceremony
/// options to hand to the platform credential API.
///
/// The correlator is opaque; it must be echoed unmodified on the finish call
/// and lives only as long as this one ceremony attempt.
#[derive(Debug, Clone)]
pub struct PasskeyLoginBegin {
    pub session_id: String,
    pub options: serde_json::Value,
}

// ─── WebDAV tokens ──────────────────────────────────────────────────

/// Status of a WebDAV access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStatus {
    Active,
    Suspended,
}

impl TokenStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// A capability-scoped WebDAV access token.
///
/// The `token` secret is issued once at creation and never rotates; update
/// and status transitions leave it untouched. List responses truncate it
/// server-side, so only `create` and `get` return the full value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebDAVToken {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    pub token: String,
    /// Filesystem subtree the token is scoped to.
    pub path: String,
    pub can_read: bool,
    pub can_write: bool,
    pub can_delete: bool,
    pub status: TokenStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WebDAVToken {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Whether this token grants every requested right.
    ///
    /// A suspended token grants nothing. The rights are independent bits; a
    /// token with all three false is valid but grants no access.
    pub fn has_permission(&self, read: bool, write: bool, delete: bool) -> bool {
        if !self.is_active() {
            return false;
        }
        if read && !self.can_read {
            return false;
        }
        if write && !self.can_write {
            return false;
        }
        if delete && !self.can_delete {
            return false;
        }
        true
    }
}

/// Shared request body for `POST /webdav/tokens` and `PUT /webdav/tokens/{id}`.
///
/// Update is a full replace of the mutable fields, not a partial patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebDAVTokenRequest {
    pub name: String,
    pub path: String,
    pub can_read: bool,
    pub can_write: bool,
    pub can_delete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn passkey_credential_deser() {
        let v = json!({
            "id": 3,
            "name": "YubiKey",
            "createdAt": "2024-05-01 10:30:00",
            "lastUsedAt": "2024-06-12 08:15:42"
        });
        let cred: PasskeyCredential = serde_json::from_value(v).unwrap();
        assert_eq!(cred.id, 3);
        assert_eq!(cred.name, "YubiKey");
        assert_eq!(cred.created_at, "2024-05-01 10:30:00");
    }

    #[test]
    fn token_status_serde() {
        assert_eq!(serde_json::to_value(TokenStatus::Active).unwrap(), "active");
        assert_eq!(
            serde_json::to_value(TokenStatus::Suspended).unwrap(),
            "suspended"
        );
        let s: TokenStatus = serde_json::from_value(json!("suspended")).unwrap();
        assert!(!s.is_active());
    }

    fn sample_token(status: TokenStatus) -> WebDAVToken {
        WebDAVToken {
            id: 1,
            user_id: 7,
            name: "backup".into(),
            token: "secret-value".into(),
            path: "/docs".into(),
            can_read: true,
            can_write: false,
            can_delete: false,
            status,
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            updated_at: "2024-01-02T00:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn webdav_token_deser() {
        let v = json!({
            "id": 1,
            "userId": 7,
            "name": "backup",
            "token": "secret-value",
            "path": "/docs",
            "canRead": true,
            "canWrite": false,
            "canDelete": false,
            "status": "active",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        });
        let token: WebDAVToken = serde_json::from_value(v).unwrap();
        assert_eq!(token, sample_token(TokenStatus::Active));
    }

    #[test]
    fn has_permission_requires_active() {
        let token = sample_token(TokenStatus::Active);
        assert!(token.has_permission(true, false, false));
        assert!(!token.has_permission(true, true, false));
        assert!(!token.has_permission(false, false, true));
        // Requesting nothing always passes on an active token.
        assert!(token.has_permission(false, false, false));

        let suspended = sample_token(TokenStatus::Suspended);
        assert!(!suspended.has_permission(false, false, false));
        assert!(!suspended.has_permission(true, false, false));
    }

    #[test]
    fn token_request_ser() {
        let req = WebDAVTokenRequest {
            name: "a".into(),
            path: "/docs".into(),
            can_read: true,
            can_write: false,
            can_delete: false,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["name"], "a");
        assert_eq!(v["path"], "/docs");
        assert_eq!(v["canRead"], true);
        assert_eq!(v["canWrite"], false);
        assert_eq!(v["canDelete"], false);
    }
}
