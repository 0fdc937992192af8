//! Client error types.
//!
//! Maps HTTP status codes to typed error variants, plus the two protocol
//! errors that can occur during a passkey ceremony (missing session
//! correlator, malformed ceremony payload).

use std::fmt;

/// Errors that can occur when using the Nulyun client.
///
/// The backend returns plain-text error bodies, so each HTTP variant carries
/// only a `message`. Protocol errors are client-detected conditions that make
/// a ceremony attempt unfinishable; they are surfaced, never recovered.
#[derive(Debug, Clone)]
pub enum ClientError {
    /// Network-level error (DNS, connection refused, timeout, TLS).
    Network(String),

    /// 400 Bad Request — invalid input.
    BadRequest { message: String },

    /// 401 Unauthorized — missing or invalid credentials.
    Unauthorized { message: String },

    /// 403 Forbidden — feature disabled or resource owned by another user.
    Forbidden { message: String },

    /// 404 Not Found — endpoint or resource doesn't exist.
    NotFound { message: String },

    /// Any other non-success status.
    Server { status: u16, message: String },

    /// Failed to deserialize the response body.
    Deserialization(String),

    /// Login-begin response did not carry the `X-Passkey-Session-ID` header.
    ///
    /// The correlator is mandatory: without it the finish step cannot be
    /// issued, so the whole attempt fails here.
    MissingSessionId,

    /// Malformed or unrecognizable ceremony payload.
    Protocol(String),
}

impl ClientError {
    /// Create a network error from a reqwest error.
    pub fn network(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }

    /// Get the HTTP status code, if applicable.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            Self::Network(msg) => msg,
            Self::BadRequest { message } => message,
            Self::Unauthorized { message } => message,
            Self::Forbidden { message } => message,
            Self::NotFound { message } => message,
            Self::Server { message, .. } => message,
            Self::Deserialization(msg) => msg,
            Self::MissingSessionId => "no session ID in login-begin response",
            Self::Protocol(msg) => msg,
        }
    }

    /// Returns `true` if this is an authentication error (401).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` if this is a network-level error.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Returns `true` if this is a ceremony protocol violation.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::MissingSessionId | Self::Protocol(_))
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::BadRequest { message } => write!(f, "Bad Request: {}", message),
            Self::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            Self::Forbidden { message } => write!(f, "Forbidden: {}", message),
            Self::NotFound { message } => write!(f, "Not Found: {}", message),
            Self::Server { status, message } => {
                write!(f, "Server Error ({}): {}", status, message)
            }
            Self::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
            Self::MissingSessionId => {
                write!(f, "Protocol error: no session ID in login-begin response")
            }
            Self::Protocol(msg) => write!(f, "Protocol error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}
