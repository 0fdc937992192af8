//! Ceremony options normalization.
//!
//! The ceremony-begin endpoints have shipped more than one response shape
//! over time: an older convention nests the options under a capitalized
//! `PublicKey` or `Response` key with capitalized field names, while the
//! current one uses `response` with the lower-camel field names the platform
//! credential API expects. [`normalize_options`] reconciles all of them into
//! a single `publicKey` envelope with canonical field names.
//!
//! This is a best-effort compatibility shim, not a validator: an input with
//! no recognizable envelope is returned untouched, and the `challenge` value
//! is treated as an opaque base64url string — it is never decoded here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope conventions the backend has shipped for ceremony-begin responses.
///
/// Detection is ordered: `PublicKey` wins over `Response`, which wins over
/// `response`. Anything else is [`WireFormat::Unknown`] and passes through
/// unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// `{ "PublicKey": { "Challenge": ..., ... } }`
    LegacyPublicKey,
    /// `{ "Response": { "Challenge": ..., ... } }`
    LegacyResponse,
    /// `{ "response": { "challenge": ..., ... } }`
    Canonical,
    /// No recognizable envelope key.
    Unknown,
}

impl WireFormat {
    /// Detect the wire format of a ceremony-begin response body.
    pub fn detect(options: &Value) -> Self {
        let Some(map) = options.as_object() else {
            return Self::Unknown;
        };
        if map.contains_key("PublicKey") {
            Self::LegacyPublicKey
        } else if map.contains_key("Response") {
            Self::LegacyResponse
        } else if map.contains_key("response") {
            Self::Canonical
        } else {
            Self::Unknown
        }
    }

    /// The envelope key this format nests the options under, if any.
    pub fn envelope_key(&self) -> Option<&'static str> {
        match self {
            Self::LegacyPublicKey => Some("PublicKey"),
            Self::LegacyResponse => Some("Response"),
            Self::Canonical => Some("response"),
            Self::Unknown => None,
        }
    }
}

/// Ordered legacy → canonical field renames, applied first-match-wins.
///
/// A canonical field is only ever written when absent; a legacy value never
/// overwrites an already-present canonical one.
const FIELD_RENAMES: &[(&str, &str)] = &[
    ("Challenge", "challenge"),
    ("RelyingParty", "rp"),
    ("RP", "rp"),
    ("User", "user"),
    ("Parameters", "pubKeyCredParams"),
    ("PubKeyCredParams", "pubKeyCredParams"),
    ("CredentialExcludeList", "excludeCredentials"),
    ("ExcludeCredentials", "excludeCredentials"),
    ("AuthenticatorSelection", "authenticatorSelection"),
    ("Attestation", "attestation"),
    ("Timeout", "timeout"),
];

/// Normalize a ceremony-begin response into the canonical shape.
///
/// Whichever envelope key [`WireFormat::detect`] finds is promoted to a
/// single `publicKey` field (all three alternates are removed so downstream
/// consumers see exactly one), and the legacy field names inside it are
/// renamed per [`FIELD_RENAMES`]. Unknown shapes pass through unchanged;
/// this function never fails.
pub fn normalize_options(mut options: Value) -> Value {
    let format = WireFormat::detect(&options);
    let Some(envelope_key) = format.envelope_key() else {
        return options;
    };

    if let Some(map) = options.as_object_mut() {
        if let Some(inner) = map.remove(envelope_key) {
            // Remove the alternates so exactly one envelope remains.
            map.remove("PublicKey");
            map.remove("Response");
            map.remove("response");
            map.insert("publicKey".to_string(), normalize_fields(inner));
        }
    }

    options
}

/// Apply the field-rename table to the unwrapped options object.
fn normalize_fields(mut inner: Value) -> Value {
    if let Some(map) = inner.as_object_mut() {
        for (legacy, canonical) in FIELD_RENAMES {
            let Some(value) = map.remove(*legacy) else {
                continue;
            };
            if !map.contains_key(*canonical) {
                map.insert((*canonical).to_string(), value);
            }
        }

        // The legacy user object nests its id under `ID`.
        if let Some(user) = map.get_mut("user").and_then(Value::as_object_mut) {
            if let Some(id) = user.remove("ID") {
                if !user.contains_key("id") {
                    user.insert("id".to_string(), id);
                }
            }
        }
    }

    inner
}

// ─── Typed canonical view ──────────────────────────────────────────

/// Canonical ceremony options, as consumed by the platform credential API.
///
/// Registration responses carry `user` and `excludeCredentials`; login
/// responses omit them. All fields besides the challenge and relying party
/// are optional on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CeremonyOptions {
    /// Opaque base64url challenge. Never decoded client-side.
    pub challenge: String,
    pub rp: RelyingParty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<CeremonyUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_key_cred_params: Option<Vec<PubKeyCredParam>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_credentials: Option<Vec<CredentialDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_selection: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attestation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl CeremonyOptions {
    /// Best-effort typed view of a normalized options value.
    ///
    /// Accepts either the full envelope (`{ "publicKey": { ... } }`) or the
    /// bare options object. Returns `None` when the shape doesn't parse;
    /// callers forwarding the raw value to the credential API don't need it.
    pub fn from_value(options: &Value) -> Option<Self> {
        let inner = options.get("publicKey").unwrap_or(options);
        serde_json::from_value(inner.clone()).ok()
    }
}

/// Relying party identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelyingParty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// User entity for a registration ceremony.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CeremonyUser {
    /// Base64url-encoded user handle.
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Supported credential algorithm entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubKeyCredParam {
    #[serde(rename = "type")]
    pub ty: String,
    pub alg: i64,
}

/// Descriptor of an existing credential (exclude/allow lists).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialDescriptor {
    #[serde(rename = "type")]
    pub ty: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transports: Option<Vec<String>>,
}
