//! Normalizer property tests.
//!
//! Covers: envelope precedence, the legacy field-rename table, canonical
//! precedence, pass-through, and idempotence.

use nulyun_client::{normalize_options, CeremonyOptions, WireFormat};
use serde_json::json;

// ── Envelope handling ───────────────────────────────────────────

#[test]
fn public_key_envelope_beats_response() {
    let input = json!({
        "PublicKey": {"Challenge": "from-public-key"},
        "Response": {"Challenge": "from-response"}
    });
    let out = normalize_options(input);

    let map = out.as_object().unwrap();
    assert_eq!(map.len(), 1, "exactly one envelope key should remain");
    assert_eq!(out["publicKey"]["challenge"], "from-public-key");
}

#[test]
fn response_envelope_beats_lowercase_response() {
    let input = json!({
        "Response": {"Challenge": "legacy"},
        "response": {"challenge": "canonical"}
    });
    let out = normalize_options(input);
    assert_eq!(out["publicKey"]["challenge"], "legacy");
    assert!(out.get("response").is_none());
}

#[test]
fn canonical_envelope_is_renamed_only() {
    let input = json!({
        "response": {
            "challenge": "c",
            "rp": {"id": "example.com", "name": "Example"},
            "timeout": 60000
        }
    });
    let out = normalize_options(input);
    assert_eq!(out["publicKey"]["challenge"], "c");
    assert_eq!(out["publicKey"]["rp"]["name"], "Example");
    assert_eq!(out["publicKey"]["timeout"], 60000);
}

// ── Field-rename table ──────────────────────────────────────────

#[test]
fn worked_example_from_legacy_response() {
    let out = normalize_options(json!({"Response": {"Challenge": "c1", "RP": {"id": "x"}}}));

    assert_eq!(out["publicKey"]["challenge"], "c1");
    assert_eq!(out["publicKey"]["rp"]["id"], "x");
    assert!(out.get("Response").is_none());
    assert!(out["publicKey"].get("Challenge").is_none());
    assert!(out["publicKey"].get("RP").is_none());
}

#[test]
fn canonical_field_preserved_over_legacy() {
    let out = normalize_options(json!({
        "PublicKey": {
            "challenge": "canonical-wins",
            "Challenge": "legacy-loses",
            "timeout": 1000,
            "Timeout": 9999
        }
    }));
    assert_eq!(out["publicKey"]["challenge"], "canonical-wins");
    assert_eq!(out["publicKey"]["timeout"], 1000);
    assert!(out["publicKey"].get("Challenge").is_none());
    assert!(out["publicKey"].get("Timeout").is_none());
}

#[test]
fn nested_user_id_renamed() {
    let out = normalize_options(json!({
        "PublicKey": {"User": {"ID": "dXNlci0x", "name": "alice"}}
    }));
    assert_eq!(out["publicKey"]["user"]["id"], "dXNlci0x");
    assert_eq!(out["publicKey"]["user"]["name"], "alice");
    assert!(out["publicKey"]["user"].get("ID").is_none());
}

#[test]
fn unmapped_fields_survive() {
    let out = normalize_options(json!({
        "Response": {"Challenge": "c", "hints": ["client-device"]}
    }));
    assert_eq!(out["publicKey"]["hints"][0], "client-device");
}

// ── Pass-through and idempotence ────────────────────────────────

#[test]
fn pass_through_is_byte_for_byte() {
    let input = json!({
        "publicKey": {"challenge": "c", "rp": {"id": "x"}},
        "mediation": "conditional"
    });
    let serialized_before = serde_json::to_string(&input).unwrap();
    let out = normalize_options(input.clone());
    assert_eq!(out, input);
    assert_eq!(serde_json::to_string(&out).unwrap(), serialized_before);
}

#[test]
fn double_normalization_is_stable() {
    let inputs = [
        json!({"PublicKey": {"Challenge": "a", "RP": {"id": "r"}}}),
        json!({"Response": {"Challenge": "b", "User": {"ID": "u"}}}),
        json!({"response": {"challenge": "c"}}),
        json!({"something": "else"}),
    ];
    for input in inputs {
        let once = normalize_options(input);
        let twice = normalize_options(once.clone());
        assert_eq!(once, twice);
    }
}

#[test]
fn detect_matches_normalizer_behavior() {
    assert_eq!(
        WireFormat::detect(&json!({"PublicKey": {}})),
        WireFormat::LegacyPublicKey
    );
    assert_eq!(WireFormat::LegacyPublicKey.envelope_key(), Some("PublicKey"));
    assert_eq!(WireFormat::Unknown.envelope_key(), None);
}

// ── Typed view ──────────────────────────────────────────────────

#[test]
fn typed_options_from_full_legacy_payload() {
    let out = normalize_options(json!({
        "PublicKey": {
            "Challenge": "Y2hhbGxlbmdl",
            "RelyingParty": {"id": "files.example.com", "name": "Nulyun"},
            "User": {"ID": "MQ", "name": "alice", "displayName": "Alice"},
            "Parameters": [{"type": "public-key", "alg": -7}],
            "CredentialExcludeList": [
                {"type": "public-key", "id": "ZXhpc3Rpbmc", "transports": ["usb"]}
            ],
            "Attestation": "none",
            "Timeout": 60000
        }
    }));

    let opts = CeremonyOptions::from_value(&out).unwrap();
    assert_eq!(opts.challenge, "Y2hhbGxlbmdl");
    assert_eq!(opts.rp.id.as_deref(), Some("files.example.com"));
    let user = opts.user.unwrap();
    assert_eq!(user.name.as_deref(), Some("alice"));
    assert_eq!(user.display_name.as_deref(), Some("Alice"));
    let params = opts.pub_key_cred_params.unwrap();
    assert_eq!(params[0].alg, -7);
    let excluded = opts.exclude_credentials.unwrap();
    assert_eq!(excluded[0].transports.as_ref().unwrap()[0], "usb");
    assert_eq!(opts.attestation.as_deref(), Some("none"));
}

#[test]
fn typed_options_login_shape_has_no_user() {
    // Login-begin payloads carry no user entity.
    let out = normalize_options(json!({
        "response": {"challenge": "c", "rp": {"id": "x"}, "timeout": 30000}
    }));
    let opts = CeremonyOptions::from_value(&out).unwrap();
    assert!(opts.user.is_none());
    assert_eq!(opts.timeout, Some(30000));
}
