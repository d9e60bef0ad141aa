//! Webhook signature verification
//!
//! Abstract signs webhook deliveries with HMAC-SHA256 over the payload. The
//! payload is serialized canonically first (compact, object keys sorted at
//! every depth) so that key order in the received JSON does not matter.

use crate::error::{Error, Result};
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies webhook payloads. Pure, independent of any transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureVerifier;

impl SignatureVerifier {
    /// Hex-encoded HMAC-SHA256 of the canonical payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the key cannot initialise the MAC.
    pub fn sign(payload: &Value, signing_key: &str) -> Result<String> {
        Ok(hex::encode(Self::mac(payload, signing_key)?))
    }

    /// Whether `signature` is the HMAC of `payload` under `signing_key`.
    ///
    /// `signature` is hex, in either case. The comparison runs in constant
    /// time with respect to the signature's content.
    pub fn verify(payload: &Value, signature: &str, signing_key: &str) -> bool {
        let Ok(provided) = hex::decode(signature.trim()) else {
            tracing::debug!("Webhook signature is not valid hex");
            return false;
        };
        let Ok(expected) = Self::mac(payload, signing_key) else {
            return false;
        };

        if expected.len() != provided.len() {
            // Same amount of work as a real comparison
            let _ = expected.ct_eq(&expected);
            return false;
        }
        expected.ct_eq(&provided).into()
    }

    /// [`SignatureVerifier::verify`], failing with [`Error::SignatureMismatch`].
    pub fn verify_strict(payload: &Value, signature: &str, signing_key: &str) -> Result<()> {
        if Self::verify(payload, signature, signing_key) {
            Ok(())
        } else {
            Err(Error::SignatureMismatch)
        }
    }

    fn mac(payload: &Value, signing_key: &str) -> Result<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(signing_key.as_bytes())
            .map_err(|e| Error::Configuration(format!("invalid signing key: {e}")))?;
        mac.update(canonical_json(payload).as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Compact JSON with object keys sorted recursively.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(value, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    const KEY: &str = "whsec_test";

    #[test]
    fn test_canonical_json_sorts_keys_recursively() {
        let value = json!({"b": 1, "a": {"z": [true, null], "m": "x y"}});
        assert_eq!(
            canonical_json(&value),
            r#"{"a":{"m":"x y","z":[true,null]},"b":1}"#
        );
    }

    #[test]
    fn test_canonical_json_escapes_strings() {
        let value = json!({"quote\"key": "line\nbreak"});
        assert_eq!(canonical_json(&value), r#"{"quote\"key":"line\nbreak"}"#);
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            SignatureVerifier::sign(&json!({}), "key").unwrap(),
            "a777724d943eb48dc69bca8a4a6d57a04db3f9ec7e1de4e581e860265bdf3032"
        );

        let payload = json!({"event": "project.created", "data": {"id": "p-1"}});
        assert_eq!(
            SignatureVerifier::sign(&payload, KEY).unwrap(),
            "4ef6c0e30509c0c15953e13e812cbf6f5f285de50e2c29ecbc7c16852f46984b"
        );
    }

    #[test]
    fn test_verify_round_trip_ignores_key_order() {
        let payload = json!({"event": "project.updated", "data": {"id": "p-1", "name": "Web"}});
        let sig = SignatureVerifier::sign(&payload, KEY).unwrap();

        let reordered: Value =
            serde_json::from_str(r#"{"data":{"name":"Web","id":"p-1"},"event":"project.updated"}"#)
                .unwrap();
        assert!(SignatureVerifier::verify(&reordered, &sig, KEY));
        assert!(SignatureVerifier::verify(&payload, &sig.to_uppercase(), KEY));
    }

    #[test]
    fn test_verify_rejects_wrong_key_and_bad_signatures() {
        let payload = json!({"event": "ping"});
        let sig = SignatureVerifier::sign(&payload, KEY).unwrap();

        assert!(!SignatureVerifier::verify(&payload, &sig, "other-key"));
        assert!(!SignatureVerifier::verify(&payload, "not-hex", KEY));
        assert!(!SignatureVerifier::verify(&payload, &sig[..32], KEY));
        assert!(!SignatureVerifier::verify(&payload, "", KEY));
    }

    #[test]
    fn test_verify_strict() {
        let payload = json!({"event": "ping"});
        let sig = SignatureVerifier::sign(&payload, KEY).unwrap();

        assert!(SignatureVerifier::verify_strict(&payload, &sig, KEY).is_ok());
        assert!(matches!(
            SignatureVerifier::verify_strict(&json!({"event": "pong"}), &sig, KEY),
            Err(Error::SignatureMismatch)
        ));
    }

    proptest! {
        #[test]
        fn prop_sign_then_verify(text in ".{0,64}", key in "[ -~]{1,32}") {
            let payload = json!({"text": text});
            let sig = SignatureVerifier::sign(&payload, &key).unwrap();
            prop_assert!(SignatureVerifier::verify(&payload, &sig, &key));
        }

        #[test]
        fn prop_single_byte_mutation_fails(
            text in "[a-z0-9]{1,64}",
            index in any::<prop::sample::Index>(),
            replacement in "[A-Z]",
        ) {
            let payload = json!({"text": text.clone()});
            let sig = SignatureVerifier::sign(&payload, KEY).unwrap();

            let at = index.index(text.len());
            let mut mutated = text.into_bytes();
            mutated[at] = replacement.as_bytes()[0];
            let mutated = json!({"text": String::from_utf8(mutated).unwrap()});

            prop_assert!(!SignatureVerifier::verify(&mutated, &sig, KEY));
        }
    }
}
