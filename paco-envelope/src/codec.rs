//! The sign-then-encrypt envelope codec.
//!
//! Outbound: JSON claims -> compact JWS (PS256) -> compact JWE
//! (RSA-OAEP + A256GCM). Inbound: decrypt the JWE, pin the inner JWS to
//! PS256, verify the signature, then validate the trust claims. Nothing
//! partially decrypted ever escapes a failed decode.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use josekit::jwe::JweHeader;
use josekit::jws::JwsHeader;
use josekit::{jwe, jws};
use serde::Serialize;
use serde_json::Value;

use crate::error::EnvelopeError;
use crate::keys::KeyMaterial;

/// The only signing algorithm accepted on either direction. A token
/// declaring anything else is rejected, never downgraded.
const SIGNING_ALGORITHM: &str = "PS256";

/// Content-encryption algorithm for the JWE layer.
const CONTENT_ENCRYPTION: &str = "A256GCM";

/// Issuer the gateway puts on response tokens.
pub const RESPONSE_ISSUER: &str = "PacoIssuer";

/// Non-key envelope policy: header labels plus the identity claims
/// expected on inbound tokens.
#[derive(Debug, Clone)]
pub struct SecuritySettings {
    /// `typ` header on both the JWS and JWE layers (usually "JWT").
    pub token_type: String,
    /// `kid` identifying the encryption key to the gateway.
    pub encryption_key_id: String,
    /// `iss` required on inbound tokens.
    pub expected_issuer: String,
    /// `aud` required on inbound tokens.
    pub expected_audience: String,
}

/// Verified, decrypted claim set recovered from a response token.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedClaims(Value);

impl DecodedClaims {
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Envelope codec for one party. Holds the four purpose-tagged keys and
/// the algorithm policy; safe for unsynchronized concurrent use.
pub struct EnvelopeCodec {
    keys: KeyMaterial,
    settings: SecuritySettings,
}

impl EnvelopeCodec {
    pub fn new(keys: KeyMaterial, settings: SecuritySettings) -> Self {
        Self { keys, settings }
    }

    /// Signs the claims with this party's private key, then encrypts the
    /// signed token to the counterparty's public key. Sign first,
    /// encrypt second.
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, EnvelopeError> {
        let payload =
            serde_json::to_vec(claims).map_err(|e| EnvelopeError::Signing(e.to_string()))?;

        let mut jws_header = JwsHeader::new();
        jws_header.set_token_type(self.settings.token_type.as_str());
        let signed = jws::serialize_compact(&payload, &jws_header, self.keys.signing.signer())
            .map_err(|e| EnvelopeError::Signing(e.to_string()))?;

        let mut jwe_header = JweHeader::new();
        jwe_header.set_content_encryption(CONTENT_ENCRYPTION);
        jwe_header.set_key_id(self.settings.encryption_key_id.as_str());
        jwe_header.set_token_type(self.settings.token_type.as_str());
        jwe::serialize_compact(
            signed.as_bytes(),
            &jwe_header,
            self.keys.encryption.encrypter(),
        )
        .map_err(EnvelopeError::Encryption)
    }

    /// Decrypts a response token with this party's private key, then
    /// verifies the inner signature with the counterparty's public key.
    /// `exp`, `nbf`, `aud` and `iss` are all enforced; any failure is a
    /// verification error.
    pub fn decode(&self, token: &str) -> Result<DecodedClaims, EnvelopeError> {
        let (plaintext, _jwe_header) =
            jwe::deserialize_compact(token, self.keys.decryption.decrypter())
                .map_err(EnvelopeError::Decryption)?;

        let signed = std::str::from_utf8(&plaintext).map_err(|_| {
            EnvelopeError::SignatureVerification(
                "decrypted payload is not a compact JWS".to_string(),
            )
        })?;

        pin_signing_algorithm(signed)?;

        let (payload, _jws_header) =
            jws::deserialize_compact(signed, self.keys.verification.verifier())
                .map_err(|e| EnvelopeError::SignatureVerification(e.to_string()))?;

        let claims: Value = serde_json::from_slice(&payload).map_err(|e| {
            EnvelopeError::SignatureVerification(format!("verified payload is not JSON: {e}"))
        })?;

        self.validate_claims(&claims)?;
        Ok(DecodedClaims(claims))
    }

    fn validate_claims(&self, claims: &Value) -> Result<(), EnvelopeError> {
        let now = Utc::now().timestamp();

        let exp = claims
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or_else(|| reject("missing exp claim"))?;
        if exp <= now {
            return Err(reject("token has expired"));
        }

        // nbf is part of the contract; checked even though the upstream
        // gateway client historically skipped it.
        if let Some(nbf) = claims.get("nbf").and_then(Value::as_i64) {
            if nbf > now {
                return Err(reject("token is not yet valid"));
            }
        }

        if !audience_matches(claims.get("aud"), &self.settings.expected_audience) {
            return Err(reject("unexpected audience"));
        }

        match claims.get("iss").and_then(Value::as_str) {
            Some(iss) if iss == self.settings.expected_issuer => {}
            _ => return Err(reject("unexpected issuer")),
        }

        Ok(())
    }
}

fn reject(reason: &str) -> EnvelopeError {
    EnvelopeError::SignatureVerification(reason.to_string())
}

/// `aud` may be a single string or an array of strings.
fn audience_matches(aud: Option<&Value>, expected: &str) -> bool {
    match aud {
        Some(Value::String(s)) => s == expected,
        Some(Value::Array(items)) => items.iter().any(|v| v.as_str() == Some(expected)),
        _ => false,
    }
}

/// Rejects any inner JWS not declaring the pinned signing algorithm
/// before signature verification runs.
fn pin_signing_algorithm(signed: &str) -> Result<(), EnvelopeError> {
    let header_b64 = signed.split('.').next().unwrap_or_default();
    let header_bytes = URL_SAFE_NO_PAD
        .decode(header_b64)
        .map_err(|_| reject("malformed JWS protected header"))?;
    let header: Value = serde_json::from_slice(&header_bytes)
        .map_err(|_| reject("malformed JWS protected header"))?;
    match header.get("alg").and_then(Value::as_str) {
        Some(SIGNING_ALGORITHM) => Ok(()),
        other => Err(reject(&format!(
            "unexpected signing algorithm {other:?}, expected {SIGNING_ALGORITHM}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyMaterial;
    use paco_types::domain::claims::AUDIENCE;
    use paco_types::{ActionRequest, Claims, CurrencyCode, Money, RefundParams};

    const API_KEY: &str = "test-company-api-key";

    /// Merchant side: signs with its own key, encrypts to the gateway.
    fn merchant_codec() -> EnvelopeCodec {
        let keys = KeyMaterial::from_pems(
            include_str!("../testdata/merchant_signing_private.pem"),
            include_str!("../testdata/gateway_signing_public.pem"),
            include_str!("../testdata/gateway_encryption_public.pem"),
            include_str!("../testdata/merchant_decryption_private.pem"),
        )
        .unwrap();
        EnvelopeCodec::new(
            keys,
            SecuritySettings {
                token_type: "JWT".to_string(),
                encryption_key_id: "paco-enc-key".to_string(),
                expected_issuer: RESPONSE_ISSUER.to_string(),
                expected_audience: API_KEY.to_string(),
            },
        )
    }

    /// Gateway side: the mirror image of the merchant codec.
    fn gateway_codec() -> EnvelopeCodec {
        let keys = KeyMaterial::from_pems(
            include_str!("../testdata/gateway_signing_private.pem"),
            include_str!("../testdata/merchant_signing_public.pem"),
            include_str!("../testdata/merchant_encryption_public.pem"),
            include_str!("../testdata/gateway_decryption_private.pem"),
        )
        .unwrap();
        EnvelopeCodec::new(
            keys,
            SecuritySettings {
                token_type: "JWT".to_string(),
                encryption_key_id: "merchant-enc-key".to_string(),
                expected_issuer: API_KEY.to_string(),
                expected_audience: AUDIENCE.to_string(),
            },
        )
    }

    fn sample_claims(iat: i64) -> Claims {
        let request = ActionRequest::refund(RefundParams {
            office_id: "DEMOOFFICE".to_string(),
            order_no: "1643362945100".to_string(),
            amount: Money::from_minor(1000, CurrencyCode::new("THB").unwrap(), 2).unwrap(),
            maker_username: "System".to_string(),
            maker_email: "maker@example.com".to_string(),
        })
        .unwrap();
        Claims::issue_at(request, API_KEY, iat)
    }

    #[test]
    fn test_round_trip_identity() {
        let claims = sample_claims(Utc::now().timestamp());
        let token = merchant_codec().encode(&claims).unwrap();
        let decoded = gateway_codec().decode(&token).unwrap();
        assert_eq!(
            decoded.into_value(),
            serde_json::to_value(&claims).unwrap()
        );
    }

    #[test]
    fn test_token_is_compact_jwe() {
        let claims = sample_claims(Utc::now().timestamp());
        let token = merchant_codec().encode(&claims).unwrap();
        assert_eq!(token.split('.').count(), 5);
        assert!(token.is_ascii());
    }

    #[test]
    fn test_tampered_token_never_decodes() {
        let claims = sample_claims(Utc::now().timestamp());
        let token = merchant_codec().encode(&claims).unwrap();
        let gateway = gateway_codec();

        // Corrupt one character in every segment of the compact token.
        let parts: Vec<&str> = token.split('.').collect();
        for i in 0..parts.len() {
            let mut mutated: Vec<String> = parts.iter().map(|s| s.to_string()).collect();
            let seg = &mut mutated[i];
            let flipped = if seg.starts_with('A') { "B" } else { "A" };
            seg.replace_range(0..1, flipped);
            let result = gateway.decode(&mutated.join("."));
            assert!(
                matches!(
                    result,
                    Err(EnvelopeError::Decryption(_))
                        | Err(EnvelopeError::SignatureVerification(_))
                ),
                "segment {i} accepted after tampering"
            );
        }
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = sample_claims(Utc::now().timestamp() - 7200);
        let token = merchant_codec().encode(&claims).unwrap();
        let result = gateway_codec().decode(&token);
        match result {
            Err(EnvelopeError::SignatureVerification(reason)) => {
                assert!(reason.contains("expired"), "got: {reason}")
            }
            other => panic!("expected verification failure, got {other:?}"),
        }
    }

    #[test]
    fn test_future_nbf_rejected() {
        let claims = sample_claims(Utc::now().timestamp() + 7200);
        let token = merchant_codec().encode(&claims).unwrap();
        let result = gateway_codec().decode(&token);
        match result {
            Err(EnvelopeError::SignatureVerification(reason)) => {
                assert!(reason.contains("not yet valid"), "got: {reason}")
            }
            other => panic!("expected verification failure, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let mut claims = sample_claims(Utc::now().timestamp());
        claims.aud = "SomeOtherAudience".to_string();
        let token = merchant_codec().encode(&claims).unwrap();
        let result = gateway_codec().decode(&token);
        assert!(matches!(
            result,
            Err(EnvelopeError::SignatureVerification(_))
        ));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let mut claims = sample_claims(Utc::now().timestamp());
        claims.iss = "someone-else".to_string();
        let token = merchant_codec().encode(&claims).unwrap();
        let result = gateway_codec().decode(&token);
        assert!(matches!(
            result,
            Err(EnvelopeError::SignatureVerification(_))
        ));
    }

    #[test]
    fn test_wrong_signing_algorithm_rejected() {
        // A properly encrypted token whose inner JWS declares RS256
        // instead of the pinned PS256.
        let claims = sample_claims(Utc::now().timestamp());
        let payload = serde_json::to_vec(&claims).unwrap();

        // The signing fixtures carry the RSASSA-PSS OID, which josekit's
        // RS256 loader rejects, so borrow the merchant's other RSA
        // private key; decode pins the algorithm before any signature
        // check, so the key's identity does not matter here.
        let rs256_signer = josekit::jws::RS256
            .signer_from_pem(include_str!("../testdata/merchant_decryption_private.pem"))
            .unwrap();
        let mut jws_header = JwsHeader::new();
        jws_header.set_token_type("JWT");
        let signed = jws::serialize_compact(&payload, &jws_header, &rs256_signer).unwrap();

        let encrypter = josekit::jwe::RSA_OAEP
            .encrypter_from_pem(include_str!("../testdata/gateway_encryption_public.pem"))
            .unwrap();
        let mut jwe_header = JweHeader::new();
        jwe_header.set_content_encryption("A256GCM");
        jwe_header.set_token_type("JWT");
        let token = jwe::serialize_compact(signed.as_bytes(), &jwe_header, &encrypter).unwrap();

        let result = gateway_codec().decode(&token);
        match result {
            Err(EnvelopeError::SignatureVerification(reason)) => {
                assert!(reason.contains("algorithm"), "got: {reason}")
            }
            other => panic!("expected verification failure, got {other:?}"),
        }
    }

    #[test]
    fn test_request_token_rejected_as_response() {
        // A request-direction claim set (aud "PacoAudience", iss = API
        // key) decrypts fine on the merchant side but must not pass the
        // response-direction identity checks.
        let claims = sample_claims(Utc::now().timestamp());
        let token = gateway_codec().encode(&claims).unwrap();
        let result = merchant_codec().decode(&token);
        assert!(matches!(
            result,
            Err(EnvelopeError::SignatureVerification(_))
        ));
    }

    #[test]
    fn test_wrong_decryption_key_rejected() {
        // Encrypted to the gateway, so the merchant cannot decrypt it.
        let claims = sample_claims(Utc::now().timestamp());
        let token = merchant_codec().encode(&claims).unwrap();
        let result = merchant_codec().decode(&token);
        assert!(matches!(result, Err(EnvelopeError::Decryption(_))));
    }
}
