//! # PACO Envelope
//!
//! The secure envelope protocol spoken with the PACO gateway: claims
//! are JWS-signed with PS256, then the signed token is JWE-encrypted
//! with RSA-OAEP + A256GCM into a single compact text token. Responses
//! travel the reverse path: decrypt first, then verify.
//!
//! Sign-then-encrypt ordering is mandatory - a party holding only the
//! decryption key cannot forge a verifiable payload.

pub mod codec;
pub mod error;
pub mod keys;

pub use codec::{DecodedClaims, EnvelopeCodec, SecuritySettings, RESPONSE_ISSUER};
pub use error::{EnvelopeError, KeyError};
pub use keys::{DecryptionKey, EncryptionKey, KeyMaterial, KeyPurpose, SigningKey, VerificationKey};
