//! Error types for key loading and envelope processing.

use crate::keys::KeyPurpose;

/// Key material could not be loaded from configuration. Surfaced at
/// startup, never per call.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("Invalid {purpose} key: {source}")]
    InvalidKey {
        purpose: KeyPurpose,
        #[source]
        source: josekit::JoseError,
    },

    #[error("Empty PEM supplied for {purpose} key")]
    EmptyPem { purpose: KeyPurpose },
}

/// Envelope processing failures, one variant per pipeline stage so
/// callers can tell a crypto failure from a trust failure.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("Failed to sign request claims: {0}")]
    Signing(String),

    #[error("Failed to encrypt signed claims: {0}")]
    Encryption(#[source] josekit::JoseError),

    #[error("Failed to decrypt response token: {0}")]
    Decryption(#[source] josekit::JoseError),

    #[error("Response signature verification failed: {0}")]
    SignatureVerification(String),
}
