//! Error types for the transport and orchestration layers.

use paco_envelope::EnvelopeError;
use paco_types::DomainError;

/// Transport-level failures. Candidates for caller-level retry, with
/// the caveat that refund/void/settlement carry gateway-side order
/// identifiers and naive retries risk duplicate financial actions.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Failed to construct HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("API key is not a valid header value")]
    InvalidApiKey,

    #[error("Gateway request timed out")]
    Timeout,

    #[error("Transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Gateway returned status {status}")]
    Status { status: u16, body: String },
}

/// Umbrella error for one orchestrated action. Every stage failure
/// aborts the pipeline and keeps its category.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error(transparent)]
    Transport(#[from] GatewayError),

    #[error("Unexpected response shape: {0}")]
    ResponseShape(String),
}
