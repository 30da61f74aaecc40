//! # PACO Client
//!
//! Per-action orchestration against the PACO gateway. Every action runs
//! the same linear pipeline with no retry loop:
//!
//! ```text
//! Build -> Encode -> Send -> Decode -> ExtractResult
//! ```
//!
//! Any stage error aborts the pipeline; no partial state is retained.

pub mod error;
pub mod gateway;

pub use error::{ActionError, GatewayError};
pub use gateway::{GatewayClient, GatewayConfig, DEFAULT_TIMEOUT};

use paco_envelope::{DecodedClaims, EnvelopeCodec};
use paco_types::{
    ActionRequest, Claims, InquiryParams, PaymentParams, RefundParams, SettlementParams,
    VoidParams,
};

/// Orchestrates the five business actions. All state is read-only after
/// construction, so one client can serve concurrent invocations.
pub struct PacoClient {
    codec: EnvelopeCodec,
    gateway: GatewayClient,
    api_key: String,
}

impl PacoClient {
    pub fn new(codec: EnvelopeCodec, gateway: GatewayClient, api_key: impl Into<String>) -> Self {
        Self {
            codec,
            gateway,
            api_key: api_key.into(),
        }
    }

    /// Creates a hosted payment page and returns its redirect URL.
    pub async fn create_payment(&self, params: PaymentParams) -> Result<String, ActionError> {
        let request = ActionRequest::payment(params)?;
        let claims = self.execute(request).await?;
        extract_payment_page_url(&claims)
    }

    /// Looks up transactions for an order. Returns the raw decoded
    /// claims; inquiry responses have no single pinned shape.
    pub async fn inquire(&self, params: InquiryParams) -> Result<serde_json::Value, ActionError> {
        let request = ActionRequest::inquiry(params)?;
        Ok(self.execute(request).await?.into_value())
    }

    /// Refunds a settled transaction.
    pub async fn refund(&self, params: RefundParams) -> Result<serde_json::Value, ActionError> {
        let request = ActionRequest::refund(params)?;
        Ok(self.execute(request).await?.into_value())
    }

    /// Settles (captures) an authorized transaction.
    pub async fn settle(&self, params: SettlementParams) -> Result<serde_json::Value, ActionError> {
        let request = ActionRequest::settlement(params)?;
        Ok(self.execute(request).await?.into_value())
    }

    /// Voids an authorized transaction.
    pub async fn void_payment(&self, params: VoidParams) -> Result<serde_json::Value, ActionError> {
        let request = ActionRequest::void(params)?;
        Ok(self.execute(request).await?.into_value())
    }

    /// The shared Encode -> Send -> Decode segment of the pipeline.
    async fn execute(&self, request: ActionRequest) -> Result<DecodedClaims, ActionError> {
        let endpoint = request.endpoint();
        let claims = Claims::issue(request, &self.api_key);
        let token = self.codec.encode(&claims)?;
        let response = self.gateway.send(endpoint, &token).await?;
        let decoded = self.codec.decode(&response)?;
        tracing::debug!(path = endpoint.path, "gateway response decoded and verified");
        Ok(decoded)
    }
}

/// Payment responses must carry `response.Data.paymentPage.paymentPageURL`.
/// A trusted response without it means the gateway reached a different,
/// possibly degraded, contract - reported distinctly from crypto errors.
fn extract_payment_page_url(claims: &DecodedClaims) -> Result<String, ActionError> {
    claims
        .claim("response")
        .and_then(|v| v.get("Data"))
        .and_then(|v| v.get("paymentPage"))
        .and_then(|v| v.get("paymentPageURL"))
        .and_then(|v| v.as_str())
        .filter(|url| !url.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| {
            ActionError::ResponseShape(
                "missing response.Data.paymentPage.paymentPageURL".to_string(),
            )
        })
}
