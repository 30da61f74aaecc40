//! Raw token transport to the gateway.
//!
//! One physical call per logical action; no retries, no backoff. A
//! failed call surfaces immediately.

use std::time::Duration;

use paco_types::{Endpoint, HttpMethod};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};

use crate::error::GatewayError;

/// Default bound on a single gateway call. The upstream contract has no
/// timeout at all; 30 seconds is this client's documented choice.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ENVELOPE_MEDIA_TYPE: &str = "application/jose; charset=utf-8";
const API_KEY_HEADER: &str = "CompanyApiKey";

/// Gateway transport configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Stateless HTTP transport: fixed base address and default headers,
/// safe to share across tasks.
pub struct GatewayClient {
    base_url: String,
    api_key: HeaderValue,
    http: reqwest::Client,
}

impl GatewayClient {
    /// Fails at construction when the API key cannot travel as an HTTP
    /// header (control characters from a mis-pasted env var); sending
    /// the envelope without `CompanyApiKey` would only fail later and
    /// less legibly at the gateway.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let api_key =
            HeaderValue::from_str(&config.api_key).map_err(|_| GatewayError::InvalidApiKey)?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GatewayError::Client)?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            http,
        })
    }

    /// Sends an encoded envelope token and returns the raw encoded
    /// response token. Non-2xx statuses are transport errors; the body
    /// is never decoded on failure.
    pub async fn send(&self, endpoint: Endpoint, token: &str) -> Result<String, GatewayError> {
        let url = format!("{}/{}", self.base_url, endpoint.path);
        let method = match endpoint.method {
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        };

        tracing::debug!(%url, method = ?endpoint.method, "sending envelope to gateway");

        let response = self
            .http
            .request(method, &url)
            .headers(self.default_headers())
            .body(token.to_string())
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "gateway rejected the request");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.text().await.map_err(classify_transport)
    }

    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/jose"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(ENVELOPE_MEDIA_TYPE));
        headers.insert(API_KEY_HEADER, self.api_key.clone());
        headers
    }
}

fn classify_transport(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(err)
    }
}
