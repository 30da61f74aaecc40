//! Configuration loading from environment.
//!
//! Every value the envelope and transport layers need must be present
//! before any call is attempted; a missing key is a startup error, not
//! a per-call error.

use std::env;
use std::time::Duration;

/// Application configuration.
pub struct Config {
    pub base_url: String,
    pub api_key: String,
    pub office_id: String,
    pub token_type: String,
    pub encryption_key_id: String,
    pub merchant_signing_private_key: String,
    pub paco_signing_public_key: String,
    pub paco_encryption_public_key: String,
    pub merchant_decryption_private_key: String,
    pub timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let timeout_secs = env::var("PACO_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()?;

        Ok(Self {
            base_url: env::var("PACO_BASE_URL")
                .unwrap_or_else(|_| "https://core.demo-paco.2c2p.com/".to_string()),
            api_key: required("PACO_API_KEY")?,
            office_id: env::var("OFFICE_ID").unwrap_or_else(|_| "DEMOOFFICE".to_string()),
            token_type: env::var("TOKEN_TYPE").unwrap_or_else(|_| "JWT".to_string()),
            encryption_key_id: required("ENCRYPTION_KEY_ID")?,
            merchant_signing_private_key: required("MERCHANT_SIGNING_PRIVATE_KEY")?,
            paco_signing_public_key: required("PACO_SIGNING_PUBLIC_KEY")?,
            paco_encryption_public_key: required("PACO_ENCRYPTION_PUBLIC_KEY")?,
            merchant_decryption_private_key: required("MERCHANT_DECRYPTION_PRIVATE_KEY")?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn required(name: &str) -> anyhow::Result<String> {
    env::var(name).map_err(|_| anyhow::anyhow!("{name} environment variable is required"))
}
