//! PACO CLI
//!
//! Command-line interface for the PACO gateway client. Failures are
//! logged in detail and reduced to a generic notice on stderr; tokens
//! and key material are never printed.

mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use paco_client::{GatewayClient, GatewayConfig, PacoClient};
use paco_envelope::{EnvelopeCodec, KeyMaterial, SecuritySettings, RESPONSE_ISSUER};
use paco_types::{
    InquiryParams, Money, PaymentParams, RefundParams, SettlementParams, VoidParams,
};

use config::Config;

#[derive(Parser)]
#[command(name = "paco")]
#[command(author, version, about = "PACO payment gateway CLI client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a hosted payment page and print its redirect URL
    Payment {
        /// Amount in major currency units (e.g. whole rupees)
        #[arg(long)]
        amount: i64,
        /// Three-letter currency code
        #[arg(long, default_value = "NPR")]
        currency: String,
        /// Request 3-D Secure (Y or N)
        #[arg(long, default_value = "N")]
        three_ds: String,
        #[arg(long)]
        success_url: String,
        #[arg(long)]
        fail_url: String,
        #[arg(long)]
        cancel_url: String,
        #[arg(long)]
        backend_url: String,
        /// Product description; derived from the order number if omitted
        #[arg(long)]
        description: Option<String>,
    },
    /// Look up transactions for an order
    Inquiry {
        #[arg(long)]
        order_no: String,
    },
    /// Refund a settled transaction
    Refund {
        #[arg(long)]
        order_no: String,
        /// Amount in minor currency units (e.g. satang)
        #[arg(long)]
        amount: i64,
        #[arg(long, default_value = "THB")]
        currency: String,
        #[arg(long, default_value = "System")]
        maker: String,
        #[arg(long)]
        maker_email: String,
    },
    /// Settle (capture) an authorized transaction
    Settlement {
        #[arg(long)]
        order_no: String,
        /// Amount in minor currency units
        #[arg(long)]
        amount: i64,
        #[arg(long, default_value = "THB")]
        currency: String,
        #[arg(long)]
        approval_code: String,
        #[arg(long, default_value = "Sample request")]
        description: String,
    },
    /// Void an authorized transaction
    Void {
        #[arg(long)]
        order_no: String,
        /// Amount in minor currency units
        #[arg(long)]
        amount: i64,
        #[arg(long, default_value = "THB")]
        currency: String,
        #[arg(long)]
        approval_code: String,
        #[arg(long, default_value = "Sample request")]
        description: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        tracing::error!(error = ?err, "request failed");
        eprintln!("Request failed. See logs for details.");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;
    let client = build_client(&config)?;

    match cli.command {
        Commands::Payment {
            amount,
            currency,
            three_ds,
            success_url,
            fail_url,
            cancel_url,
            backend_url,
            description,
        } => {
            let url = client
                .create_payment(PaymentParams {
                    office_id: config.office_id,
                    amount: Money::from_major(amount, currency.parse()?, 2)?,
                    three_ds: three_ds.parse()?,
                    product_description: description,
                    confirmation_url: success_url,
                    failed_url: fail_url,
                    cancellation_url: cancel_url,
                    backend_url,
                    device: None,
                    purchase_items: Vec::new(),
                    custom_fields: Vec::new(),
                })
                .await?;
            println!("{url}");
        }
        Commands::Inquiry { order_no } => {
            let result = client
                .inquire(InquiryParams {
                    office_id: config.office_id,
                    order_no,
                    search_window: None,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Refund {
            order_no,
            amount,
            currency,
            maker,
            maker_email,
        } => {
            let result = client
                .refund(RefundParams {
                    office_id: config.office_id,
                    order_no,
                    amount: minor(amount, &currency)?,
                    maker_username: maker,
                    maker_email,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Settlement {
            order_no,
            amount,
            currency,
            approval_code,
            description,
        } => {
            let result = client
                .settle(SettlementParams {
                    office_id: config.office_id,
                    order_no,
                    product_description: description,
                    issuer_approval_code: approval_code,
                    amount: minor(amount, &currency)?,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Void {
            order_no,
            amount,
            currency,
            approval_code,
            description,
        } => {
            let result = client
                .void_payment(VoidParams {
                    office_id: config.office_id,
                    order_no,
                    product_description: description,
                    issuer_approval_code: approval_code,
                    amount: minor(amount, &currency)?,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

fn minor(amount: i64, currency: &str) -> Result<Money> {
    Ok(Money::from_minor(amount, currency.parse()?, 2)?)
}

fn build_client(config: &Config) -> Result<PacoClient> {
    let keys = KeyMaterial::from_pems(
        &config.merchant_signing_private_key,
        &config.paco_signing_public_key,
        &config.paco_encryption_public_key,
        &config.merchant_decryption_private_key,
    )?;
    let codec = EnvelopeCodec::new(
        keys,
        SecuritySettings {
            token_type: config.token_type.clone(),
            encryption_key_id: config.encryption_key_id.clone(),
            expected_issuer: RESPONSE_ISSUER.to_string(),
            expected_audience: config.api_key.clone(),
        },
    );
    let gateway = GatewayClient::new(
        &GatewayConfig::new(config.base_url.clone(), config.api_key.clone())
            .with_timeout(config.timeout),
    )?;
    Ok(PacoClient::new(codec, gateway, config.api_key.clone()))
}
