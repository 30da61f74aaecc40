//! The five business actions understood by the gateway.
//!
//! Field names are pinned to the gateway's JSON contract; renaming any
//! of them breaks interoperability.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::money::Money;
use crate::dto::{InquiryParams, PaymentParams, RefundParams, SettlementParams, VoidParams};
use crate::error::DomainError;

/// Y/N flag as the gateway spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flag {
    Y,
    N,
}

impl std::str::FromStr for Flag {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Y" | "y" => Ok(Flag::Y),
            "N" | "n" => Ok(Flag::N),
            other => Err(DomainError::InvalidFlag(other.to_string())),
        }
    }
}

/// HTTP method of a gateway endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
    Put,
}

/// Fixed endpoint mapping for one action. Part of the external contract;
/// must not change without gateway-side agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    pub method: HttpMethod,
}

/// Common request envelope metadata, synthesized fresh on every build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    #[serde(rename = "requestMessageID")]
    pub request_message_id: String,
    pub request_date_time: String,
    pub language: String,
}

impl ApiRequest {
    fn new() -> Self {
        Self {
            request_message_id: Uuid::new_v4().to_string(),
            request_date_time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, false),
            language: "en-US".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCardDetails {
    pub store_card_flag: Flag,
    #[serde(rename = "storedCardUniqueID")]
    pub stored_card_unique_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPaymentDetails {
    pub ipp_flag: Flag,
    pub installment_period: u32,
    pub interest_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationUrls {
    #[serde(rename = "confirmationURL")]
    pub confirmation: String,
    #[serde(rename = "failedURL")]
    pub failed: String,
    #[serde(rename = "cancellationURL")]
    pub cancellation: String,
    #[serde(rename = "backendURL")]
    pub backend: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDetails {
    pub browser_ip: String,
    pub browser: String,
    pub browser_user_agent: String,
    pub mobile_device_flag: Flag,
}

impl Default for DeviceDetails {
    fn default() -> Self {
        Self {
            browser_ip: "1.0.0.1".to_string(),
            browser: "Unknown Browser".to_string(),
            browser_user_agent: "unknown".to_string(),
            mobile_device_flag: Flag::N,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub purchase_item_type: String,
    pub reference_no: String,
    pub purchase_item_description: String,
    pub purchase_item_price: Money,
    #[serde(rename = "subMerchantID")]
    pub sub_merchant_id: String,
    pub passenger_seq_no: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    pub field_name: String,
    pub field_value: String,
}

/// Payment-page creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub api_request: ApiRequest,
    pub office_id: String,
    pub order_no: String,
    pub product_description: String,
    pub payment_type: String,
    pub payment_category: String,
    pub store_card_details: StoreCardDetails,
    pub installment_payment_details: InstallmentPaymentDetails,
    pub mcp_flag: Flag,
    #[serde(rename = "request3dsFlag")]
    pub request_3ds_flag: Flag,
    pub transaction_amount: Money,
    #[serde(rename = "notificationURLs")]
    pub notification_urls: NotificationUrls,
    pub device_details: DeviceDetails,
    pub purchase_items: Vec<PurchaseItem>,
    pub custom_field_list: Vec<CustomField>,
}

/// Transaction search parameters. The gateway treats
/// `0001-01-01T00:00:00` as an unbounded date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvSearchParams {
    #[serde(rename = "controllerInternalID")]
    pub controller_internal_id: Option<String>,
    pub office_id: Vec<String>,
    pub order_no: Vec<String>,
    #[serde(rename = "invoiceNo2C2P")]
    pub invoice_no_2c2p: Option<String>,
    pub from_date: String,
    pub to_date: String,
    pub amount_from: Option<f64>,
    pub amount_to: Option<f64>,
}

/// Read-only transaction inquiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryRequest {
    pub api_request: ApiRequest,
    pub adv_search_params: AdvSearchParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maker {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalMakerChecker {
    pub maker: Maker,
}

/// Refund of a settled transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub refund_amount: Money,
    // Item-level refund shape is not documented; always empty here.
    pub refund_items: Vec<serde_json::Value>,
    pub local_maker_checker: LocalMakerChecker,
    pub office_id: String,
    pub order_no: String,
}

/// Settlement (capture) of an authorized transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRequest {
    pub office_id: String,
    pub order_no: String,
    pub product_description: String,
    pub issuer_approval_code: String,
    pub action_by: String,
    pub settlement_amount: Money,
}

/// Void of an authorized transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoidRequest {
    pub office_id: String,
    pub order_no: String,
    pub product_description: String,
    pub issuer_approval_code: String,
    pub action_by: String,
    pub void_amount: Money,
}

/// A business action carried inside the secure envelope.
///
/// Closed sum type: the orchestration layer dispatches on it exactly
/// once to pick the endpoint and the expected response shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionRequest {
    Payment(PaymentRequest),
    Inquiry(InquiryRequest),
    Refund(RefundRequest),
    Settlement(SettlementRequest),
    Void(VoidRequest),
}

impl ActionRequest {
    /// Builds a payment-page creation request.
    ///
    /// `order_no` is synthesized from the current time in milliseconds;
    /// uniqueness is best-effort, preserved for wire-format compatibility.
    pub fn payment(params: PaymentParams) -> Result<Self, DomainError> {
        require(&params.office_id, "office_id")?;
        require(&params.confirmation_url, "confirmation_url")?;
        require(&params.failed_url, "failed_url")?;
        require(&params.cancellation_url, "cancellation_url")?;
        require(&params.backend_url, "backend_url")?;

        let order_no = fresh_order_no();
        let product_description = params
            .product_description
            .unwrap_or_else(|| format!("desc for '{}'", order_no));

        Ok(Self::Payment(PaymentRequest {
            api_request: ApiRequest::new(),
            office_id: params.office_id,
            order_no,
            product_description,
            payment_type: "CC".to_string(),
            payment_category: "ECOM".to_string(),
            store_card_details: StoreCardDetails {
                store_card_flag: Flag::N,
                stored_card_unique_id: Uuid::new_v4().to_string(),
            },
            installment_payment_details: InstallmentPaymentDetails {
                ipp_flag: Flag::N,
                installment_period: 0,
                interest_type: None,
            },
            mcp_flag: Flag::N,
            request_3ds_flag: params.three_ds,
            transaction_amount: params.amount,
            notification_urls: NotificationUrls {
                confirmation: params.confirmation_url,
                failed: params.failed_url,
                cancellation: params.cancellation_url,
                backend: params.backend_url,
            },
            device_details: params.device.unwrap_or_default(),
            purchase_items: params.purchase_items,
            custom_field_list: params.custom_fields,
        }))
    }

    /// Builds a transaction inquiry.
    pub fn inquiry(params: InquiryParams) -> Result<Self, DomainError> {
        require(&params.office_id, "office_id")?;
        require(&params.order_no, "order_no")?;

        let window = params.search_window.unwrap_or_default();
        Ok(Self::Inquiry(InquiryRequest {
            api_request: ApiRequest::new(),
            adv_search_params: AdvSearchParams {
                controller_internal_id: None,
                office_id: vec![params.office_id],
                order_no: vec![params.order_no],
                invoice_no_2c2p: None,
                from_date: window.from_date,
                to_date: window.to_date,
                amount_from: None,
                amount_to: None,
            },
        }))
    }

    /// Builds a refund request.
    pub fn refund(params: RefundParams) -> Result<Self, DomainError> {
        require(&params.office_id, "office_id")?;
        require(&params.order_no, "order_no")?;
        require(&params.maker_username, "maker_username")?;
        require(&params.maker_email, "maker_email")?;

        Ok(Self::Refund(RefundRequest {
            refund_amount: params.amount,
            refund_items: Vec::new(),
            local_maker_checker: LocalMakerChecker {
                maker: Maker {
                    username: params.maker_username,
                    email: params.maker_email,
                },
            },
            office_id: params.office_id,
            order_no: params.order_no,
        }))
    }

    /// Builds a settlement request.
    pub fn settlement(params: SettlementParams) -> Result<Self, DomainError> {
        require(&params.office_id, "office_id")?;
        require(&params.order_no, "order_no")?;
        require(&params.issuer_approval_code, "issuer_approval_code")?;

        Ok(Self::Settlement(SettlementRequest {
            office_id: params.office_id,
            order_no: params.order_no,
            product_description: params.product_description,
            issuer_approval_code: params.issuer_approval_code,
            action_by: "System".to_string(),
            settlement_amount: params.amount,
        }))
    }

    /// Builds a void request.
    pub fn void(params: VoidParams) -> Result<Self, DomainError> {
        require(&params.office_id, "office_id")?;
        require(&params.order_no, "order_no")?;
        require(&params.issuer_approval_code, "issuer_approval_code")?;

        Ok(Self::Void(VoidRequest {
            office_id: params.office_id,
            order_no: params.order_no,
            product_description: params.product_description,
            issuer_approval_code: params.issuer_approval_code,
            action_by: "System".to_string(),
            void_amount: params.amount,
        }))
    }

    /// The fixed `(path, method)` pair this action is sent to.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Payment(_) => Endpoint {
                path: "api/1.0/Payment/prePaymentUi",
                method: HttpMethod::Post,
            },
            Self::Inquiry(_) => Endpoint {
                path: "api/1.0/Inquiry/transactionList",
                method: HttpMethod::Post,
            },
            Self::Refund(_) => Endpoint {
                path: "api/1.0/Refund/refund",
                method: HttpMethod::Post,
            },
            Self::Settlement(_) => Endpoint {
                path: "api/1.0/Settlement",
                method: HttpMethod::Put,
            },
            Self::Void(_) => Endpoint {
                path: "api/1.0/Void",
                method: HttpMethod::Post,
            },
        }
    }
}

fn require(value: &str, field: &'static str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::MissingField(field));
    }
    Ok(())
}

/// Current time in milliseconds as decimal text. The gateway expects a
/// decimal numeral string; collisions under concurrent calls are an
/// acknowledged weakness of the upstream contract.
fn fresh_order_no() -> String {
    Utc::now().timestamp_millis().to_string()
}
