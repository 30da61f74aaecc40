//! Flat parameter structures supplied by the presentation layer.
//!
//! Callers fill these in; the builders in `domain::action` turn them
//! into wire-shaped requests. No cryptographic concerns live here.

use crate::domain::action::{CustomField, DeviceDetails, Flag, PurchaseItem};
use crate::domain::money::Money;

/// Parameters for creating a hosted payment page.
#[derive(Debug, Clone)]
pub struct PaymentParams {
    pub office_id: String,
    pub amount: Money,
    pub three_ds: Flag,
    /// Defaults to a description derived from the generated order number.
    pub product_description: Option<String>,
    pub confirmation_url: String,
    pub failed_url: String,
    pub cancellation_url: String,
    pub backend_url: String,
    pub device: Option<DeviceDetails>,
    pub purchase_items: Vec<PurchaseItem>,
    pub custom_fields: Vec<CustomField>,
}

/// Date range for transaction inquiries.
#[derive(Debug, Clone)]
pub struct SearchWindow {
    pub from_date: String,
    pub to_date: String,
}

impl Default for SearchWindow {
    /// The gateway's "unbounded" sentinel dates.
    fn default() -> Self {
        Self {
            from_date: "0001-01-01T00:00:00".to_string(),
            to_date: "0001-01-01T00:00:00".to_string(),
        }
    }
}

/// Parameters for a transaction inquiry.
#[derive(Debug, Clone)]
pub struct InquiryParams {
    pub office_id: String,
    pub order_no: String,
    pub search_window: Option<SearchWindow>,
}

/// Parameters for a refund.
#[derive(Debug, Clone)]
pub struct RefundParams {
    pub office_id: String,
    pub order_no: String,
    pub amount: Money,
    pub maker_username: String,
    pub maker_email: String,
}

/// Parameters for a settlement.
#[derive(Debug, Clone)]
pub struct SettlementParams {
    pub office_id: String,
    pub order_no: String,
    pub product_description: String,
    pub issuer_approval_code: String,
    pub amount: Money,
}

/// Parameters for a void.
#[derive(Debug, Clone)]
pub struct VoidParams {
    pub office_id: String,
    pub order_no: String,
    pub product_description: String,
    pub issuer_approval_code: String,
    pub amount: Money,
}
