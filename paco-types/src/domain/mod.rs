//! Domain models for the PACO gateway integration.

pub mod action;
pub mod claims;
pub mod money;

pub use action::{
    ActionRequest, AdvSearchParams, ApiRequest, CustomField, DeviceDetails, Endpoint, Flag,
    HttpMethod, InquiryRequest, InstallmentPaymentDetails, LocalMakerChecker, Maker,
    NotificationUrls, PaymentRequest, PurchaseItem, RefundRequest, SettlementRequest,
    StoreCardDetails, VoidRequest,
};
pub use claims::{Claims, AUDIENCE, VALIDITY_SECS};
pub use money::{CurrencyCode, Money};
