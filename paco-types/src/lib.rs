//! # PACO Types
//!
//! Domain types for the 2C2P PACO payment gateway integration.
//! This crate has ZERO external IO dependencies - only the data
//! structures exchanged with the gateway and the rules that keep
//! them well-formed.
//!
//! ## Architecture
//!
//! - `domain/` - Pure domain types (Money, ActionRequest, Claims)
//! - `dto/` - Flat parameter structures supplied by callers
//! - `error/` - Domain error types

pub mod domain;
pub mod dto;
pub mod error;

// Re-export commonly used types
pub use domain::{
    ActionRequest, ApiRequest, Claims, CurrencyCode, CustomField, DeviceDetails, Endpoint, Flag,
    HttpMethod, InquiryRequest, Money, NotificationUrls, PaymentRequest, PurchaseItem,
    RefundRequest, SettlementRequest, VoidRequest,
};
pub use dto::*;
pub use error::DomainError;
