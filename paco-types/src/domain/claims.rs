//! The claim set wrapped around every action request before signing.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::action::ActionRequest;

/// Fixed audience literal for this gateway integration.
pub const AUDIENCE: &str = "PacoAudience";

/// Validity window of an issued claim set.
pub const VALIDITY_SECS: i64 = 3600;

/// Identity and timing claims plus the embedded business payload.
///
/// Issued fresh for every call; never cached or replayed.
/// Invariants: `iat == nbf` and `exp == iat + 3600`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub request: ActionRequest,
    pub iss: String,
    pub aud: String,
    #[serde(rename = "CompanyApiKey")]
    pub company_api_key: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    /// Issues a claim set valid from now for one hour. The gateway
    /// expects both `iss` and `CompanyApiKey` to carry the API key.
    pub fn issue(request: ActionRequest, api_key: &str) -> Self {
        Self::issue_at(request, api_key, Utc::now().timestamp())
    }

    /// Issues a claim set with an explicit `iat` (seconds since epoch).
    pub fn issue_at(request: ActionRequest, api_key: &str, iat: i64) -> Self {
        Self {
            request,
            iss: api_key.to_string(),
            aud: AUDIENCE.to_string(),
            company_api_key: api_key.to_string(),
            iat,
            nbf: iat,
            exp: iat + VALIDITY_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::{CurrencyCode, Money};
    use crate::dto::RefundParams;

    fn sample_request() -> ActionRequest {
        ActionRequest::refund(RefundParams {
            office_id: "DEMOOFFICE".to_string(),
            order_no: "1643362945100".to_string(),
            amount: Money::from_minor(1000, CurrencyCode::new("THB").unwrap(), 2).unwrap(),
            maker_username: "System".to_string(),
            maker_email: "maker@example.com".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_validity_window() {
        let claims = Claims::issue(sample_request(), "api-key");
        assert_eq!(claims.iat, claims.nbf);
        assert_eq!(claims.exp, claims.iat + 3600);
        assert_eq!(claims.aud, "PacoAudience");
        assert_eq!(claims.iss, "api-key");
        assert_eq!(claims.company_api_key, "api-key");
    }

    #[test]
    fn test_wire_names() {
        let claims = Claims::issue_at(sample_request(), "api-key", 1_700_000_000);
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["CompanyApiKey"], "api-key");
        assert_eq!(value["iat"], 1_700_000_000);
        assert_eq!(value["exp"], 1_700_003_600);
        assert!(value["request"]["refundAmount"].is_object());
    }
}
