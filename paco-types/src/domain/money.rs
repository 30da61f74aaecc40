//! Type-safe monetary value with the gateway's fixed textual encoding.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::DomainError;

/// Width of the zero-padded amount text the gateway expects.
const AMOUNT_TEXT_WIDTH: usize = 12;

/// ISO-4217-shaped currency code (exactly three ASCII letters).
///
/// Only the shape is validated here; whether the code is actually
/// accepted is the gateway's business.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Result<Self, DomainError> {
        let code = code.into();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::InvalidCurrencyCode(code));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = DomainError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::new(code)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monetary value carried inside action requests.
///
/// The amount is stored in the smallest unit of the currency to avoid
/// floating-point precision issues. On the wire it becomes the gateway's
/// four-field shape: `amountText` (minor units, zero-padded to exactly
/// 12 characters, no sign, no decimal point), `currencyCode`,
/// `decimalPlaces` and the decimal `amount`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    minor: i64,
    currency: CurrencyCode,
    decimal_places: u8,
}

impl Money {
    /// Creates a Money value from minor units (cents, satang, paisa...).
    pub fn from_minor(
        minor: i64,
        currency: CurrencyCode,
        decimal_places: u8,
    ) -> Result<Self, DomainError> {
        if minor < 0 {
            return Err(DomainError::NegativeAmount);
        }
        // scale() must stay within i64 range
        if decimal_places > 9 {
            return Err(DomainError::UnsupportedDecimalPlaces(decimal_places));
        }
        if minor.to_string().len() > AMOUNT_TEXT_WIDTH {
            return Err(DomainError::AmountOutOfRange { minor });
        }
        Ok(Self {
            minor,
            currency,
            decimal_places,
        })
    }

    /// Creates a Money value from major units (whole currency units).
    pub fn from_major(
        major: i64,
        currency: CurrencyCode,
        decimal_places: u8,
    ) -> Result<Self, DomainError> {
        if major < 0 {
            return Err(DomainError::NegativeAmount);
        }
        if decimal_places > 9 {
            return Err(DomainError::UnsupportedDecimalPlaces(decimal_places));
        }
        let scale = 10i64.pow(decimal_places as u32);
        let minor = major.checked_mul(scale).ok_or(DomainError::AmountOutOfRange {
            // the true minor magnitude overflows i64, so report the
            // saturated value rather than the unscaled major amount
            minor: major.saturating_mul(scale),
        })?;
        Self::from_minor(minor, currency, decimal_places)
    }

    /// Returns the amount in minor units.
    pub fn minor(&self) -> i64 {
        self.minor
    }

    /// Returns the currency code.
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn decimal_places(&self) -> u8 {
        self.decimal_places
    }

    /// Returns the decimal amount in major units.
    pub fn amount(&self) -> f64 {
        self.minor as f64 / self.scale() as f64
    }

    /// The gateway's fixed-width encoding: minor units as decimal text,
    /// left-padded with zeros to exactly 12 characters.
    pub fn amount_text(&self) -> String {
        format!("{:012}", self.minor)
    }

    fn scale(&self) -> i64 {
        10i64.pow(self.decimal_places as u32)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = self.scale();
        write!(
            f,
            "{}.{:0width$} {}",
            self.minor / scale,
            self.minor % scale,
            self.currency,
            width = self.decimal_places as usize
        )
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Money", 4)?;
        state.serialize_field("amountText", &self.amount_text())?;
        state.serialize_field("currencyCode", &self.currency)?;
        state.serialize_field("decimalPlaces", &self.decimal_places)?;
        // Whole amounts serialize as integers, matching the gateway samples.
        if self.minor % self.scale() == 0 {
            state.serialize_field("amount", &(self.minor / self.scale()))?;
        } else {
            state.serialize_field("amount", &self.amount())?;
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Wire {
            amount_text: String,
            currency_code: CurrencyCode,
            decimal_places: u8,
        }

        let wire = Wire::deserialize(deserializer)?;
        if wire.amount_text.len() != AMOUNT_TEXT_WIDTH
            || !wire.amount_text.chars().all(|c| c.is_ascii_digit())
        {
            return Err(serde::de::Error::custom(format!(
                "malformed amountText: {:?}",
                wire.amount_text
            )));
        }
        let minor: i64 = wire
            .amount_text
            .parse()
            .map_err(serde::de::Error::custom)?;
        Money::from_minor(minor, wire.currency_code, wire.decimal_places)
            .map_err(serde::de::Error::custom)
    }
}
