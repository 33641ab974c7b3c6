//! Money value object.
//!
//! Amounts are held as i64 minor units (cents) with an ISO-4217 currency code.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Three-letter ISO-4217 currency code, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Parses a currency code, accepting any case.
    pub fn new(code: impl AsRef<str>) -> Result<Self, ValidationError> {
        let code = code.as_ref().trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid_format(
                "currency",
                format!("'{}' is not a three-letter currency code", code),
            ));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// US dollars.
    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Currency {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Currency::new(value)
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A currency-tagged amount in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount_minor: i64,
    currency: Currency,
}

impl Money {
    /// Creates a non-negative amount.
    pub fn new(amount_minor: i64, currency: Currency) -> Result<Self, ValidationError> {
        if amount_minor < 0 {
            return Err(ValidationError::out_of_range(
                "amount",
                0,
                i64::MAX,
                amount_minor,
            ));
        }
        Ok(Self {
            amount_minor,
            currency,
        })
    }

    /// Zero in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount_minor: 0,
            currency,
        }
    }

    pub fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Encodes as `CUR,minor` (e.g. `USD,5000`), the ticketing gateway format.
    pub fn to_gateway_string(&self) -> String {
        format!("{},{}", self.currency, self.amount_minor)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02} {}",
            self.amount_minor / 100,
            self.amount_minor % 100,
            self.currency
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_normalizes_case() {
        assert_eq!(Currency::new("usd").unwrap().as_str(), "USD");
    }

    #[test]
    fn currency_rejects_bad_codes() {
        assert!(Currency::new("US").is_err());
        assert!(Currency::new("US1").is_err());
    }

    #[test]
    fn money_rejects_negative_amounts() {
        assert!(Money::new(-1, Currency::usd()).is_err());
    }

    #[test]
    fn gateway_encoding_uses_minor_units() {
        let price = Money::new(5000, Currency::usd()).unwrap();
        assert_eq!(price.to_gateway_string(), "USD,5000");
    }

    #[test]
    fn display_formats_major_units() {
        let price = Money::new(5005, Currency::usd()).unwrap();
        assert_eq!(price.to_string(), "50.05 USD");
    }
}
