//! Currency codes

use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217 currency code as it appears in the data.
///
/// Codes are compared by exact value: `"eur"` and `"EUR"` are different
/// currencies. Rate columns and transaction rows must agree on spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Create a currency from its code, trimming surrounding whitespace
    pub fn new(code: impl Into<String>) -> Self {
        let code: String = code.into();
        Self(code.trim().to_string())
    }

    /// The reporting currency
    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    /// Get ISO 4217 code
    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn is_usd(&self) -> bool {
        self.0 == "USD"
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code() {
        assert_eq!(Currency::new("EUR").code(), "EUR");
        assert_eq!(Currency::new(" GBP ").code(), "GBP");
        assert_eq!(Currency::usd().code(), "USD");
    }

    #[test]
    fn test_currency_is_case_sensitive() {
        assert_ne!(Currency::new("eur"), Currency::new("EUR"));
        assert!(Currency::new("USD").is_usd());
        assert!(!Currency::new("usd").is_usd());
    }

    #[test]
    fn test_currency_display() {
        assert_eq!(format!("{}", Currency::from("JPY")), "JPY");
    }
}
