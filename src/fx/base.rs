//! Base FX lookup trait

use crate::currency::Currency;
use crate::types::{Amount, Rate};
use chrono::NaiveDate;

/// Trait for reading daily exchange rates.
///
/// Rates are quoted as units of `currency` per 1 USD, so converting to USD
/// divides by the rate.
pub trait RateLookup {
    /// Get the rate quoted for `currency` on `date`, exact match only
    fn get_rate(&self, date: NaiveDate, currency: &Currency) -> Option<Rate>;

    /// Check if rate is available
    fn has_rate(&self, date: NaiveDate, currency: &Currency) -> bool {
        self.get_rate(date, currency).is_some()
    }

    /// Convert an amount to USD, `None` when no rate is quoted
    fn to_usd(&self, amount: Amount, date: NaiveDate, currency: &Currency) -> Option<f64> {
        self.get_rate(date, currency).map(|rate| amount / rate)
    }
}
