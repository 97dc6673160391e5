//! Long-format exchange rate table
//!
//! Stores one `(date, currency, rate)` row per quote, indexed by
//! `(date, currency)` for exact-match lookups during the join.

use super::base::RateLookup;
use crate::currency::Currency;
use crate::error::{AnalyticsError, Result};
use crate::types::Rate;
use chrono::NaiveDate;
use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

/// A single quoted rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRow {
    pub date: NaiveDate,
    pub currency: Currency,
    /// Units of `currency` per 1 USD, always > 0
    pub rate: Rate,
}

/// Long-format rate table, unique per `(date, currency)`
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use fraud_fx_stats::currency::Currency;
/// use fraud_fx_stats::fx::{ExchangeRateLong, RateLookup};
///
/// let mut rates = ExchangeRateLong::new();
/// let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
/// rates.add_rate(date, Currency::new("EUR"), 0.93).unwrap();
///
/// assert_eq!(rates.get_rate(date, &Currency::new("EUR")), Some(0.93));
/// assert!(rates.add_rate(date, Currency::new("EUR"), 0.94).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExchangeRateLong {
    rows: Vec<RateRow>,
    index: HashMap<(NaiveDate, Currency), usize>,
}

impl ExchangeRateLong {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from rows, rejecting duplicates and non-positive rates
    pub fn from_rows(rows: impl IntoIterator<Item = RateRow>) -> Result<Self> {
        let mut table = Self::new();
        for row in rows {
            table.add_rate(row.date, row.currency, row.rate)?;
        }
        Ok(table)
    }

    /// Add a single rate
    pub fn add_rate(&mut self, date: NaiveDate, currency: Currency, rate: Rate) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(AnalyticsError::InvalidRate {
                date,
                currency: currency.code().to_string(),
                rate,
            });
        }

        let key = (date, currency);
        if self.index.contains_key(&key) {
            return Err(AnalyticsError::DuplicateRate {
                date,
                currency: key.1.code().to_string(),
            });
        }

        self.index.insert(key.clone(), self.rows.len());
        self.rows.push(RateRow {
            date: key.0,
            currency: key.1,
            rate,
        });
        Ok(())
    }

    /// Rows in insertion order
    pub fn rows(&self) -> &[RateRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct currencies, sorted
    pub fn currencies(&self) -> Vec<Currency> {
        let mut currencies: Vec<Currency> = self
            .index
            .keys()
            .map(|(_, currency)| currency)
            .collect::<HashSet<_>>()
            .into_iter()
            .cloned()
            .collect();
        currencies.sort();
        currencies
    }

    /// First and last quoted date
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.rows.iter().map(|r| r.date).min()?;
        let end = self.rows.iter().map(|r| r.date).max()?;
        Some((start, end))
    }
}

impl RateLookup for ExchangeRateLong {
    fn get_rate(&self, date: NaiveDate, currency: &Currency) -> Option<Rate> {
        self.index
            .get(&(date, currency.clone()))
            .map(|&i| self.rows[i].rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, d).unwrap()
    }

    #[test]
    fn test_basic_rate_storage() {
        let mut rates = ExchangeRateLong::new();
        rates.add_rate(day(1), Currency::new("EUR"), 0.92).unwrap();

        assert_eq!(rates.get_rate(day(1), &Currency::new("EUR")), Some(0.92));
        assert_eq!(rates.get_rate(day(2), &Currency::new("EUR")), None);
        assert_eq!(rates.len(), 1);
    }

    #[test]
    fn test_exact_date_match_only() {
        let mut rates = ExchangeRateLong::new();
        rates.add_rate(day(1), Currency::new("EUR"), 0.92).unwrap();

        // No forward fill: the next day has no quote
        assert!(!rates.has_rate(day(2), &Currency::new("EUR")));
    }

    #[test]
    fn test_currency_lookup_is_case_sensitive() {
        let mut rates = ExchangeRateLong::new();
        rates.add_rate(day(1), Currency::new("EUR"), 0.92).unwrap();
        assert!(!rates.has_rate(day(1), &Currency::new("eur")));
    }

    #[test]
    fn test_invalid_rate() {
        let mut rates = ExchangeRateLong::new();

        assert!(rates.add_rate(day(1), Currency::new("EUR"), -1.0).is_err());
        assert!(rates.add_rate(day(1), Currency::new("EUR"), 0.0).is_err());
        assert!(rates.add_rate(day(1), Currency::new("EUR"), f64::NAN).is_err());
        assert!(rates.is_empty());
    }

    #[test]
    fn test_duplicate_rejected() {
        let rows = vec![
            RateRow { date: day(1), currency: Currency::new("EUR"), rate: 0.92 },
            RateRow { date: day(1), currency: Currency::new("EUR"), rate: 0.93 },
        ];
        let err = ExchangeRateLong::from_rows(rows).unwrap_err();
        assert!(matches!(err, AnalyticsError::DuplicateRate { .. }));
    }

    #[test]
    fn test_currencies_and_range() {
        let mut rates = ExchangeRateLong::new();
        rates.add_rate(day(3), Currency::new("JPY"), 150.0).unwrap();
        rates.add_rate(day(1), Currency::new("EUR"), 0.92).unwrap();
        rates.add_rate(day(2), Currency::new("EUR"), 0.91).unwrap();

        assert_eq!(rates.currencies(), vec![Currency::new("EUR"), Currency::new("JPY")]);
        assert_eq!(rates.date_range(), Some((day(1), day(3))));
        assert_eq!(ExchangeRateLong::new().date_range(), None);
    }
}
