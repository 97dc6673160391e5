//! Transaction records and the immutable transaction table

use crate::currency::Currency;
use crate::types::{Amount, Timestamp};
use chrono::{Duration, NaiveDate, Timelike};
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

/// A single card transaction as loaded from the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque transaction key
    pub id: String,
    pub customer_id: String,
    pub vendor: String,
    /// Free-text vendor category, e.g. "fast_food" or "Retail/Online"
    pub vendor_type: String,
    /// Empty when the source row had no country
    pub country: String,
    /// `None` when the source row had no city
    pub city: Option<String>,
    pub currency: Currency,
    /// Amount in `currency`; `None` when the source value was not numeric
    pub amount: Option<Amount>,
    /// Always UTC
    pub timestamp: Timestamp,
    pub is_fraud: bool,
    pub is_high_risk_vendor: bool,
}

impl Transaction {
    /// Create a legitimate, non-high-risk transaction with empty vendor and location
    pub fn new(
        id: impl Into<String>,
        customer_id: impl Into<String>,
        currency: Currency,
        amount: Option<Amount>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            customer_id: customer_id.into(),
            vendor: String::new(),
            vendor_type: String::new(),
            country: String::new(),
            city: None,
            currency,
            amount,
            timestamp,
            is_fraud: false,
            is_high_risk_vendor: false,
        }
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>, vendor_type: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self.vendor_type = vendor_type.into();
        self
    }

    pub fn with_location(mut self, country: impl Into<String>, city: Option<&str>) -> Self {
        self.country = country.into();
        self.city = city.map(str::to_string);
        self
    }

    pub fn with_fraud(mut self, is_fraud: bool) -> Self {
        self.is_fraud = is_fraud;
        self
    }

    pub fn with_high_risk_vendor(mut self, high_risk: bool) -> Self {
        self.is_high_risk_vendor = high_risk;
        self
    }

    /// Calendar date of the UTC timestamp (join key against rate tables)
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Timestamp truncated to the start of its UTC hour
    pub fn hour(&self) -> Timestamp {
        let ts = self.timestamp;
        let into_hour = i64::from(ts.minute() * 60 + ts.second());
        ts - Duration::seconds(into_hour) - Duration::nanoseconds(i64::from(ts.nanosecond()))
    }
}

/// Immutable snapshot of transactions for one analysis run.
///
/// Filters never mutate; they return a new table holding clones of the
/// selected rows in their original order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionTable {
    rows: Vec<Transaction>,
}

impl TransactionTable {
    pub fn new(rows: Vec<Transaction>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Select rows matching `predicate`
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Transaction) -> bool,
    {
        Self {
            rows: self.rows.iter().filter(|tx| predicate(tx)).cloned().collect(),
        }
    }

    pub fn fraud_only(&self) -> Self {
        self.filter(|tx| tx.is_fraud)
    }

    pub fn legit_only(&self) -> Self {
        self.filter(|tx| !tx.is_fraud)
    }

    pub fn high_risk_only(&self) -> Self {
        self.filter(|tx| tx.is_high_risk_vendor)
    }

    /// Dataset overview
    pub fn stats(&self) -> TableStats {
        let mut customers = HashSet::new();
        let mut seen_currencies: HashSet<&Currency> = HashSet::new();
        let mut currencies: Vec<Currency> = Vec::new();
        let mut start_date: Option<NaiveDate> = None;
        let mut end_date: Option<NaiveDate> = None;

        for tx in &self.rows {
            customers.insert(tx.customer_id.as_str());
            if seen_currencies.insert(&tx.currency) {
                currencies.push(tx.currency.clone());
            }
            let date = tx.date();
            start_date = Some(start_date.map_or(date, |d| d.min(date)));
            end_date = Some(end_date.map_or(date, |d| d.max(date)));
        }

        currencies.sort();

        TableStats {
            row_count: self.rows.len(),
            customer_count: customers.len(),
            fraud_count: self.rows.iter().filter(|tx| tx.is_fraud).count(),
            missing_amounts: self.rows.iter().filter(|tx| tx.amount.is_none()).count(),
            currencies,
            start_date,
            end_date,
        }
    }
}

impl From<Vec<Transaction>> for TransactionTable {
    fn from(rows: Vec<Transaction>) -> Self {
        Self::new(rows)
    }
}

impl<'a> IntoIterator for &'a TransactionTable {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Transaction table statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStats {
    pub row_count: usize,
    pub customer_count: usize,
    pub fraud_count: usize,
    pub missing_amounts: usize,
    /// Distinct currency codes, sorted
    pub currencies: Vec<Currency>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn tx(id: &str, customer: &str, ts: Timestamp) -> Transaction {
        Transaction::new(id, customer, Currency::usd(), Some(10.0), ts)
    }

    #[test]
    fn test_hour_floor() {
        let ts = Utc.with_ymd_and_hms(2024, 10, 1, 14, 37, 12).unwrap();
        let t = tx("1", "c1", ts);
        assert_eq!(t.hour(), Utc.with_ymd_and_hms(2024, 10, 1, 14, 0, 0).unwrap());

        let exact = Utc.with_ymd_and_hms(2024, 10, 1, 14, 0, 0).unwrap();
        assert_eq!(tx("2", "c1", exact).hour(), exact);
    }

    #[test]
    fn test_hour_floor_drops_subseconds() {
        let ts = Utc.with_ymd_and_hms(2024, 10, 1, 23, 59, 59).unwrap()
            + Duration::milliseconds(999);
        assert_eq!(
            tx("1", "c1", ts).hour(),
            Utc.with_ymd_and_hms(2024, 10, 1, 23, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_date_is_utc_calendar_date() {
        let ts = Utc.with_ymd_and_hms(2024, 10, 1, 23, 30, 0).unwrap();
        assert_eq!(tx("1", "c1", ts).date(), NaiveDate::from_ymd_opt(2024, 10, 1).unwrap());
    }

    #[test]
    fn test_filters_return_new_tables() {
        let ts = Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap();
        let table = TransactionTable::new(vec![
            tx("1", "c1", ts).with_fraud(true),
            tx("2", "c2", ts),
            tx("3", "c1", ts).with_high_risk_vendor(true),
        ]);

        assert_eq!(table.fraud_only().len(), 1);
        assert_eq!(table.legit_only().len(), 2);
        assert_eq!(table.high_risk_only().rows()[0].id, "3");
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_table_stats() {
        let d1 = Utc.with_ymd_and_hms(2024, 9, 30, 8, 0, 0).unwrap();
        let d2 = Utc.with_ymd_and_hms(2024, 10, 2, 8, 0, 0).unwrap();
        let mut eur = Transaction::new("3", "c2", Currency::new("EUR"), None, d2);
        eur.is_fraud = true;
        let table = TransactionTable::new(vec![tx("1", "c1", d1), tx("2", "c1", d2), eur]);

        let stats = table.stats();
        assert_eq!(stats.row_count, 3);
        assert_eq!(stats.customer_count, 2);
        assert_eq!(stats.fraud_count, 1);
        assert_eq!(stats.missing_amounts, 1);
        assert_eq!(stats.currencies, vec![Currency::new("EUR"), Currency::usd()]);
        assert_eq!(stats.start_date, Some(d1.date_naive()));
        assert_eq!(stats.end_date, Some(d2.date_naive()));
    }

    #[test]
    fn test_empty_table_stats() {
        let stats = TransactionTable::default().stats();
        assert_eq!(stats.row_count, 0);
        assert!(stats.start_date.is_none());
        assert!(stats.currencies.is_empty());
    }
}
