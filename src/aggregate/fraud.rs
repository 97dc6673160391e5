//! Fraud ratios and per-country fraud counts

use crate::transaction::TransactionTable;
use crate::types::Outcome;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraudulent share of a set of transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudRatio {
    pub fraud: usize,
    pub total: usize,
}

impl FraudRatio {
    /// `fraud / total`, `None` when there are no transactions
    pub fn ratio(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.fraud as f64 / self.total as f64)
        }
    }

    /// `fraud / total`, defined as 0.0 for an empty subset
    pub fn ratio_or_zero(&self) -> f64 {
        self.ratio().unwrap_or(0.0)
    }
}

impl fmt::Display for FraudRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Transactions:        {}", self.total)?;
        writeln!(f, "  Fraudulent:          {}", self.fraud)?;
        match self.ratio() {
            Some(ratio) => write!(f, "  Fraud ratio:         {:.4}%", ratio * 100.0),
            None => write!(f, "  Fraud ratio:         not computable (no transactions)"),
        }
    }
}

/// Share of fraudulent transactions in the whole table
pub fn fraud_ratio(table: &TransactionTable) -> FraudRatio {
    FraudRatio {
        fraud: table.iter().filter(|tx| tx.is_fraud).count(),
        total: table.len(),
    }
}

/// Share of fraudulent transactions among high-risk vendors
pub fn high_risk_fraud_ratio(table: &TransactionTable) -> FraudRatio {
    fraud_ratio(&table.high_risk_only())
}

/// Fraud count for one country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCount {
    pub country: String,
    pub fraud_transactions: usize,
}

impl fmt::Display for CountryCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<24} {}", self.country, self.fraud_transactions)
    }
}

/// Countries with the most fraudulent transactions.
///
/// Sorted by descending count; equal counts keep the order in which the
/// countries were first seen. Rows without a country are not counted.
/// `NoData` when no fraudulent row has a country.
pub fn top_fraud_countries(table: &TransactionTable, n: usize) -> Outcome<Vec<CountryCount>> {
    let mut counts: Vec<CountryCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tx in table
        .iter()
        .filter(|tx| tx.is_fraud && !tx.country.trim().is_empty())
    {
        let i = *index.entry(tx.country.as_str()).or_insert_with(|| {
            counts.push(CountryCount {
                country: tx.country.clone(),
                fraud_transactions: 0,
            });
            counts.len() - 1
        });
        counts[i].fraud_transactions += 1;
    }

    if counts.is_empty() {
        return Outcome::NoData;
    }

    // Stable sort keeps encounter order for ties
    counts.sort_by(|a, b| b.fraud_transactions.cmp(&a.fraud_transactions));
    counts.truncate(n);
    Outcome::Value(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;
    use crate::transaction::Transaction;
    use chrono::{TimeZone, Utc};

    fn tx(id: usize, country: &str, fraud: bool) -> Transaction {
        let ts = Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap();
        Transaction::new(id.to_string(), "c1", Currency::usd(), Some(1.0), ts)
            .with_location(country, None)
            .with_fraud(fraud)
    }

    #[test]
    fn test_fraud_ratio_three_of_ten() {
        let rows = (0..10).map(|i| tx(i, "US", i < 3)).collect::<Vec<_>>();
        let ratio = fraud_ratio(&TransactionTable::new(rows));

        assert_eq!(ratio.fraud, 3);
        assert_eq!(ratio.total, 10);
        assert_eq!(ratio.ratio(), Some(0.3));
    }

    #[test]
    fn test_fraud_ratio_empty_is_not_computable() {
        let ratio = fraud_ratio(&TransactionTable::default());
        assert_eq!(ratio.ratio(), None);
        assert!(ratio.to_string().contains("not computable"));
    }

    #[test]
    fn test_high_risk_ratio() {
        let rows = vec![
            tx(1, "US", true).with_high_risk_vendor(true),
            tx(2, "US", false).with_high_risk_vendor(true),
            tx(3, "US", true),
            tx(4, "US", false).with_high_risk_vendor(true),
        ];
        let ratio = high_risk_fraud_ratio(&TransactionTable::new(rows));
        assert_eq!(ratio.total, 3);
        assert_eq!(ratio.fraud, 1);
        assert!((ratio.ratio_or_zero() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_high_risk_ratio_empty_subset_is_zero() {
        let rows = vec![tx(1, "US", true), tx(2, "US", false)];
        let ratio = high_risk_fraud_ratio(&TransactionTable::new(rows));
        assert_eq!(ratio.total, 0);
        assert_eq!(ratio.ratio_or_zero(), 0.0);
    }

    #[test]
    fn test_top_countries_order_and_ties() {
        let rows = vec![
            tx(1, "Mexico", true),
            tx(2, "Russia", true),
            tx(3, "Russia", true),
            tx(4, "Brazil", true),
            tx(5, "Mexico", true),
            tx(6, "Nigeria", true),
            tx(7, "Germany", false),
            tx(8, "Germany", false),
        ];
        let top = top_fraud_countries(&TransactionTable::new(rows), 3)
            .into_value()
            .unwrap();

        let names: Vec<&str> = top.iter().map(|c| c.country.as_str()).collect();
        assert_eq!(names, vec!["Mexico", "Russia", "Brazil"]);
        assert_eq!(top[0].fraud_transactions, 2);
        assert_eq!(top[2].fraud_transactions, 1);
    }

    #[test]
    fn test_top_countries_skip_missing_country() {
        let rows = vec![tx(1, "", true), tx(2, "USA", true), tx(3, "  ", true)];
        let top = top_fraud_countries(&TransactionTable::new(rows), 5)
            .into_value()
            .unwrap();

        assert_eq!(
            top,
            vec![CountryCount {
                country: "USA".to_string(),
                fraud_transactions: 1,
            }]
        );

        let no_country = vec![tx(4, "", true)];
        assert_eq!(
            top_fraud_countries(&TransactionTable::new(no_country), 5),
            Outcome::NoData
        );
    }

    #[test]
    fn test_top_countries_without_fraud() {
        let rows = vec![tx(1, "US", false)];
        assert_eq!(
            top_fraud_countries(&TransactionTable::new(rows), 5),
            Outcome::NoData
        );
    }
}
