//! Per-customer hourly activity: transaction rate and vendor diversity

use crate::stats::{median, percentile_linear};
use crate::transaction::TransactionTable;
use crate::types::{fmt_opt, Outcome, Timestamp};
use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Average number of transactions per active (customer, hour) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomerHourRate {
    pub transactions: usize,
    pub customer_hours: usize,
    /// `None` for an empty table
    pub mean: Option<f64>,
}

impl fmt::Display for CustomerHourRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Transactions:            {}", self.transactions)?;
        writeln!(f, "  (customer, hour) pairs:  {}", self.customer_hours)?;
        write!(f, "  Mean per customer-hour:  {}", fmt_opt(self.mean, 3))
    }
}

/// Group by `(customer_id, UTC hour floor)` and average the group sizes
pub fn customer_hour_rate(table: &TransactionTable) -> CustomerHourRate {
    let mut groups: HashMap<(&str, Timestamp), usize> = HashMap::new();
    for tx in table {
        *groups.entry((tx.customer_id.as_str(), tx.hour())).or_insert(0) += 1;
    }

    let transactions: usize = groups.values().sum();
    let customer_hours = groups.len();
    let mean = if customer_hours == 0 {
        None
    } else {
        Some(transactions as f64 / customer_hours as f64)
    };

    CustomerHourRate {
        transactions,
        customer_hours,
        mean,
    }
}

/// Per-customer median of "distinct vendors in the same customer-hour".
///
/// Each transaction carries the distinct-vendor count of its
/// `(customer, hour)` group; the median is then taken over a customer's
/// transactions, so busy hours weigh in once per transaction. Customers
/// are returned in first-seen order.
pub fn customer_vendor_medians(table: &TransactionTable) -> Vec<(String, f64)> {
    let mut vendors: HashMap<(&str, Timestamp), HashSet<&str>> = HashMap::new();
    for tx in table {
        vendors
            .entry((tx.customer_id.as_str(), tx.hour()))
            .or_default()
            .insert(tx.vendor.as_str());
    }

    let mut customers: Vec<(&str, Vec<f64>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for tx in table {
        let distinct = vendors
            .get(&(tx.customer_id.as_str(), tx.hour()))
            .map_or(0, |set| set.len());
        let i = *index.entry(tx.customer_id.as_str()).or_insert_with(|| {
            customers.push((tx.customer_id.as_str(), Vec::new()));
            customers.len() - 1
        });
        customers[i].1.push(distinct as f64);
    }

    customers
        .into_iter()
        .filter_map(|(customer, values)| median(&values).map(|m| (customer.to_string(), m)))
        .collect()
}

/// Percentile of `values` (linear interpolation) and how many values lie
/// strictly above it
pub fn count_above_percentile(values: &[f64], quantile: f64) -> Option<(f64, usize)> {
    let threshold = percentile_linear(values, quantile)?;
    let above = values.iter().filter(|&&v| v > threshold).count();
    Some((threshold, above))
}

/// Customers whose vendor-diversity median exceeds a percentile of all medians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VendorOutliers {
    pub customers: usize,
    pub quantile: f64,
    pub threshold: f64,
    pub outliers: usize,
}

impl fmt::Display for VendorOutliers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Customers:               {}", self.customers)?;
        writeln!(
            f,
            "  P{:<2} of medians:         {:.3}",
            (self.quantile * 100.0).round(),
            self.threshold
        )?;
        write!(f, "  Customers strictly above: {}", self.outliers)
    }
}

/// Count customers with unusually many distinct vendors per hour
pub fn vendor_diversity_outliers(table: &TransactionTable, quantile: f64) -> Outcome<VendorOutliers> {
    let medians: Vec<f64> = customer_vendor_medians(table)
        .into_iter()
        .map(|(_, m)| m)
        .collect();

    match count_above_percentile(&medians, quantile) {
        Some((threshold, outliers)) => Outcome::Value(VendorOutliers {
            customers: medians.len(),
            quantile,
            threshold,
            outliers,
        }),
        None => Outcome::NoData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;
    use crate::transaction::Transaction;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    fn tx(customer: &str, vendor: &str, hour: u32, minute: u32) -> Transaction {
        let ts = Utc.with_ymd_and_hms(2024, 10, 1, hour, minute, 0).unwrap();
        Transaction::new(format!("{customer}-{hour}-{minute}"), customer, Currency::usd(), Some(5.0), ts)
            .with_vendor(vendor, "retail")
    }

    #[test]
    fn test_customer_hour_rate() {
        let table = TransactionTable::new(vec![
            tx("a", "v1", 10, 0),
            tx("a", "v1", 10, 30),
            tx("a", "v2", 11, 5),
            tx("b", "v1", 10, 59),
        ]);
        let rate = customer_hour_rate(&table);

        assert_eq!(rate.transactions, 4);
        assert_eq!(rate.customer_hours, 3);
        assert_relative_eq!(rate.mean.unwrap(), 4.0 / 3.0);
    }

    #[test]
    fn test_customer_hour_rate_empty() {
        let rate = customer_hour_rate(&TransactionTable::default());
        assert_eq!(rate.mean, None);
        assert!(rate.to_string().contains("not computable"));
    }

    #[test]
    fn test_vendor_medians_weight_by_transaction() {
        // Customer a: hour 10 has 3 txs across 2 vendors, hour 11 one tx
        // Row values: [2, 2, 2, 1] -> median 2
        let table = TransactionTable::new(vec![
            tx("a", "v1", 10, 0),
            tx("a", "v2", 10, 10),
            tx("a", "v2", 10, 20),
            tx("a", "v3", 11, 0),
            tx("b", "v1", 10, 0),
        ]);
        let medians = customer_vendor_medians(&table);

        assert_eq!(medians, vec![("a".to_string(), 2.0), ("b".to_string(), 1.0)]);
    }

    #[test]
    fn test_count_above_p95() {
        let medians: Vec<f64> = (1..=10).map(f64::from).collect();
        let (threshold, above) = count_above_percentile(&medians, 0.95).unwrap();

        assert_relative_eq!(threshold, 9.55, epsilon = 1e-12);
        assert_eq!(above, 1);
    }

    #[test]
    fn test_vendor_outliers() {
        let mut rows = Vec::new();
        for c in 0..9 {
            rows.push(tx(&format!("c{c}"), "v1", 9, 0));
        }
        // c9 visits four vendors in one hour
        for (m, v) in ["v1", "v2", "v3", "v4"].iter().enumerate() {
            rows.push(tx("c9", v, 9, m as u32));
        }
        let outliers = vendor_diversity_outliers(&TransactionTable::new(rows), 0.95)
            .into_value()
            .unwrap();

        assert_eq!(outliers.customers, 10);
        assert_eq!(outliers.outliers, 1);
    }

    #[test]
    fn test_vendor_outliers_empty() {
        assert_eq!(
            vendor_diversity_outliers(&TransactionTable::default(), 0.95),
            Outcome::NoData
        );
    }
}
