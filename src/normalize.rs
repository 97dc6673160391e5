//! Currency normalization: join transactions against daily rates and
//! convert amounts to USD.

use crate::currency::Currency;
use crate::fx::RateLookup;
use crate::transaction::{Transaction, TransactionTable};
use crate::types::Rate;
use chrono::NaiveDate;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A transaction that resolved to exactly one rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    pub transaction: Transaction,
    /// Join key derived from the UTC timestamp
    pub date: NaiveDate,
    /// Units of the transaction currency per 1 USD
    pub rate: Rate,
    /// `amount / rate`; `None` when the amount itself is missing
    pub amount_usd: Option<f64>,
}

impl NormalizedTransaction {
    pub fn is_fraud(&self) -> bool {
        self.transaction.is_fraud
    }
}

/// Partition of a transaction table into USD-convertible and unresolved rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    pub matched: Vec<NormalizedTransaction>,
    pub unmatched: TransactionTable,
}

impl Normalization {
    /// Diagnostic summary of the rows that found no rate
    pub fn unmatched_report(&self) -> UnmatchedReport {
        let mut currencies: Vec<Currency> = Vec::new();
        let mut dates: Vec<NaiveDate> = Vec::new();
        let mut seen_currencies: HashSet<&Currency> = HashSet::new();
        let mut seen_dates: HashSet<NaiveDate> = HashSet::new();

        for tx in self.unmatched.iter() {
            if seen_currencies.insert(&tx.currency) {
                currencies.push(tx.currency.clone());
            }
            let date = tx.date();
            if seen_dates.insert(date) {
                dates.push(date);
            }
        }

        UnmatchedReport {
            count: self.unmatched.len(),
            currencies,
            dates,
        }
    }

    /// Matched rows as a plain transaction table (USD values dropped)
    pub fn matched_table(&self) -> TransactionTable {
        TransactionTable::new(self.matched.iter().map(|m| m.transaction.clone()).collect())
    }

    pub fn total(&self) -> usize {
        self.matched.len() + self.unmatched.len()
    }
}

/// Count plus the distinct offending currencies and dates, in first-seen order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedReport {
    pub count: usize,
    pub currencies: Vec<Currency>,
    pub dates: Vec<NaiveDate>,
}

impl UnmatchedReport {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl fmt::Display for UnmatchedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "All transactions resolved to an exchange rate");
        }
        let currencies: Vec<&str> = self.currencies.iter().map(|c| c.code()).collect();
        let dates: Vec<String> = self.dates.iter().map(|d| d.to_string()).collect();
        writeln!(f, "No exchange rate for {} transactions", self.count)?;
        writeln!(f, "  Currencies without rate: {}", currencies.join(", "))?;
        write!(f, "  Dates without rate:      {}", dates.join(", "))
    }
}

/// Join `transactions` against `rates` on `(UTC date, currency)`.
///
/// Every input row lands in exactly one side of the result: `matched`
/// when a quote exists for its date and currency, `unmatched` otherwise.
/// Both sides keep input order. Unmatched rows are a diagnostic, not an
/// error; they are logged and left out of USD aggregates.
pub fn normalize<R: RateLookup + ?Sized>(
    transactions: &TransactionTable,
    rates: &R,
) -> Normalization {
    let mut matched = Vec::with_capacity(transactions.len());
    let mut unmatched = Vec::new();

    for tx in transactions {
        let date = tx.date();
        match rates.get_rate(date, &tx.currency) {
            Some(rate) => matched.push(NormalizedTransaction {
                transaction: tx.clone(),
                date,
                rate,
                amount_usd: tx.amount.map(|amount| amount / rate),
            }),
            None => unmatched.push(tx.clone()),
        }
    }

    let normalization = Normalization {
        matched,
        unmatched: TransactionTable::new(unmatched),
    };

    log::info!(
        "Normalized {} of {} transactions to USD",
        normalization.matched.len(),
        transactions.len()
    );

    let report = normalization.unmatched_report();
    if !report.is_empty() {
        log::warn!(
            "No exchange rate for {} transactions (currencies: {:?}, dates: {})",
            report.count,
            report.currencies.iter().map(|c| c.code()).collect::<Vec<_>>(),
            report.dates.len()
        );
    }

    normalization
}
