//! # fraud_fx_stats
//!
//! Fraud-rate statistics and USD-normalized amount aggregates over a card
//! transaction dataset.
//!
//! Transactions are quoted in many currencies. A wide table of daily
//! exchange rates is reshaped into `(date, currency, rate)` rows, each
//! transaction is joined on its UTC date and currency, and amounts are
//! converted to USD. Fraud ratios, per-city averages and velocity metrics
//! are computed over the transaction table; amount distributions over the
//! USD-normalized rows.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use fraud_fx_stats::prelude::*;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
//! let mut wide = ExchangeRateWide::new(vec![Currency::new("EUR")]);
//! wide.push_row(date, vec![Some(0.5)]).unwrap();
//! let rates = reshape(&wide).unwrap();
//!
//! let ts = Utc.with_ymd_and_hms(2024, 10, 1, 9, 0, 0).unwrap();
//! let table = TransactionTable::new(vec![
//!     Transaction::new("tx-1", "c1", Currency::new("EUR"), Some(10.0), ts),
//! ]);
//!
//! let normalization = normalize(&table, &rates);
//! assert_eq!(normalization.matched[0].amount_usd, Some(20.0));
//!
//! let report = Analysis::default().run(&table, &rates);
//! assert_eq!(report.fraud_ratio.ratio(), Some(0.0));
//! ```

pub mod aggregate;
pub mod analysis;
#[cfg(feature = "plot")]
pub mod chart;
pub mod config;
pub mod currency;
pub mod data;
pub mod error;
pub mod fx;
pub mod normalize;
pub mod stats;
pub mod transaction;
pub mod types;

pub mod prelude {
    //! Commonly used types and functions
    pub use crate::aggregate::*;
    pub use crate::analysis::{Analysis, AnalysisReport};
    pub use crate::config::AnalysisConfig;
    pub use crate::currency::Currency;
    pub use crate::data::{RateLoader, TransactionLoader};
    pub use crate::error::{AnalyticsError, Result};
    pub use crate::fx::{reshape, ExchangeRateLong, ExchangeRateWide, RateLookup, RateRow};
    pub use crate::normalize::{normalize, NormalizedTransaction, Normalization, UnmatchedReport};
    pub use crate::transaction::{TableStats, Transaction, TransactionTable};
    pub use crate::types::*;
}
