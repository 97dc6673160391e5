//! Historical exchange rates
//!
//! Rates arrive in *wide* form (one row per date, one column per currency)
//! and are reshaped into *long* `(date, currency, rate)` rows that the
//! currency normalizer joins against.
//!
//! # Components
//!
//! - **base**: the `RateLookup` trait used by the join
//! - **wide**: `ExchangeRateWide`, the table as loaded
//! - **long**: `ExchangeRateLong`, unique per `(date, currency)`
//! - **reshape**: wide to long conversion
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fraud_fx_stats::currency::Currency;
//! use fraud_fx_stats::fx::{reshape, ExchangeRateWide, RateLookup};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
//! let mut wide = ExchangeRateWide::new(vec![Currency::new("EUR"), Currency::new("GBP")]);
//! wide.push_row(date, vec![Some(0.93), None]).unwrap();
//!
//! let long = reshape(&wide).unwrap();
//! assert_eq!(long.len(), 1);
//! assert_eq!(long.get_rate(date, &Currency::new("EUR")), Some(0.93));
//! assert!(!long.has_rate(date, &Currency::new("GBP")));
//! ```

pub mod base;
pub mod long;
pub mod reshape;
pub mod wide;

pub use base::RateLookup;
pub use long::{ExchangeRateLong, RateRow};
pub use reshape::reshape;
pub use wide::ExchangeRateWide;
