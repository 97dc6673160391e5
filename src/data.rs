//! Dataset loading
//!
//! CSV readers for the transaction table and the wide exchange-rate table.
//! All type coercion happens here, once, so the rest of the crate only
//! sees typed values.

pub mod coerce;
pub mod loader;

pub use loader::{RateCsvFormat, RateLoader, TransactionCsvFormat, TransactionLoader};
