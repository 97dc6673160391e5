//! Core types and constants

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type used throughout the library
pub type Timestamp = DateTime<Utc>;

/// Monetary amount in a transaction's own currency
pub type Amount = f64;

/// Exchange rate quoted as units of currency per 1 USD
pub type Rate = f64;

/// Result of a reducer that may have nothing to reduce.
///
/// `NoData` and `NoMatches` are distinct so that a report can tell
/// "the input was empty" apart from "a filter selected nothing", and
/// neither renders like a zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    Value(T),
    NoData,
    NoMatches,
}

impl<T> Outcome<T> {
    /// Borrow the computed value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    /// Text shown in place of a missing value
    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Value(_) => "value",
            Outcome::NoData => "no data",
            Outcome::NoMatches => "no matching transactions",
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Value(v) => Outcome::Value(f(v)),
            Outcome::NoData => Outcome::NoData,
            Outcome::NoMatches => Outcome::NoMatches,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Value(v) => write!(f, "{}", v),
            other => f.write_str(other.status()),
        }
    }
}

/// Format an optional number, rendering `None` as "not computable"
pub fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", precision, v),
        _ => "not computable".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let v: Outcome<u32> = Outcome::Value(3);
        assert_eq!(v.value(), Some(&3));
        assert!(v.is_value());
        assert_eq!(v.map(|x| x * 2), Outcome::Value(6));

        let none: Outcome<u32> = Outcome::NoMatches;
        assert!(none.value().is_none());
        assert_eq!(none.map(|x| x * 2), Outcome::NoMatches);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::<u32>::NoData.to_string(), "no data");
        assert_eq!(
            Outcome::<u32>::NoMatches.to_string(),
            "no matching transactions"
        );
        assert_eq!(Outcome::Value(7).to_string(), "7");
    }

    #[test]
    fn test_fmt_opt() {
        assert_eq!(fmt_opt(Some(1.23456), 2), "1.23");
        assert_eq!(fmt_opt(None, 2), "not computable");
        assert_eq!(fmt_opt(Some(f64::NAN), 2), "not computable");
    }
}
