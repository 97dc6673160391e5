//! USD amount distributions for fraudulent vs legitimate transactions

use crate::normalize::NormalizedTransaction;
use crate::stats::{mean, sample_std_dev};
use crate::types::{fmt_opt, Outcome};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean and sample standard deviation of a set of USD amounts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmountStats {
    /// Non-missing amounts
    pub count: usize,
    pub mean: Option<f64>,
    /// `None` below two values
    pub std_dev: Option<f64>,
}

impl fmt::Display for AmountStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    Count:              {}", self.count)?;
        writeln!(f, "    Mean (USD):         {}", fmt_opt(self.mean, 2))?;
        write!(f, "    Std deviation (USD): {}", fmt_opt(self.std_dev, 2))
    }
}

pub fn amount_stats(values: &[f64]) -> AmountStats {
    AmountStats {
        count: values.len(),
        mean: mean(values),
        std_dev: sample_std_dev(values),
    }
}

/// Amount statistics split by the fraud flag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FraudAmountStats {
    pub legit: AmountStats,
    pub fraud: AmountStats,
}

impl fmt::Display for FraudAmountStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Legitimate:")?;
        writeln!(f, "{}", self.legit)?;
        writeln!(f, "  Fraudulent:")?;
        write!(f, "{}", self.fraud)
    }
}

fn usd_values(matched: &[NormalizedTransaction], is_fraud: bool) -> Vec<f64> {
    matched
        .iter()
        .filter(|m| m.is_fraud() == is_fraud)
        .filter_map(|m| m.amount_usd)
        .collect()
}

/// Mean and sample std of `amount_usd` for each class
pub fn fraud_amount_stats(matched: &[NormalizedTransaction]) -> FraudAmountStats {
    FraudAmountStats {
        legit: amount_stats(&usd_values(matched, false)),
        fraud: amount_stats(&usd_values(matched, true)),
    }
}

/// Average USD amount of one class
pub fn mean_usd(matched: &[NormalizedTransaction], is_fraud: bool) -> Option<f64> {
    mean(&usd_values(matched, is_fraud))
}

/// Fraud and legitimate counts over shared equal-width USD bins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountHistogram {
    /// `bins + 1` ascending edges
    pub edges: Vec<f64>,
    pub legit: Vec<usize>,
    pub fraud: Vec<usize>,
}

impl AmountHistogram {
    pub fn bins(&self) -> usize {
        self.legit.len()
    }

    /// Bin holding the most legitimate transactions, as `(lower, upper, count)`
    pub fn legit_mode(&self) -> Option<(f64, f64, usize)> {
        Self::mode(&self.edges, &self.legit)
    }

    pub fn fraud_mode(&self) -> Option<(f64, f64, usize)> {
        Self::mode(&self.edges, &self.fraud)
    }

    fn mode(edges: &[f64], counts: &[usize]) -> Option<(f64, f64, usize)> {
        let (i, &count) = counts
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))?;
        Some((edges[i], edges[i + 1], count))
    }
}

impl fmt::Display for AmountHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lo, hi) = match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) => (*lo, *hi),
            _ => return write!(f, "  empty histogram"),
        };
        writeln!(f, "  {} bins over {:.2} .. {:.2} USD", self.bins(), lo, hi)?;
        for (label, mode) in [("Legitimate", self.legit_mode()), ("Fraudulent", self.fraud_mode())] {
            match mode {
                Some((a, b, n)) if n > 0 => {
                    writeln!(f, "  {} busiest bin: {:.2} .. {:.2} ({} transactions)", label, a, b, n)?
                }
                _ => writeln!(f, "  {} busiest bin: none", label)?,
            }
        }
        Ok(())
    }
}

/// Histogram of `amount_usd` split by fraud flag.
///
/// Both classes share one set of `bins` equal-width bins spanning the full
/// USD range, so their shapes can be compared directly. `NoData` when no
/// matched row has a USD amount or `bins` is zero.
pub fn amount_histogram(matched: &[NormalizedTransaction], bins: usize) -> Outcome<AmountHistogram> {
    let values: Vec<f64> = matched
        .iter()
        .filter_map(|m| m.amount_usd)
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() || bins == 0 {
        return Outcome::NoData;
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

    let mut legit = vec![0usize; bins];
    let mut fraud = vec![0usize; bins];
    for m in matched {
        let Some(v) = m.amount_usd.filter(|v| v.is_finite()) else {
            continue;
        };
        // The top edge belongs to the last bin
        let bin = (((v - lo) / width).floor() as usize).min(bins - 1);
        if m.is_fraud() {
            fraud[bin] += 1;
        } else {
            legit[bin] += 1;
        }
    }

    Outcome::Value(AmountHistogram { edges, legit, fraud })
}
