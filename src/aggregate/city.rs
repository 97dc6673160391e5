//! Average spend per city, overall and within a vendor category

use crate::stats::mean;
use crate::transaction::{Transaction, TransactionTable};
use crate::types::{fmt_opt, Outcome};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Mean transaction amount for one city group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityAverage {
    /// `None` is the group of transactions without a city
    pub city: Option<String>,
    pub transactions: usize,
    /// Mean of the non-missing amounts; `None` if every amount was missing
    pub mean_amount: Option<f64>,
}

impl CityAverage {
    pub fn label(&self) -> &str {
        self.city.as_deref().unwrap_or("<unknown>")
    }
}

impl fmt::Display for CityAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<24} {:>12}", self.label(), fmt_opt(self.mean_amount, 2))
    }
}

/// Per-city means plus the top-N ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityAverages {
    /// All groups in first-seen order
    pub groups: Vec<CityAverage>,
    /// Highest means first
    pub top: Vec<CityAverage>,
}

impl CityAverages {
    /// City with the highest mean amount
    pub fn max(&self) -> Option<&CityAverage> {
        self.top.first().filter(|c| c.mean_amount.is_some())
    }
}

/// Group `rows` by city in first-seen order and average their amounts.
/// Rows with no city form their own group when `keep_missing` is set.
fn group_by_city<'a, I>(rows: I, keep_missing: bool) -> Vec<CityAverage>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut groups: Vec<(Option<&str>, usize, Vec<f64>)> = Vec::new();
    let mut index: HashMap<Option<&str>, usize> = HashMap::new();

    for tx in rows {
        let key = tx.city.as_deref();
        if key.is_none() && !keep_missing {
            continue;
        }
        let i = *index.entry(key).or_insert_with(|| {
            groups.push((key, 0, Vec::new()));
            groups.len() - 1
        });
        groups[i].1 += 1;
        if let Some(amount) = tx.amount {
            groups[i].2.push(amount);
        }
    }

    groups
        .into_iter()
        .map(|(city, transactions, amounts)| CityAverage {
            city: city.map(str::to_string),
            transactions,
            mean_amount: mean(&amounts),
        })
        .collect()
}

/// Highest means first; groups without a mean sort last. Stable, so equal
/// means keep first-seen order.
fn rank(groups: &[CityAverage], n: usize) -> Vec<CityAverage> {
    let mut ranked = groups.to_vec();
    ranked.sort_by(|a, b| match (a.mean_amount, b.mean_amount) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ranked.truncate(n);
    ranked
}

/// Mean amount per city (missing city kept as a group) and the top `n`
pub fn city_averages(table: &TransactionTable, n: usize) -> Outcome<CityAverages> {
    if table.is_empty() {
        return Outcome::NoData;
    }
    let groups = group_by_city(table, true);
    let top = rank(&groups, n);
    Outcome::Value(CityAverages { groups, top })
}

/// Top cities by mean amount among transactions of one vendor category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRanking {
    pub category: String,
    /// Transactions whose vendor type matched
    pub matched: usize,
    pub cities: Vec<CityAverage>,
}

impl fmt::Display for CategoryRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  {} transactions matching '{}'",
            self.matched, self.category
        )?;
        for city in &self.cities {
            write!(f, "\n  {}", city)?;
        }
        Ok(())
    }
}

/// Rank cities by mean amount among transactions whose `vendor_type`
/// contains `category` (case-insensitive).
///
/// Returns `NoMatches` when no vendor type matches. Rows without a city
/// are left out of the ranking.
pub fn category_city_ranking(
    table: &TransactionTable,
    category: &str,
    n: usize,
) -> Outcome<CategoryRanking> {
    let needle = category.to_lowercase();
    let subset: Vec<&Transaction> = table
        .iter()
        .filter(|tx| tx.vendor_type.to_lowercase().contains(&needle))
        .collect();

    if subset.is_empty() {
        log::info!("No transactions with vendor type matching '{}'", category);
        return Outcome::NoMatches;
    }

    let groups = group_by_city(subset.iter().copied(), false);
    Outcome::Value(CategoryRanking {
        category: category.to_string(),
        matched: subset.len(),
        cities: rank(&groups, n),
    })
}
