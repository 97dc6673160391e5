//! Wide-format exchange rate table

use crate::currency::Currency;
use crate::error::{AnalyticsError, Result};
use crate::types::Rate;
use chrono::NaiveDate;

/// One row per date, one column per currency.
///
/// Cells hold units of the column's currency per 1 USD, or `None` when the
/// source had no quote for that day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeRateWide {
    currencies: Vec<Currency>,
    dates: Vec<NaiveDate>,
    cells: Vec<Vec<Option<Rate>>>,
}

impl ExchangeRateWide {
    /// Create an empty table with the given currency columns
    pub fn new(currencies: Vec<Currency>) -> Self {
        Self {
            currencies,
            dates: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// Append a row; `values` must have one entry per currency column
    pub fn push_row(&mut self, date: NaiveDate, values: Vec<Option<Rate>>) -> Result<()> {
        if values.len() != self.currencies.len() {
            return Err(AnalyticsError::DataError(format!(
                "Rate row for {} has {} values, expected {}",
                date,
                values.len(),
                self.currencies.len()
            )));
        }
        self.dates.push(date);
        self.cells.push(values);
        Ok(())
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Iterate rows as `(date, cells)`
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, &[Option<Rate>])> {
        self.dates
            .iter()
            .copied()
            .zip(self.cells.iter().map(|row| row.as_slice()))
    }

    pub fn num_rows(&self) -> usize {
        self.dates.len()
    }

    /// Number of quoted (non-missing) cells
    pub fn quoted_cells(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|v| v.is_some()).count())
            .sum()
    }
}
