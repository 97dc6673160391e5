//! CSV loaders for the transaction table and the wide exchange-rate table

use super::coerce::{is_missing, parse_amount, parse_bool, parse_date, parse_rate, parse_timestamp};
use crate::currency::Currency;
use crate::error::{AnalyticsError, Result};
use crate::fx::ExchangeRateWide;
use crate::transaction::{Transaction, TransactionTable};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;

/// Column names of the transaction CSV
#[derive(Debug, Clone)]
pub struct TransactionCsvFormat {
    pub id_column: String,
    pub customer_column: String,
    pub vendor_column: String,
    pub vendor_type_column: String,
    pub country_column: String,
    pub city_column: String,
    pub currency_column: String,
    pub amount_column: String,
    pub timestamp_column: String,
    pub fraud_column: String,
    pub high_risk_column: String,
    /// Field delimiter
    pub delimiter: u8,
}

impl Default for TransactionCsvFormat {
    fn default() -> Self {
        Self {
            id_column: "transaction_id".to_string(),
            customer_column: "customer_id".to_string(),
            vendor_column: "vendor".to_string(),
            vendor_type_column: "vendor_type".to_string(),
            country_column: "country".to_string(),
            city_column: "city".to_string(),
            currency_column: "currency".to_string(),
            amount_column: "amount".to_string(),
            timestamp_column: "timestamp".to_string(),
            fraud_column: "is_fraud".to_string(),
            high_risk_column: "is_high_risk_vendor".to_string(),
            delimiter: b',',
        }
    }
}

struct TransactionColumns {
    id: usize,
    customer: usize,
    vendor: usize,
    vendor_type: usize,
    country: usize,
    city: usize,
    currency: usize,
    amount: usize,
    timestamp: usize,
    fraud: usize,
    high_risk: usize,
}

/// Loads transaction CSV files into a `TransactionTable`
#[derive(Debug, Clone, Default)]
pub struct TransactionLoader {
    format: TransactionCsvFormat,
}

impl TransactionLoader {
    /// Create new loader with default column names
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom format
    pub fn with_format(format: TransactionCsvFormat) -> Self {
        Self { format }
    }

    /// Load CSV file into a table
    pub fn load_csv(&self, path: &Path) -> Result<TransactionTable> {
        let file = std::fs::File::open(path).map_err(|e| {
            AnalyticsError::DataError(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let table = self.load_from_reader(file)?;
        log::info!("Loaded {} transactions from {}", table.len(), path.display());
        Ok(table)
    }

    /// Load CSV data from any reader
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<TransactionTable> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.format.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let fmt = &self.format;
        let columns = TransactionColumns {
            id: find_column(&headers, &fmt.id_column)?,
            customer: find_column(&headers, &fmt.customer_column)?,
            vendor: find_column(&headers, &fmt.vendor_column)?,
            vendor_type: find_column(&headers, &fmt.vendor_type_column)?,
            country: find_column(&headers, &fmt.country_column)?,
            city: find_column(&headers, &fmt.city_column)?,
            currency: find_column(&headers, &fmt.currency_column)?,
            amount: find_column(&headers, &fmt.amount_column)?,
            timestamp: find_column(&headers, &fmt.timestamp_column)?,
            fraud: find_column(&headers, &fmt.fraud_column)?,
            high_risk: find_column(&headers, &fmt.high_risk_column)?,
        };

        let mut rows = Vec::new();
        let mut coerced_amounts = 0usize;

        for result in rdr.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());
            let field = |idx: usize| record.get(idx).unwrap_or("");

            let timestamp = parse_timestamp(field(columns.timestamp)).ok_or_else(|| {
                AnalyticsError::ParseError {
                    line,
                    column: fmt.timestamp_column.clone(),
                    message: format!("invalid timestamp '{}'", field(columns.timestamp)),
                }
            })?;

            let is_fraud = parse_flag(field(columns.fraud), line, &fmt.fraud_column)?;
            let is_high_risk_vendor =
                parse_flag(field(columns.high_risk), line, &fmt.high_risk_column)?;

            let raw_amount = field(columns.amount);
            let amount = parse_amount(raw_amount);
            if amount.is_none() && !is_missing(raw_amount) {
                log::debug!("Line {}: amount '{}' is not numeric, treating as missing", line, raw_amount);
                coerced_amounts += 1;
            }

            let city = field(columns.city);
            let country = field(columns.country);
            rows.push(Transaction {
                id: field(columns.id).to_string(),
                customer_id: field(columns.customer).to_string(),
                vendor: field(columns.vendor).to_string(),
                vendor_type: field(columns.vendor_type).to_string(),
                country: if is_missing(country) {
                    String::new()
                } else {
                    country.to_string()
                },
                city: (!is_missing(city)).then(|| city.to_string()),
                currency: Currency::new(field(columns.currency)),
                amount,
                timestamp,
                is_fraud,
                is_high_risk_vendor,
            });
        }

        if coerced_amounts > 0 {
            log::warn!(
                "{} amounts could not be parsed and are treated as missing",
                coerced_amounts
            );
        }

        Ok(TransactionTable::new(rows))
    }
}

/// Column layout of the wide exchange-rate CSV
#[derive(Debug, Clone)]
pub struct RateCsvFormat {
    /// Date column; every other column is a currency code
    pub date_column: String,
    /// Date format string (e.g., "%Y-%m-%d")
    pub date_format: String,
    pub delimiter: u8,
}

impl Default for RateCsvFormat {
    fn default() -> Self {
        Self {
            date_column: "date".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            delimiter: b',',
        }
    }
}

/// Loads a wide exchange-rate CSV (`date,EUR,GBP,...`)
#[derive(Debug, Clone, Default)]
pub struct RateLoader {
    format: RateCsvFormat,
}

impl RateLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(format: RateCsvFormat) -> Self {
        Self { format }
    }

    pub fn load_csv(&self, path: &Path) -> Result<ExchangeRateWide> {
        let file = std::fs::File::open(path).map_err(|e| {
            AnalyticsError::DataError(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let wide = self.load_from_reader(file)?;
        log::info!(
            "Loaded {} rate dates x {} currencies from {}",
            wide.num_rows(),
            wide.currencies().len(),
            path.display()
        );
        Ok(wide)
    }

    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<ExchangeRateWide> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.format.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let date_idx = find_column(&headers, &self.format.date_column)?;
        let currency_columns: Vec<(usize, Currency)> = headers
            .iter()
            .enumerate()
            .filter(|(i, name)| *i != date_idx && !name.is_empty())
            .map(|(i, name)| (i, Currency::new(name)))
            .collect();

        let mut wide =
            ExchangeRateWide::new(currency_columns.iter().map(|(_, c)| c.clone()).collect());

        for result in rdr.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());
            let raw_date = record.get(date_idx).unwrap_or("");
            let date = parse_date(raw_date, &self.format.date_format).ok_or_else(|| {
                AnalyticsError::ParseError {
                    line,
                    column: self.format.date_column.clone(),
                    message: format!("invalid date '{}'", raw_date),
                }
            })?;

            let values = currency_columns
                .iter()
                .map(|(i, _)| record.get(*i).and_then(parse_rate))
                .collect();
            wide.push_row(date, values)?;
        }

        Ok(wide)
    }
}

fn parse_flag(raw: &str, line: u64, column: &str) -> Result<bool> {
    parse_bool(raw).ok_or_else(|| AnalyticsError::ParseError {
        line,
        column: column.to_string(),
        message: format!("invalid boolean '{}'", raw),
    })
}

/// Find column index by name
fn find_column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| AnalyticsError::MissingColumn(name.to_string()))
}
