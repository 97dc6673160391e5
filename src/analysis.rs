//! One analysis run: normalize the transactions and compute every metric

use crate::aggregate::{
    amount_histogram, category_city_ranking, city_averages, customer_hour_rate,
    fraud_amount_stats, fraud_ratio, high_risk_fraud_ratio, mean_usd, top_fraud_countries,
    vendor_diversity_outliers, AmountHistogram, CategoryRanking, CityAverages, CountryCount,
    CustomerHourRate, FraudAmountStats, FraudRatio, VendorOutliers,
};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::fx::RateLookup;
use crate::normalize::{normalize, UnmatchedReport};
use crate::transaction::{TableStats, TransactionTable};
use crate::types::{fmt_opt, Outcome};
use serde::Serialize;
use std::fmt::{self, Write as _};

/// Every metric of a run, ready to print or serialize
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub stats: TableStats,
    pub fraud_ratio: FraudRatio,
    pub top_fraud_countries: Outcome<Vec<CountryCount>>,
    pub customer_hour_rate: CustomerHourRate,
    pub high_risk_fraud_ratio: FraudRatio,
    pub city_averages: Outcome<CityAverages>,
    pub category_ranking: Outcome<CategoryRanking>,
    pub vendor_outliers: Outcome<VendorOutliers>,
    pub unmatched: UnmatchedReport,
    pub amount_stats: FraudAmountStats,
    /// Average legitimate transaction in USD
    pub legit_mean_usd: Option<f64>,
    pub amount_histogram: Outcome<AmountHistogram>,
}

impl AnalysisReport {
    /// Report sections as `(title, body)` pairs, in print order
    pub fn sections(&self) -> Vec<(&'static str, String)> {
        let mut sections = Vec::new();

        sections.push(("Dataset", format_stats(&self.stats)));
        sections.push(("Fraud ratio", self.fraud_ratio.to_string()));
        sections.push(("Top fraud countries", format_countries(&self.top_fraud_countries)));
        sections.push(("Transactions per customer-hour", self.customer_hour_rate.to_string()));

        let mut high_risk = self.high_risk_fraud_ratio.to_string();
        let _ = write!(
            high_risk,
            "\n  Ratio (0 when empty): {:.4}",
            self.high_risk_fraud_ratio.ratio_or_zero()
        );
        sections.push(("High-risk vendors", high_risk));

        sections.push(("Average amount by city", format_cities(&self.city_averages)));
        sections.push(("Category ranking", indent_outcome(&self.category_ranking)));
        sections.push(("Vendor diversity outliers", indent_outcome(&self.vendor_outliers)));
        sections.push(("Currency normalization", self.unmatched.to_string()));

        let mut amounts = self.amount_stats.to_string();
        let _ = write!(
            amounts,
            "\n  Average legitimate transaction (USD): {}",
            fmt_opt(self.legit_mean_usd, 2)
        );
        sections.push(("Amounts in USD", amounts));
        sections.push(("Amount histogram", indent_outcome(&self.amount_histogram)));

        sections
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (title, body)) in self.sections().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "== {} ==", title)?;
            writeln!(f, "{}", body)?;
        }
        Ok(())
    }
}

fn format_stats(stats: &TableStats) -> String {
    let currencies: Vec<&str> = stats.currencies.iter().map(|c| c.code()).collect();
    let range = match (stats.start_date, stats.end_date) {
        (Some(start), Some(end)) => format!("{} .. {}", start, end),
        _ => "none".to_string(),
    };
    format!(
        "  Transactions:     {}\n  Customers:        {}\n  Missing amounts:  {}\n  Currencies:       {}\n  Date range:       {}",
        stats.row_count,
        stats.customer_count,
        stats.missing_amounts,
        currencies.join(", "),
        range
    )
}

fn format_countries(outcome: &Outcome<Vec<CountryCount>>) -> String {
    match outcome {
        Outcome::Value(countries) => countries
            .iter()
            .map(|c| format!("  {}", c))
            .collect::<Vec<_>>()
            .join("\n"),
        other => format!("  {}", other.status()),
    }
}

fn format_cities(outcome: &Outcome<CityAverages>) -> String {
    match outcome {
        Outcome::Value(averages) => {
            let mut out = String::new();
            if let Some(max) = averages.max() {
                let _ = writeln!(
                    out,
                    "  Highest average: {} ({})",
                    max.label(),
                    fmt_opt(max.mean_amount, 2)
                );
            }
            let rows: Vec<String> = averages.top.iter().map(|c| format!("  {}", c)).collect();
            out.push_str(&rows.join("\n"));
            out
        }
        other => format!("  {}", other.status()),
    }
}

fn indent_outcome<T: fmt::Display>(outcome: &Outcome<T>) -> String {
    match outcome {
        Outcome::Value(v) => v.to_string(),
        other => format!("  {}", other.status()),
    }
}

/// Runs the full metric suite with one configuration
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    config: AnalysisConfig,
}

impl Analysis {
    /// Create a run with `config`, rejecting settings no reducer can honor
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Compute every metric over `transactions`, converting amounts with
    /// `rates`. Each reducer sees its own slice; an empty or unmatched
    /// subset shows up in its own section only.
    pub fn run<R: RateLookup + ?Sized>(
        &self,
        transactions: &TransactionTable,
        rates: &R,
    ) -> AnalysisReport {
        let cfg = &self.config;
        log::info!("Analyzing {} transactions", transactions.len());

        let stats = transactions.stats();
        let fraud = fraud_ratio(transactions);
        let countries = top_fraud_countries(transactions, cfg.top_countries);
        let hourly = customer_hour_rate(transactions);
        let high_risk = high_risk_fraud_ratio(transactions);
        log::info!("Fraud metrics done ({} fraudulent)", fraud.fraud);

        let cities = city_averages(transactions, cfg.top_cities);
        let category = category_city_ranking(transactions, &cfg.category_filter, cfg.category_top);
        let outliers = vendor_diversity_outliers(transactions, cfg.outlier_quantile);
        log::info!("City and velocity metrics done");

        let normalization = normalize(transactions, rates);
        let amounts = fraud_amount_stats(&normalization.matched);
        let legit_mean = mean_usd(&normalization.matched, false);
        let histogram = amount_histogram(&normalization.matched, cfg.histogram_bins);
        log::info!(
            "USD metrics done over {} matched transactions",
            normalization.matched.len()
        );

        AnalysisReport {
            stats,
            fraud_ratio: fraud,
            top_fraud_countries: countries,
            customer_hour_rate: hourly,
            high_risk_fraud_ratio: high_risk,
            city_averages: cities,
            category_ranking: category,
            vendor_outliers: outliers,
            unmatched: normalization.unmatched_report(),
            amount_stats: amounts,
            legit_mean_usd: legit_mean,
            amount_histogram: histogram,
        }
    }
}
