//! fraud-fx-stats CLI - fraud statistics over a transaction dataset
//!
//! ## Example Usage
//!
//! ```bash
//! # Full report as text
//! fraud-fx-stats report --transactions txs.csv --rates rates.csv
//!
//! # Full report as JSON
//! fraud-fx-stats report -t txs.csv -r rates.csv --json report.json
//!
//! # Which transactions have no exchange rate
//! fraud-fx-stats normalize -t txs.csv -r rates.csv
//!
//! # Reshape summary of the rate table
//! fraud-fx-stats rates -r rates.csv
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use fraud_fx_stats::aggregate::mean_usd;
use fraud_fx_stats::analysis::Analysis;
use fraud_fx_stats::config::AnalysisConfig;
use fraud_fx_stats::data::{RateLoader, TransactionLoader};
use fraud_fx_stats::fx::{reshape, ExchangeRateLong};
use fraud_fx_stats::normalize::normalize;
use fraud_fx_stats::transaction::TransactionTable;
use fraud_fx_stats::types::fmt_opt;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

/// fraud-fx-stats: fraud ratios and USD-normalized amount statistics
#[derive(Parser)]
#[command(name = "fraud-fx-stats")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fraud statistics over multi-currency transaction data", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute every metric
    Report {
        /// Transaction CSV
        #[arg(short = 't', long)]
        transactions: Option<PathBuf>,

        /// Wide exchange-rate CSV
        #[arg(short = 'r', long)]
        rates: Option<PathBuf>,

        /// Write the report as JSON to this file instead of printing text
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,

        /// Write the amount histogram PNG (requires the `plot` feature)
        #[arg(long, value_name = "FILE")]
        chart: Option<PathBuf>,
    },

    /// Show transactions without an exchange rate and per-class USD means
    Normalize {
        #[arg(short = 't', long)]
        transactions: Option<PathBuf>,

        #[arg(short = 'r', long)]
        rates: Option<PathBuf>,
    },

    /// Reshape the rate table and summarize it
    Rates {
        #[arg(short = 'r', long)]
        rates: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = AnalysisConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")
        .and_then(|config| {
            if cli.verbose {
                println!(
                    "{} v{}",
                    "fraud-fx-stats".cyan().bold(),
                    env!("CARGO_PKG_VERSION")
                );
            }
            match cli.command {
                Commands::Report {
                    transactions,
                    rates,
                    json,
                    chart,
                } => run_report(config, transactions, rates, json, chart),
                Commands::Normalize {
                    transactions,
                    rates,
                } => run_normalize(&config, transactions, rates),
                Commands::Rates { rates } => run_rates(&config, rates),
            }
        });

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

/// Command-line path, else the configured one
fn resolve(arg: Option<PathBuf>, configured: &Option<PathBuf>, what: &str) -> Result<PathBuf> {
    arg.or_else(|| configured.clone()).ok_or_else(|| {
        anyhow!(
            "No {} file given; pass it on the command line or set it in the config",
            what
        )
    })
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn load_rates(path: &Path) -> Result<ExchangeRateLong> {
    let wide = RateLoader::new()
        .load_csv(path)
        .with_context(|| format!("Failed to load rates from {}", path.display()))?;
    reshape(&wide).context("Failed to reshape exchange rates")
}

fn load_inputs(
    transactions: &Path,
    rates: &Path,
) -> Result<(TransactionTable, ExchangeRateLong)> {
    let pb = spinner("Loading transactions...");
    let table = TransactionLoader::new()
        .load_csv(transactions)
        .with_context(|| format!("Failed to load transactions from {}", transactions.display()));
    let table = match table {
        Ok(table) => table,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.set_message("Loading exchange rates...");
    let long = load_rates(rates);
    pb.finish_and_clear();
    Ok((table, long?))
}

fn section(title: &str) {
    println!("{}", title.green().bold());
    println!("{}", "=".repeat(title.len()).green());
}

fn run_report(
    config: AnalysisConfig,
    transactions: Option<PathBuf>,
    rates: Option<PathBuf>,
    json: Option<PathBuf>,
    chart: Option<PathBuf>,
) -> Result<()> {
    let transactions = resolve(transactions, &config.transactions_path, "transactions")?;
    let rates = resolve(rates, &config.rates_path, "rates")?;
    let chart = chart.or_else(|| config.chart_path.clone());

    let analysis = Analysis::new(config).context("Invalid analysis configuration")?;

    let start = Instant::now();
    let (table, long) = load_inputs(&transactions, &rates)?;
    let report = analysis.run(&table, &long);

    match json {
        Some(path) => {
            let contents = serde_json::to_string_pretty(&report)?;
            fs::write(&path, contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} {}", "Report written to".green(), path.display());
        }
        None => {
            for (title, body) in report.sections() {
                section(title);
                println!("{}", body);
                println!();
            }
        }
    }

    if let Some(path) = chart {
        write_chart(&report, &path)?;
    }

    log::info!("Report finished in {:.2?}", start.elapsed());
    Ok(())
}

#[cfg(feature = "plot")]
fn write_chart(report: &fraud_fx_stats::analysis::AnalysisReport, path: &Path) -> Result<()> {
    match report.amount_histogram.value() {
        Some(histogram) => {
            fraud_fx_stats::chart::draw_amount_histogram(histogram, path)?;
            println!("{} {}", "Chart written to".green(), path.display());
        }
        None => println!(
            "{} no USD amounts to plot",
            "Warning:".yellow()
        ),
    }
    Ok(())
}

#[cfg(not(feature = "plot"))]
fn write_chart(_report: &fraud_fx_stats::analysis::AnalysisReport, path: &Path) -> Result<()> {
    eprintln!(
        "{} built without the `plot` feature; skipping chart {}",
        "Warning:".yellow(),
        path.display()
    );
    Ok(())
}

fn run_normalize(
    config: &AnalysisConfig,
    transactions: Option<PathBuf>,
    rates: Option<PathBuf>,
) -> Result<()> {
    let transactions = resolve(transactions, &config.transactions_path, "transactions")?;
    let rates = resolve(rates, &config.rates_path, "rates")?;
    let (table, long) = load_inputs(&transactions, &rates)?;

    let normalization = normalize(&table, &long);
    let report = normalization.unmatched_report();

    section("Currency normalization");
    println!(
        "  {} {} of {}",
        "Matched:".bold(),
        normalization.matched.len(),
        normalization.total()
    );
    if report.is_empty() {
        println!("  {}", report.to_string().bright_green());
    } else {
        println!("{}", report.to_string().yellow());
    }
    println!();

    section("Mean amount (USD)");
    println!(
        "  {} {}",
        "Legitimate:".bold(),
        fmt_opt(mean_usd(&normalization.matched, false), 2)
    );
    println!(
        "  {} {}",
        "Fraudulent:".bold(),
        fmt_opt(mean_usd(&normalization.matched, true), 2)
    );
    Ok(())
}

fn run_rates(config: &AnalysisConfig, rates: Option<PathBuf>) -> Result<()> {
    let path = resolve(rates, &config.rates_path, "rates")?;
    let wide = RateLoader::new()
        .load_csv(&path)
        .with_context(|| format!("Failed to load rates from {}", path.display()))?;
    let long = reshape(&wide).context("Failed to reshape exchange rates")?;

    section("Exchange rates");
    println!("  {} {}", "Dates:".bold(), wide.num_rows());
    println!("  {} {}", "Currency columns:".bold(), wide.currencies().len());
    println!("  {} {}", "Quoted rates:".bold(), long.len());
    println!(
        "  {} {}",
        "Missing cells:".bold(),
        wide.num_rows() * wide.currencies().len() - wide.quoted_cells()
    );
    if let Some((start, end)) = long.date_range() {
        println!("  {} {} .. {}", "Range:".bold(), start, end);
    }
    let currencies: Vec<String> = long.currencies().iter().map(|c| c.to_string()).collect();
    println!("  {} {}", "Currencies:".bold(), currencies.join(", "));
    Ok(())
}
