//! Aggregators over transaction tables
//!
//! Each reducer is a pure function of its input slice. Empty inputs give an
//! explicit "no data" result, never a panic or a NaN.

pub mod amounts;
pub mod city;
pub mod fraud;
pub mod velocity;

pub use amounts::{
    amount_histogram, amount_stats, fraud_amount_stats, mean_usd, AmountHistogram, AmountStats,
    FraudAmountStats,
};
pub use city::{category_city_ranking, city_averages, CategoryRanking, CityAverage, CityAverages};
pub use fraud::{
    fraud_ratio, high_risk_fraud_ratio, top_fraud_countries, CountryCount, FraudRatio,
};
pub use velocity::{
    count_above_percentile, customer_hour_rate, customer_vendor_medians,
    vendor_diversity_outliers, CustomerHourRate, VendorOutliers,
};
