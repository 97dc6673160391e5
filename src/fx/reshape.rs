//! Wide to long rate reshaping

use super::long::ExchangeRateLong;
use super::wide::ExchangeRateWide;
use crate::error::Result;

/// Reshape a wide rate table into long `(date, currency, rate)` rows.
///
/// Every usable quoted cell becomes one row; missing cells are dropped so
/// that a transaction in an unquoted currency/date stays unresolved instead
/// of being converted at a made-up rate. A quoted rate that is not finite
/// and strictly positive is treated as missing and logged. Rows are emitted
/// date by date, in column order.
///
/// Fails with `DuplicateRate` when the wide table repeats a date that
/// quotes the same currency twice.
pub fn reshape(wide: &ExchangeRateWide) -> Result<ExchangeRateLong> {
    let mut long = ExchangeRateLong::new();
    let mut dropped = 0usize;

    for (date, cells) in wide.rows() {
        for (currency, cell) in wide.currencies().iter().zip(cells) {
            match *cell {
                Some(rate) if rate.is_finite() && rate > 0.0 => {
                    long.add_rate(date, currency.clone(), rate)?;
                }
                Some(rate) => {
                    log::warn!(
                        "Ignoring unusable rate {} for {} on {}",
                        rate,
                        currency,
                        date
                    );
                    dropped += 1;
                }
                None => {}
            }
        }
    }

    log::info!(
        "Reshaped {} rate rows x {} currencies into {} quotes ({} unusable)",
        wide.num_rows(),
        wide.currencies().len(),
        long.len(),
        dropped
    );

    Ok(long)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;
    use crate::error::AnalyticsError;
    use crate::fx::RateLookup;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, d).unwrap()
    }

    fn sample_wide() -> ExchangeRateWide {
        let mut wide = ExchangeRateWide::new(vec![
            Currency::new("EUR"),
            Currency::new("GBP"),
            Currency::new("JPY"),
        ]);
        wide.push_row(day(1), vec![Some(0.92), Some(0.78), None]).unwrap();
        wide.push_row(day(2), vec![None, Some(0.77), Some(149.5)]).unwrap();
        wide
    }

    #[test]
    fn test_reshape_drops_missing() {
        let long = reshape(&sample_wide()).unwrap();

        assert_eq!(long.len(), 4);
        assert!(!long.has_rate(day(1), &Currency::new("JPY")));
        assert!(!long.has_rate(day(2), &Currency::new("EUR")));
        assert_eq!(long.get_rate(day(2), &Currency::new("JPY")), Some(149.5));
    }

    #[test]
    fn test_reshape_row_order() {
        let long = reshape(&sample_wide()).unwrap();
        let order: Vec<(NaiveDate, &str)> = long
            .rows()
            .iter()
            .map(|r| (r.date, r.currency.code()))
            .collect();
        assert_eq!(
            order,
            vec![(day(1), "EUR"), (day(1), "GBP"), (day(2), "GBP"), (day(2), "JPY")]
        );
    }

    #[test]
    fn test_reshape_empty() {
        let wide = ExchangeRateWide::new(vec![Currency::new("EUR")]);
        assert!(reshape(&wide).unwrap().is_empty());
    }

    #[test]
    fn test_reshape_duplicate_date() {
        let mut wide = ExchangeRateWide::new(vec![Currency::new("EUR")]);
        wide.push_row(day(1), vec![Some(0.92)]).unwrap();
        wide.push_row(day(1), vec![Some(0.93)]).unwrap();

        let err = reshape(&wide).unwrap_err();
        assert!(matches!(err, AnalyticsError::DuplicateRate { .. }));
    }

    #[test]
    fn test_reshape_duplicate_date_without_overlap() {
        // A repeated date is only a problem if it quotes the same currency twice
        let mut wide = ExchangeRateWide::new(vec![Currency::new("EUR"), Currency::new("GBP")]);
        wide.push_row(day(1), vec![Some(0.92), None]).unwrap();
        wide.push_row(day(1), vec![None, Some(0.78)]).unwrap();

        assert_eq!(reshape(&wide).unwrap().len(), 2);
    }

    #[test]
    fn test_reshape_skips_unusable_rates() {
        let mut wide = ExchangeRateWide::new(vec![
            Currency::new("EUR"),
            Currency::new("GBP"),
            Currency::new("JPY"),
        ]);
        wide.push_row(day(1), vec![Some(0.5), Some(0.0), Some(-3.0)])
            .unwrap();
        wide.push_row(day(2), vec![Some(f64::INFINITY), Some(0.8), None])
            .unwrap();

        let long = reshape(&wide).unwrap();

        assert_eq!(long.len(), 2);
        assert_eq!(long.get_rate(day(1), &Currency::new("EUR")), Some(0.5));
        assert_eq!(long.get_rate(day(2), &Currency::new("GBP")), Some(0.8));
        assert!(!long.has_rate(day(1), &Currency::new("GBP")));
        assert!(!long.has_rate(day(1), &Currency::new("JPY")));
        assert!(!long.has_rate(day(2), &Currency::new("EUR")));
    }
}
