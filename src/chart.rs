//! PNG histogram of USD amounts, fraud vs legitimate, with log-scale counts

use crate::aggregate::AmountHistogram;
use crate::error::{AnalyticsError, Result};
use plotters::prelude::*;
use std::path::Path;

/// Lower bound of the log-scale count axis; empty bins draw nothing
const MIN_COUNT: f64 = 0.5;

fn chart_err<E: std::fmt::Display>(e: E) -> AnalyticsError {
    AnalyticsError::ChartError(e.to_string())
}

/// Draw both classes over the shared bins of `histogram` into `output_path`
pub fn draw_amount_histogram(histogram: &AmountHistogram, output_path: &Path) -> Result<()> {
    let (lo, hi) = match (histogram.edges.first(), histogram.edges.last()) {
        (Some(lo), Some(hi)) => (*lo, *hi),
        _ => return Err(AnalyticsError::ChartError("histogram has no bins".to_string())),
    };
    let max_count = histogram
        .legit
        .iter()
        .chain(histogram.fraud.iter())
        .copied()
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let root_area = BitMapBackend::new(output_path, (1200, 800)).into_drawing_area();
    root_area.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root_area)
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .caption("Transaction amount (USD) by fraud flag", ("sans-serif", 30))
        .build_cartesian_2d(lo..hi, (MIN_COUNT..max_count * 2.0).log_scale())
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Amount (USD)")
        .y_desc("Transactions (log scale)")
        .draw()
        .map_err(chart_err)?;

    for (counts, color, label) in [
        (&histogram.legit, BLUE, "Legitimate"),
        (&histogram.fraud, RED, "Fraudulent"),
    ] {
        let bars = counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(i, &count)| {
                Rectangle::new(
                    [
                        (histogram.edges[i], MIN_COUNT),
                        (histogram.edges[i + 1], count as f64),
                    ],
                    color.mix(0.5).filled(),
                )
            });
        chart
            .draw_series(bars)
            .map_err(chart_err)?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_err)?;

    root_area.present().map_err(chart_err)?;
    log::info!("Wrote amount histogram to {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram() -> AmountHistogram {
        AmountHistogram {
            edges: vec![0.0, 50.0, 100.0, 150.0],
            legit: vec![120, 8, 0],
            fraud: vec![2, 0, 5],
        }
    }

    #[test]
    fn test_draw_amount_histogram_png() {
        let file = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .unwrap();

        draw_amount_histogram(&histogram(), file.path()).unwrap();

        let bytes = std::fs::read(file.path()).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[..4], b"\x89PNG");
    }

    #[test]
    fn test_histogram_without_bins() {
        let empty = AmountHistogram {
            edges: Vec::new(),
            legit: Vec::new(),
            fraud: Vec::new(),
        };
        let file = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .unwrap();

        let err = draw_amount_histogram(&empty, file.path()).unwrap_err();
        assert!(matches!(err, AnalyticsError::ChartError(_)));
    }
}
