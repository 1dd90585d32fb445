use chrono::NaiveDateTime;
use polars::prelude::*;
use std::fmt::Write;

use super::model::{Dataset, Measurement};
use crate::constants::export::DATE_FORMAT;
use crate::error::{AppError, Result};

/// Descriptive statistics of one column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (ddof = 1), NaN for a single value
    pub std_dev: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

/// Calculate statistics for a column of values using polars
///
/// Quartiles use linear interpolation between the closest ranks.
pub fn summarize(values: &[f64]) -> Result<ColumnSummary> {
    if values.is_empty() {
        return Err(AppError::EmptyDataset);
    }

    let series = Series::new("values".into(), values);
    let chunked = series.f64()?;

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Ok(ColumnSummary {
        count: values.len(),
        mean: chunked.mean().unwrap_or(f64::NAN),
        std_dev: chunked.std(1).unwrap_or(f64::NAN),
        min: chunked.min().unwrap_or(f64::NAN),
        p25: percentile(&sorted, 0.25),
        median: percentile(&sorted, 0.5),
        p75: percentile(&sorted, 0.75),
        max: chunked.max().unwrap_or(f64::NAN),
    })
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    let count = sorted.len();
    let idx = p * (count - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = (lo + 1).min(count - 1);
    let frac = idx - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}

/// Report shown in the statistics dialog
#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    pub columns: Vec<(Measurement, ColumnSummary)>,
    pub user_count: usize,
    pub record_count: usize,
    pub first_timestamp: NaiveDateTime,
    pub last_timestamp: NaiveDateTime,
}

/// Summary statistics over the sensor table
pub fn describe(dataset: &Dataset) -> Result<StatsReport> {
    profiling::scope!("describe");
    let (first_timestamp, last_timestamp) = dataset.date_range().ok_or(AppError::EmptyDataset)?;

    let columns = Measurement::ALL
        .iter()
        .map(|&m| Ok((m, summarize(&dataset.values(m))?)))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(records = dataset.sensors().len(), "Computed descriptive statistics");
    Ok(StatsReport {
        columns,
        user_count: dataset.users().len(),
        record_count: dataset.sensors().len(),
        first_timestamp,
        last_timestamp,
    })
}

impl StatsReport {
    pub fn column(&self, measurement: Measurement) -> Option<&ColumnSummary> {
        self.columns
            .iter()
            .find(|(m, _)| *m == measurement)
            .map(|(_, summary)| summary)
    }

    /// Plain-text layout used by the dialog and the clipboard
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "DESCRIPTIVE STATISTICS");
        let _ = writeln!(text, "{}", "=".repeat(50));

        for (measurement, s) in &self.columns {
            let _ = writeln!(text);
            let _ = writeln!(text, "{}:", measurement.label().to_uppercase());
            let _ = writeln!(text, "{}", "-".repeat(30));
            let _ = writeln!(text, "Count: {}", group_thousands(s.count));
            let _ = writeln!(text, "Mean: {:.2}", s.mean);
            let _ = writeln!(text, "Std Dev: {:.2}", s.std_dev);
            let _ = writeln!(text, "Min: {:.2}", s.min);
            let _ = writeln!(text, "25%: {:.2}", s.p25);
            let _ = writeln!(text, "50% (Median): {:.2}", s.median);
            let _ = writeln!(text, "75%: {:.2}", s.p75);
            let _ = writeln!(text, "Max: {:.2}", s.max);
        }

        let _ = writeln!(text);
        let _ = writeln!(text, "ADDITIONAL STATISTICS");
        let _ = writeln!(text, "{}", "-".repeat(50));
        let _ = writeln!(text, "Total Users: {}", group_thousands(self.user_count));
        let _ = writeln!(text, "Total Sensor Records: {}", group_thousands(self.record_count));
        let _ = writeln!(
            text,
            "Date Range: {} to {}",
            self.first_timestamp.format(DATE_FORMAT),
            self.last_timestamp.format(DATE_FORMAT)
        );
        text
    }
}

/// 1234567 -> "1,234,567"
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::dataset_with_temperatures;

    #[test]
    fn test_summarize() {
        let summary = summarize(&[10.0, 20.0, 30.0]).unwrap();

        assert_eq!(summary.count, 3);
        assert_eq!(summary.mean, 20.0);
        assert_eq!(summary.std_dev, 10.0);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.max, 30.0);
        assert_eq!(summary.p25, 15.0);
        assert_eq!(summary.median, 20.0);
        assert_eq!(summary.p75, 25.0);
    }

    #[test]
    fn test_percentile_interpolation() {
        let summary = summarize(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(summary.p25, 1.75);
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.p75, 3.25);
    }

    #[test]
    fn test_single_value() {
        let summary = summarize(&[42.0]).unwrap();
        assert_eq!(summary.median, 42.0);
        assert!(summary.std_dev.is_nan());
    }

    #[test]
    fn test_describe() {
        let dataset = dataset_with_temperatures(&[10.0, 20.0, 30.0]);
        let report = describe(&dataset).unwrap();

        let outside = report.column(Measurement::OutsideTemperature).unwrap();
        assert_eq!(outside.mean, 20.0);
        assert_eq!(outside.min, 10.0);
        assert_eq!(outside.max, 30.0);
        assert_eq!(outside.count, 3);

        let room = report.column(Measurement::RoomTemperature).unwrap();
        assert_eq!(room.mean, 15.0);

        assert_eq!(report.user_count, 3);
        assert_eq!(report.record_count, 3);
        assert!(report.first_timestamp < report.last_timestamp);
    }

    #[test]
    fn test_describe_is_repeatable() {
        let dataset = dataset_with_temperatures(&[71.13, 88.02, 93.5, 70.01, 84.44]);
        let a = describe(&dataset).unwrap();
        let b = describe(&dataset).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_text(), b.to_text());
    }

    #[test]
    fn test_empty_dataset() {
        assert!(matches!(describe(&Dataset::default()), Err(AppError::EmptyDataset)));
        assert!(matches!(summarize(&[]), Err(AppError::EmptyDataset)));
    }

    #[test]
    fn test_report_text() {
        let report = describe(&dataset_with_temperatures(&[10.0, 20.0, 30.0])).unwrap();
        let text = report.to_text();

        assert!(text.starts_with("DESCRIPTIVE STATISTICS\n"));
        assert!(text.contains("OUTSIDE TEMPERATURE:\n"));
        assert!(text.contains("Mean: 20.00\n"));
        assert!(text.contains("Total Users: 3\n"));
        assert!(text.contains("Date Range: 2015-01-01 to 2015-01-01\n"));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1_000_000), "1,000,000");
    }
}
