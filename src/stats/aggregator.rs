//! Aggregation Module
//! Read-only views over the cleaned data: top districts and the yearly rate series.

use crate::data::{ExchangeRatePoint, MigrantRecord};
use statrs::statistics::Statistics;

/// Mean exchange rate for one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearlyRate {
    pub year: f64,
    pub mean_value: f64,
}

/// Derives the chart views from cleaned records.
pub struct Aggregator;

impl Aggregator {
    /// The `n` districts with the highest total, largest first.
    ///
    /// Ties keep their input row order.
    pub fn top_districts(records: &[MigrantRecord], n: usize) -> Vec<&MigrantRecord> {
        let mut ranked: Vec<&MigrantRecord> = records.iter().collect();
        ranked.sort_by(|a, b| b.total_migrants.cmp(&a.total_migrants));
        ranked.truncate(n);
        ranked
    }

    /// Mean value per year, sorted by year.
    pub fn yearly_means(points: &[ExchangeRatePoint]) -> Vec<YearlyRate> {
        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.year.total_cmp(&b.year));

        sorted
            .chunk_by(|a, b| a.year == b.year)
            .map(|same_year| YearlyRate {
                year: same_year[0].year,
                mean_value: same_year.iter().map(|p| p.value).mean(),
            })
            .collect()
    }

    /// Whole-year bounds of a yearly series, for the range selector.
    pub fn year_bounds(series: &[YearlyRate]) -> Option<(i64, i64)> {
        let first = series.first()?;
        let last = series.last()?;
        Some((first.year.floor() as i64, last.year.floor() as i64))
    }

    /// Points whose year lies within `[from, to]` inclusive.
    pub fn filter_year_range(series: &[YearlyRate], range: (i64, i64)) -> Vec<YearlyRate> {
        let (from, to) = if range.0 <= range.1 {
            range
        } else {
            (range.1, range.0)
        };

        series
            .iter()
            .filter(|p| p.year >= from as f64 && p.year <= to as f64)
            .copied()
            .collect()
    }
}
