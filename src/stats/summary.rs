//! Descriptive figures for the selected part of the exchange-rate series.

use crate::stats::YearlyRate;
use statrs::statistics::Statistics;

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub years: usize,
    pub first: YearlyRate,
    pub last: YearlyRate,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Change from first to last value in percent.
    pub percent_change: Option<f64>,
}

impl SeriesSummary {
    /// `None` for an empty series.
    pub fn compute(series: &[YearlyRate]) -> Option<Self> {
        let first = *series.first()?;
        let last = *series.last()?;
        let values = || series.iter().map(|p| p.mean_value);

        let percent_change = if series.len() > 1 && first.mean_value != 0.0 {
            Some((last.mean_value - first.mean_value) / first.mean_value * 100.0)
        } else {
            None
        };

        Some(Self {
            years: series.len(),
            first,
            last,
            min: Statistics::min(values()),
            max: Statistics::max(values()),
            mean: values().mean(),
            percent_change,
        })
    }
}
