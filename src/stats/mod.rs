//! Stats module - Chart views and series summaries

mod aggregator;
mod summary;

pub use aggregator::{Aggregator, YearlyRate};
pub use summary::SeriesSummary;
