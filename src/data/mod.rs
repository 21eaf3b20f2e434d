//! Data module - CSV loading, cleaning and caching

mod cache;
mod cleaner;
mod loader;

pub use cache::{InputPaths, LoadCache};
pub use cleaner::{
    clean_count, clean_exchange_rates, clean_migrants, extract_district, parse_rate_field,
    DistrictName, ExchangeRatePoint, MigrantRecord, DISTRICT_URI_COLUMN, NATIONALITY_COLUMNS,
    VALUE_COLUMN, YEAR_COLUMN,
};
pub use loader::{CleanedData, DataLoader, LoaderError};
