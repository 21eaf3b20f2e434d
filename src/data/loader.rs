//! CSV Data Loader Module
//! Reads the two input tables with Polars, checks their schema and cleans them.

use crate::data::cleaner::{
    clean_exchange_rates, clean_migrants, ExchangeRatePoint, MigrantRecord, DISTRICT_URI_COLUMN,
    NATIONALITY_COLUMNS, VALUE_COLUMN, YEAR_COLUMN,
};
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("{file}: missing required column '{column}'")]
    MissingColumn { file: String, column: String },
}

/// Cleaned contents of one (migrants, exchange rates) input pair.
///
/// Never mutated after loading; views are derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedData {
    pub migrants: Vec<MigrantRecord>,
    /// Names of the nationality count columns that make up each total.
    pub count_columns: Vec<String>,
    pub exchange_rates: Vec<ExchangeRatePoint>,
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load both input files and clean them.
    pub fn load_and_clean(
        migrants_path: &Path,
        rates_path: &Path,
    ) -> Result<CleanedData, LoaderError> {
        let migrants_df = Self::read_csv(migrants_path)?;
        let mut required = vec![DISTRICT_URI_COLUMN];
        required.extend(NATIONALITY_COLUMNS);
        Self::require_columns(&migrants_df, migrants_path, &required)?;

        let rates_df = Self::read_csv(rates_path)?;
        Self::require_columns(&rates_df, rates_path, &[YEAR_COLUMN, VALUE_COLUMN])?;

        let migrants = clean_migrants(&migrants_df)?;
        let exchange_rates = clean_exchange_rates(&rates_df)?;

        info!(
            districts = migrants.len(),
            rate_points = exchange_rates.len(),
            "Loaded and cleaned input data"
        );

        Ok(CleanedData {
            migrants,
            count_columns: NATIONALITY_COLUMNS.iter().map(|c| c.to_string()).collect(),
            exchange_rates,
        })
    }

    /// Read a CSV file with every column kept as raw text.
    pub fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        debug!(path = %path.display(), "Reading CSV");

        // Schema inference off: cleaning works on the original strings
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        debug!(rows = df.height(), columns = df.width(), "CSV read");
        Ok(df)
    }

    /// Fail if any of `columns` is absent from `df`.
    pub fn require_columns(
        df: &DataFrame,
        path: &Path,
        columns: &[&str],
    ) -> Result<(), LoaderError> {
        let present = Self::get_columns(df);
        match columns
            .iter()
            .find(|c| !present.iter().any(|p| p.as_str() == **c))
        {
            Some(missing) => Err(LoaderError::MissingColumn {
                file: path.display().to_string(),
                column: missing.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Get list of column names from a DataFrame.
    pub fn get_columns(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn migrants_header() -> String {
        let mut header = vec!["District URI".to_string()];
        header.extend(NATIONALITY_COLUMNS.iter().map(|c| c.to_string()));
        header.join(",")
    }

    #[test]
    fn test_load_and_clean_reads_both_tables() {
        let migrants = csv_file(&format!(
            "{}\nhttp://dbpedia.org/resource/Beirut,\"1,000\",500,1,1,1,1,1\n",
            migrants_header()
        ));
        let rates = csv_file("Year,Value\n2019,1507.5\nn/a,1\n");

        let data = DataLoader::load_and_clean(migrants.path(), rates.path()).unwrap();

        assert_eq!(data.migrants.len(), 1);
        assert_eq!(data.migrants[0].district, "Beirut");
        assert_eq!(data.migrants[0].total_migrants, 1505);
        assert_eq!(data.count_columns.len(), 7);
        assert_eq!(data.exchange_rates.len(), 1);
    }

    #[test]
    fn test_missing_identifier_column_fails_fast() {
        let header: Vec<&str> = NATIONALITY_COLUMNS.to_vec();
        let migrants = csv_file(&format!("{}\n1,2,3,4,5,6,7\n", header.join(",")));
        let rates = csv_file("Year,Value\n2019,1507.5\n");

        let err = DataLoader::load_and_clean(migrants.path(), rates.path()).unwrap_err();

        match err {
            LoaderError::MissingColumn { column, .. } => assert_eq!(column, "District URI"),
            other => panic!("Expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_value_column_fails_fast() {
        let migrants = csv_file(&format!("{}\nx/Tyre,1,1,1,1,1,1,1\n", migrants_header()));
        let rates = csv_file("Year,Rate\n2019,1507.5\n");

        let err = DataLoader::load_and_clean(migrants.path(), rates.path()).unwrap_err();
        assert!(err.to_string().contains("'Value'"));
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let rates = csv_file("Year,Value\n2019,1507.5\n");
        let result = DataLoader::load_and_clean(Path::new("/no/such/file.csv"), rates.path());
        assert!(matches!(result, Err(LoaderError::CsvError(_))));
    }
}
