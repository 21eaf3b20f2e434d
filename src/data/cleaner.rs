//! Data Cleaner Module
//! Turns raw CSV text into typed migrant records and exchange-rate points.

use polars::prelude::*;
use tracing::{debug, info};

/// Identifier column holding the district URI.
pub const DISTRICT_URI_COLUMN: &str = "District URI";
pub const YEAR_COLUMN: &str = "Year";
pub const VALUE_COLUMN: &str = "Value";

/// The seven nationality count columns, in display order.
pub const NATIONALITY_COLUMNS: [&str; 7] = [
    "Number of Egyptian",
    "Number of Ethiopians",
    "Number of Iraqi",
    "Number of Bangladeshi",
    "Number of Sri Lankan",
    "Number of Sudanese",
    "Number of other nationalities",
];

/// One cleaned row of the migrant table.
///
/// `total_migrants` saturates at `u64::MAX`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrantRecord {
    pub district: String,
    /// Counts aligned with [`NATIONALITY_COLUMNS`].
    pub counts: [u64; 7],
    pub total_migrants: u64,
}

impl MigrantRecord {
    pub fn new(district: impl Into<String>, counts: [u64; 7]) -> Self {
        Self {
            district: district.into(),
            counts,
            total_migrants: counts.iter().copied().fold(0, u64::saturating_add),
        }
    }

    /// Pairs of (column name, count).
    pub fn nationality_counts(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        NATIONALITY_COLUMNS.iter().copied().zip(self.counts.iter().copied())
    }

    /// Count for a single nationality column.
    pub fn count(&self, column: &str) -> Option<u64> {
        NATIONALITY_COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|i| self.counts[i])
    }
}

/// One surviving exchange-rate observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRatePoint {
    pub year: f64,
    pub value: f64,
}

/// Outcome of deriving a display name from a district URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistrictName {
    /// Last path segment with underscores turned into spaces.
    Derived(String),
    /// Nothing usable in the path; the raw identifier is kept verbatim.
    Fallback(String),
}

impl DistrictName {
    pub fn is_derived(&self) -> bool {
        matches!(self, DistrictName::Derived(_))
    }

    pub fn into_name(self) -> String {
        match self {
            DistrictName::Derived(name) | DistrictName::Fallback(name) => name,
        }
    }
}

/// Clean a raw count cell: drop thousands separators and whitespace, parse as integer.
///
/// Missing, unparseable, negative or non-finite values become 0.
pub fn clean_count(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };

    let without_separators = raw.replace(',', "");
    let cleaned = without_separators.trim();
    if cleaned.is_empty() {
        return 0;
    }

    if let Ok(count) = cleaned.parse::<u64>() {
        return count;
    }

    // Float renderings like "12.0" truncate the same way an int cast would
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v.trunc() as u64,
        _ => {
            debug!(value = raw, "Unparseable count, using 0");
            0
        }
    }
}

/// Parse a `Year` or `Value` cell. `None` means the row must be dropped.
pub fn parse_rate_field(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Derive the district display name from the last path segment of its URI,
/// without any `;params` suffix.
pub fn extract_district(uri: Option<&str>) -> DistrictName {
    let Some(uri) = uri else {
        return DistrictName::Fallback(String::new());
    };

    let segment = uri_path(uri).rsplit('/').next().unwrap_or_default();
    // ";params" on the last segment are not part of the name
    let segment = segment.split(';').next().unwrap_or_default();
    let name = segment.replace('_', " ");
    let name = name.trim();

    if name.is_empty() {
        DistrictName::Fallback(uri.to_string())
    } else {
        DistrictName::Derived(name.to_string())
    }
}

/// Path component of a URI-like string: no scheme, authority, query or fragment.
fn uri_path(uri: &str) -> &str {
    let end = uri.find(|c: char| c == '#' || c == '?').unwrap_or(uri.len());
    let uri = &uri[..end];

    let rest = match uri.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => uri,
    };

    match rest.strip_prefix("//") {
        Some(authority_and_path) => authority_and_path
            .find('/')
            .map_or("", |i| &authority_and_path[i..]),
        None => rest,
    }
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Clean every row of the migrant table.
///
/// Expects [`DISTRICT_URI_COLUMN`] and all [`NATIONALITY_COLUMNS`] to be present.
pub fn clean_migrants(df: &DataFrame) -> PolarsResult<Vec<MigrantRecord>> {
    let mut counts = vec![[0u64; 7]; df.height()];

    for (slot, name) in NATIONALITY_COLUMNS.iter().enumerate() {
        let column = df.column(name)?.cast(&DataType::String)?;
        for (row, raw) in column.str()?.into_iter().enumerate() {
            counts[row][slot] = clean_count(raw);
        }
    }

    let uris = df.column(DISTRICT_URI_COLUMN)?.cast(&DataType::String)?;
    let mut fallbacks = 0usize;

    let records: Vec<MigrantRecord> = uris
        .str()?
        .into_iter()
        .zip(counts)
        .map(|(uri, counts)| {
            let name = extract_district(uri);
            if !name.is_derived() {
                fallbacks += 1;
            }
            MigrantRecord::new(name.into_name(), counts)
        })
        .collect();

    if fallbacks > 0 {
        debug!(fallbacks, "Districts kept their raw identifier");
    }

    Ok(records)
}

/// Clean the exchange-rate table, dropping rows whose year or value is not numeric.
pub fn clean_exchange_rates(df: &DataFrame) -> PolarsResult<Vec<ExchangeRatePoint>> {
    let years = df.column(YEAR_COLUMN)?.cast(&DataType::String)?;
    let values = df.column(VALUE_COLUMN)?.cast(&DataType::String)?;

    let points: Vec<ExchangeRatePoint> = years
        .str()?
        .into_iter()
        .zip(values.str()?.into_iter())
        .filter_map(|(year, value)| {
            Some(ExchangeRatePoint {
                year: parse_rate_field(year)?,
                value: parse_rate_field(value)?,
            })
        })
        .collect();

    let dropped = df.height() - points.len();
    if dropped > 0 {
        info!(dropped, "Dropped exchange-rate rows with non-numeric Year or Value");
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn migrant_frame(uris: &[Option<&str>], egyptian: &[Option<&str>]) -> DataFrame {
        let mut columns = vec![Column::new(DISTRICT_URI_COLUMN.into(), uris)];
        columns.push(Column::new(NATIONALITY_COLUMNS[0].into(), egyptian));
        for name in &NATIONALITY_COLUMNS[1..] {
            let ones: Vec<&str> = vec!["1"; uris.len()];
            columns.push(Column::new((*name).into(), ones));
        }
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn test_clean_count_strips_separators_and_whitespace() {
        assert_eq!(clean_count(Some("1,234")), 1234);
        assert_eq!(clean_count(Some("  12,345,678 ")), 12_345_678);
        assert_eq!(clean_count(Some("42")), 42);
    }

    #[test]
    fn test_clean_count_missing_values_become_zero() {
        assert_eq!(clean_count(None), 0);
        assert_eq!(clean_count(Some("")), 0);
        assert_eq!(clean_count(Some("   ")), 0);
        assert_eq!(clean_count(Some("n/a")), 0);
        assert_eq!(clean_count(Some("nan")), 0);
        assert_eq!(clean_count(Some("-5")), 0);
    }

    #[test]
    fn test_clean_count_truncates_float_text() {
        assert_eq!(clean_count(Some("12.0")), 12);
        assert_eq!(clean_count(Some("1,000.9")), 1000);
    }

    #[test]
    fn test_clean_count_is_idempotent() {
        for raw in ["1,234", " 7 ", "", "abc", "3.5"] {
            let once = clean_count(Some(raw));
            let twice = clean_count(Some(&once.to_string()));
            assert_eq!(once, twice, "re-cleaning {raw:?}");
        }
    }

    #[test]
    fn test_extract_district_from_uri() {
        assert_eq!(
            extract_district(Some("http://dbpedia.org/resource/Mount_Lebanon")),
            DistrictName::Derived("Mount Lebanon".to_string())
        );
        assert_eq!(
            extract_district(Some(".../Mount_Lebanon")),
            DistrictName::Derived("Mount Lebanon".to_string())
        );
        assert_eq!(
            extract_district(Some("http://example.org/page/Beirut?lang=en#top")),
            DistrictName::Derived("Beirut".to_string())
        );
        assert_eq!(
            extract_district(Some("http://x.org/resource/Beirut;v=1")),
            DistrictName::Derived("Beirut".to_string())
        );
        assert_eq!(
            extract_district(Some("_Tyre_")),
            DistrictName::Derived("Tyre".to_string())
        );
    }

    #[test]
    fn test_extract_district_falls_back_to_raw_identifier() {
        assert_eq!(
            extract_district(Some("http://dbpedia.org/resource/")),
            DistrictName::Fallback("http://dbpedia.org/resource/".to_string())
        );
        assert_eq!(
            extract_district(Some("http://example.org")),
            DistrictName::Fallback("http://example.org".to_string())
        );
        assert_eq!(
            extract_district(Some("___")),
            DistrictName::Fallback("___".to_string())
        );
        assert_eq!(extract_district(None), DistrictName::Fallback(String::new()));
    }

    #[test]
    fn test_extract_district_is_idempotent() {
        let once = extract_district(Some(".../Mount_Lebanon")).into_name();
        let twice = extract_district(Some(&once)).into_name();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clean_migrants_totals_match_counts() {
        let df = migrant_frame(
            &[Some(".../Beirut"), Some(".../Tyre"), None],
            &[Some("1,000"), Some(" "), Some("oops")],
        );

        let records = clean_migrants(&df).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].district, "Beirut");
        assert_eq!(records[0].count("Number of Egyptian"), Some(1000));
        assert_eq!(records[0].total_migrants, 1006);
        assert_eq!(records[1].total_migrants, 6);
        assert_eq!(records[2].district, "");
        for record in &records {
            let sum: u64 = record.nationality_counts().map(|(_, c)| c).sum();
            assert_eq!(record.total_migrants, sum);
        }
    }

    #[test]
    fn test_huge_counts_saturate_total() {
        let huge = clean_count(Some("1e20"));
        assert_eq!(huge, u64::MAX);

        let record = MigrantRecord::new("X", [huge, huge, 1, 0, 0, 0, 0]);
        assert_eq!(record.total_migrants, u64::MAX);

        let df = migrant_frame(&[Some(".../X")], &[Some("99999999999999999999999")]);
        let records = clean_migrants(&df).unwrap();
        assert_eq!(records[0].total_migrants, u64::MAX);
    }

    #[test]
    fn test_clean_migrants_accepts_numeric_columns() {
        let mut columns = vec![Column::new(DISTRICT_URI_COLUMN.into(), &["Zahle"])];
        for name in NATIONALITY_COLUMNS {
            columns.push(Column::new(name.into(), &[3i64]));
        }
        let df = DataFrame::new(columns).unwrap();

        let records = clean_migrants(&df).unwrap();
        assert_eq!(records[0].total_migrants, 21);
    }

    #[test]
    fn test_clean_exchange_rates_drops_non_numeric_rows() {
        let df = DataFrame::new(vec![
            Column::new(
                YEAR_COLUMN.into(),
                &[Some("2019"), Some("bad"), Some("2020"), None, Some(" 2021 ")],
            ),
            Column::new(
                VALUE_COLUMN.into(),
                &[Some("1507.5"), Some("1"), Some(""), Some("3"), Some("1507.5")],
            ),
        ])
        .unwrap();

        let points = clean_exchange_rates(&df).unwrap();

        assert!(points.len() <= df.height());
        assert_eq!(
            points,
            vec![
                ExchangeRatePoint { year: 2019.0, value: 1507.5 },
                ExchangeRatePoint { year: 2021.0, value: 1507.5 },
            ]
        );
    }
}
