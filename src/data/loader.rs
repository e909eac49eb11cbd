//! CSV Dataset Loader Module
//! Reads the trade CSV with Polars, parses dates and draws the fixed-seed sample.

use super::model::{
    Dataset, CATEGORY_COLUMNS, DATE, QUANTITY, REQUIRED_COLUMNS, ROW_ID, VALUE,
};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_SAMPLE_SIZE: usize = 3001;
pub const DEFAULT_SEED: u64 = 55038;
pub const DEFAULT_DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required columns: {}", missing.join(", "))]
    SchemaError { missing: Vec<String> },
}

/// Load-time knobs: sample size, seed and the date pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub sample_size: usize,
    pub seed: u64,
    pub date_format: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            seed: DEFAULT_SEED,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Load a trade CSV and draw the deterministic sample.
///
/// Unparseable dates become null. When the file holds fewer rows than
/// `sample_size`, every row is kept.
pub fn load(path: &Path, options: &LoadOptions) -> Result<Dataset, LoaderError> {
    if !path.exists() {
        return Err(LoaderError::FileNotFound(path.to_path_buf()));
    }
    std::fs::metadata(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let raw = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    let dataset = prepare(raw, options)?;
    log::info!(
        "Loaded {} rows from {} ({} with unparseable dates)",
        dataset.len(),
        path.display(),
        dataset.null_date_count()
    );
    Ok(dataset)
}

/// Turn a raw frame into a dataset: schema check, type coercion, row ids
/// and sampling. Exposed for callers that already hold a frame.
pub fn prepare(raw: DataFrame, options: &LoadOptions) -> Result<Dataset, LoaderError> {
    check_schema(&raw)?;
    let read_rows = raw.height();

    let date_options = StrptimeOptions {
        format: Some(options.date_format.as_str().into()),
        strict: false,
        exact: true,
        cache: true,
    };

    let mut casts = vec![
        col(DATE)
            .cast(DataType::String)
            .str()
            .to_date(date_options)
            .alias(DATE),
        col(QUANTITY).cast(DataType::Float64).alias(QUANTITY),
        col(VALUE).cast(DataType::Float64).alias(VALUE),
    ];
    casts.extend(
        CATEGORY_COLUMNS
            .iter()
            .map(|&name| col(name).cast(DataType::String).alias(name)),
    );

    let parsed = raw
        .lazy()
        .with_row_index(ROW_ID, None)
        .with_columns(casts)
        .collect()?;

    let sampled = sample(parsed, options.sample_size, options.seed)?;
    log::debug!("Sampled {} of {} rows", sampled.height(), read_rows);

    let dataset = Dataset::from_frame(sampled)?;
    if dataset.null_date_count() > 0 {
        log::warn!(
            "{} rows have dates not matching '{}'; they are excluded from date filtering",
            dataset.null_date_count(),
            options.date_format
        );
    }
    Ok(dataset)
}

fn check_schema(df: &DataFrame) -> Result<(), LoaderError> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !present.iter().any(|p| p == *name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoaderError::SchemaError { missing })
    }
}

/// Fixed-seed sample without replacement, clamped to the available rows.
fn sample(df: DataFrame, sample_size: usize, seed: u64) -> PolarsResult<DataFrame> {
    let n = sample_size.min(df.height());
    if n < sample_size {
        log::warn!(
            "Requested a sample of {} rows but only {} are available; using all rows",
            sample_size,
            df.height()
        );
    }
    df.sample_n_literal(n, false, true, Some(seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{COUNTRY, IMPORT_EXPORT, PAYMENT_TERMS, PORT, SHIPPING_METHOD};

    fn raw_frame() -> DataFrame {
        df!(
            DATE => ["01-01-2023", "05-01-2023", "2023/02/01", "01-02-2023"],
            COUNTRY => ["India", "China", "India", "Chile"],
            IMPORT_EXPORT => ["Export", "Import", "Export", "Import"],
            SHIPPING_METHOD => ["Air", "Sea", "Air", "Land"],
            PAYMENT_TERMS => ["Net 30", "Net 60", "Net 30", "Prepaid"],
            QUANTITY => [10i64, 5, 20, 7],
            VALUE => [100.0, 50.0, 200.0, 70.0],
            PORT => ["PortA", "PortB", "PortA", "PortC"],
        )
        .unwrap()
    }

    #[test]
    fn malformed_dates_become_null() {
        let dataset = prepare(raw_frame(), &LoadOptions::default()).unwrap();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.null_date_count(), 1);

        let (lo, hi) = dataset.date_range().unwrap();
        assert_eq!(lo, chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(hi, chrono::NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
    }

    #[test]
    fn sample_is_clamped_and_deterministic() {
        let options = LoadOptions {
            sample_size: 3,
            ..LoadOptions::default()
        };
        let first = prepare(raw_frame(), &options).unwrap();
        let second = prepare(raw_frame(), &options).unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first.row_ids().unwrap(), second.row_ids().unwrap());

        let everything = prepare(raw_frame(), &LoadOptions::default()).unwrap();
        let mut ids = everything.row_ids().unwrap();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn missing_columns_are_reported() {
        let raw = raw_frame().drop(PORT).unwrap().drop(VALUE).unwrap();
        match prepare(raw, &LoadOptions::default()) {
            Err(LoaderError::SchemaError { missing }) => {
                assert_eq!(missing, vec![VALUE.to_string(), PORT.to_string()]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn picker_options_come_from_the_whole_sample() {
        let dataset = prepare(raw_frame(), &LoadOptions::default()).unwrap();
        let mut methods = dataset.shipping_methods().to_vec();
        methods.sort();
        assert_eq!(methods, vec!["Air", "Land", "Sea"]);
        assert_eq!(dataset.payment_terms().len(), 3);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load(Path::new("/definitely/not/here.csv"), &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, LoaderError::FileNotFound(_)));
    }
}
