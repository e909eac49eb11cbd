//! Dataset Model
//! Column names, the loaded dataset and the filtered view wrapping polars frames.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use std::fmt;

pub const DATE: &str = "Date";
pub const COUNTRY: &str = "Country";
pub const IMPORT_EXPORT: &str = "Import_Export";
pub const SHIPPING_METHOD: &str = "Shipping_Method";
pub const PAYMENT_TERMS: &str = "Payment_Terms";
pub const QUANTITY: &str = "Quantity";
pub const VALUE: &str = "Value";
pub const PORT: &str = "Port";

/// Position of the record in the source file. Never exported.
pub const ROW_ID: &str = "__row_id";

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    DATE,
    COUNTRY,
    IMPORT_EXPORT,
    SHIPPING_METHOD,
    PAYMENT_TERMS,
    QUANTITY,
    VALUE,
    PORT,
];

/// Categorical columns (everything required except Date and the two measures).
pub const CATEGORY_COLUMNS: [&str; 5] =
    [COUNTRY, IMPORT_EXPORT, SHIPPING_METHOD, PAYMENT_TERMS, PORT];

/// Categorical fields the aggregation engine can count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryField {
    Country,
    Direction,
    ShippingMethod,
    PaymentTerms,
    Port,
}

impl CategoryField {
    pub fn column(self) -> &'static str {
        match self {
            CategoryField::Country => COUNTRY,
            CategoryField::Direction => IMPORT_EXPORT,
            CategoryField::ShippingMethod => SHIPPING_METHOD,
            CategoryField::PaymentTerms => PAYMENT_TERMS,
            CategoryField::Port => PORT,
        }
    }

    /// Human readable axis label, e.g. "Shipping Method".
    pub fn label(self) -> &'static str {
        match self {
            CategoryField::Country => "Country",
            CategoryField::Direction => "Import/Export",
            CategoryField::ShippingMethod => "Shipping Method",
            CategoryField::PaymentTerms => "Payment Terms",
            CategoryField::Port => "Port",
        }
    }
}

/// Numeric measures of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    Quantity,
    Value,
}

impl Measure {
    pub fn column(self) -> &'static str {
        match self {
            Measure::Quantity => QUANTITY,
            Measure::Value => VALUE,
        }
    }
}

/// Trade direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Import,
    Export,
}

impl Direction {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            l if l.eq_ignore_ascii_case("import") => Some(Direction::Import),
            l if l.eq_ignore_ascii_case("export") => Some(Direction::Export),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Import => "Import",
            Direction::Export => "Export",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transaction pulled out of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub row_id: u64,
    pub date: Option<NaiveDate>,
    pub country: Option<String>,
    pub import_export: Option<String>,
    pub shipping_method: Option<String>,
    pub payment_terms: Option<String>,
    pub quantity: Option<f64>,
    pub value: Option<f64>,
    pub port: Option<String>,
}

/// Sampled dataset, immutable once loaded.
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
    shipping_methods: Vec<String>,
    payment_terms: Vec<String>,
    date_range: Option<(NaiveDate, NaiveDate)>,
}

impl Dataset {
    /// Wrap a frame that already has the required columns in their parsed
    /// types plus a row id column.
    pub fn from_frame(df: DataFrame) -> PolarsResult<Self> {
        let shipping_methods = distinct_values(&df, SHIPPING_METHOD)?;
        let payment_terms = distinct_values(&df, PAYMENT_TERMS)?;
        let dates = date_values(&df)?;
        let date_range = dates
            .iter()
            .flatten()
            .fold(None, |acc: Option<(NaiveDate, NaiveDate)>, &d| match acc {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            });

        Ok(Self {
            df,
            shipping_methods,
            payment_terms,
            date_range,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Distinct shipping methods observed at load time, in first-seen order.
    pub fn shipping_methods(&self) -> &[String] {
        &self.shipping_methods
    }

    /// Distinct payment terms observed at load time, in first-seen order.
    pub fn payment_terms(&self) -> &[String] {
        &self.payment_terms
    }

    /// Earliest and latest parsed date, `None` when every date is null.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_range
    }

    pub fn null_date_count(&self) -> usize {
        self.df.column(DATE).map(|c| c.null_count()).unwrap_or(0)
    }

    pub fn row_ids(&self) -> PolarsResult<Vec<u64>> {
        row_id_values(&self.df)
    }

    pub fn transactions(&self) -> PolarsResult<Vec<Transaction>> {
        transactions(&self.df)
    }
}

/// Rows of a dataset that pass the current filter criteria.
#[derive(Debug, Clone)]
pub struct FilteredView {
    df: DataFrame,
}

impl FilteredView {
    pub(crate) fn new(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn row_ids(&self) -> PolarsResult<Vec<u64>> {
        row_id_values(&self.df)
    }

    pub fn transactions(&self) -> PolarsResult<Vec<Transaction>> {
        transactions(&self.df)
    }

    /// Non-null values of a measure, in row order.
    pub fn measure_values(&self, measure: Measure) -> PolarsResult<Vec<f64>> {
        Ok(f64_values(&self.df, measure.column())?
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect())
    }
}

const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Days since 1970-01-01, the physical representation of a polars `Date`.
pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub fn days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

pub(crate) fn str_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}

pub(crate) fn f64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

pub(crate) fn date_values(df: &DataFrame) -> PolarsResult<Vec<Option<NaiveDate>>> {
    let column = df.column(DATE)?.cast(&DataType::Int32)?;
    Ok(column
        .i32()?
        .into_iter()
        .map(|v| v.and_then(days_to_date))
        .collect())
}

fn row_id_values(df: &DataFrame) -> PolarsResult<Vec<u64>> {
    let column = df.column(ROW_ID)?.cast(&DataType::UInt64)?;
    Ok(column.u64()?.into_iter().flatten().collect())
}

/// Distinct non-null values of a column, in first-seen order.
fn distinct_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<String>> {
    let mut seen = Vec::new();
    for value in str_values(df, name)?.into_iter().flatten() {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    Ok(seen)
}

fn transactions(df: &DataFrame) -> PolarsResult<Vec<Transaction>> {
    let row_ids = row_id_values(df)?;
    let dates = date_values(df)?;
    let countries = str_values(df, COUNTRY)?;
    let directions = str_values(df, IMPORT_EXPORT)?;
    let shipping = str_values(df, SHIPPING_METHOD)?;
    let payment = str_values(df, PAYMENT_TERMS)?;
    let quantities = f64_values(df, QUANTITY)?;
    let values = f64_values(df, VALUE)?;
    let ports = str_values(df, PORT)?;

    Ok((0..df.height())
        .map(|i| Transaction {
            row_id: row_ids.get(i).copied().unwrap_or(i as u64),
            date: dates[i],
            country: countries[i].clone(),
            import_export: directions[i].clone(),
            shipping_method: shipping[i].clone(),
            payment_terms: payment[i].clone(),
            quantity: quantities[i],
            value: values[i],
            port: ports[i].clone(),
        })
        .collect())
}
