//! Aggregation Engine
//! Grouped sums and frequency counts over a filtered view.

use super::model::{
    date_values, f64_values, str_values, CategoryField, FilteredView, Measure, COUNTRY, DATE,
    IMPORT_EXPORT, PORT,
};
use chrono::NaiveDate;
use polars::prelude::*;
use std::cmp::Ordering;
use thiserror::Error;

const TOTAL: &str = "total";
const COUNT: &str = "count";

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Summed measure for one (key, direction) group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub key: String,
    pub direction: String,
    pub total: f64,
}

/// Summed measure for one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedTotal {
    pub date: NaiveDate,
    pub total: f64,
}

/// Number of rows carrying one category value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub value: String,
    pub count: u64,
}

/// Total Value per (Country, Import_Export), ordered by country then direction.
pub fn value_by_country_and_direction(
    view: &FilteredView,
) -> Result<Vec<GroupTotal>, AggregateError> {
    sum_by_key_and_direction(view, COUNTRY, Measure::Value)
}

/// Total Quantity per (Port, Import_Export), ordered by port then direction.
pub fn quantity_by_port_and_direction(
    view: &FilteredView,
) -> Result<Vec<GroupTotal>, AggregateError> {
    sum_by_key_and_direction(view, PORT, Measure::Quantity)
}

/// Total Value per day, ascending by date.
pub fn value_over_time(view: &FilteredView) -> Result<Vec<DatedTotal>, AggregateError> {
    if view.is_empty() {
        return Ok(Vec::new());
    }

    let grouped = view
        .frame()
        .clone()
        .lazy()
        .filter(col(DATE).is_not_null())
        .group_by([col(DATE)])
        .agg([col(Measure::Value.column()).sum().alias(TOTAL)])
        .collect()?;

    let dates = date_values(&grouped)?;
    let totals = f64_values(&grouped, TOTAL)?;

    let mut series: Vec<DatedTotal> = dates
        .into_iter()
        .zip(totals)
        .filter_map(|(date, total)| {
            Some(DatedTotal {
                date: date?,
                total: total.unwrap_or(0.0),
            })
        })
        .collect();
    series.sort_by_key(|point| point.date);
    Ok(series)
}

/// Occurrences of each distinct non-null value of `field`.
///
/// Ordered by count descending; equal counts are ordered by value so
/// repeated calls agree.
pub fn category_frequency(
    view: &FilteredView,
    field: CategoryField,
) -> Result<Vec<CategoryCount>, AggregateError> {
    if view.is_empty() {
        return Ok(Vec::new());
    }

    let column = field.column();
    let grouped = view
        .frame()
        .clone()
        .lazy()
        .filter(col(column).is_not_null())
        .group_by([col(column)])
        .agg([col(column).count().alias(COUNT)])
        .collect()?;

    let values = str_values(&grouped, column)?;
    let counts = grouped.column(COUNT)?.cast(&DataType::UInt64)?;
    let counts = counts.u64()?;

    let mut frequencies: Vec<CategoryCount> = values
        .into_iter()
        .zip(counts.into_iter())
        .filter_map(|(value, count)| {
            Some(CategoryCount {
                value: value?,
                count: count.unwrap_or(0),
            })
        })
        .collect();
    frequencies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    Ok(frequencies)
}

fn sum_by_key_and_direction(
    view: &FilteredView,
    key: &str,
    measure: Measure,
) -> Result<Vec<GroupTotal>, AggregateError> {
    if view.is_empty() {
        return Ok(Vec::new());
    }

    let grouped = view
        .frame()
        .clone()
        .lazy()
        .filter(col(key).is_not_null().and(col(IMPORT_EXPORT).is_not_null()))
        .group_by([col(key), col(IMPORT_EXPORT)])
        .agg([col(measure.column()).sum().alias(TOTAL)])
        .collect()?;

    let keys = str_values(&grouped, key)?;
    let directions = str_values(&grouped, IMPORT_EXPORT)?;
    let totals = f64_values(&grouped, TOTAL)?;

    let mut groups: Vec<GroupTotal> = keys
        .into_iter()
        .zip(directions)
        .zip(totals)
        .filter_map(|((key, direction), total)| {
            Some(GroupTotal {
                key: key?,
                direction: direction?,
                total: total.unwrap_or(0.0),
            })
        })
        .collect();
    groups.sort_by(|a, b| compare_groups(a, b));
    Ok(groups)
}

fn compare_groups(a: &GroupTotal, b: &GroupTotal) -> Ordering {
    a.key
        .cmp(&b.key)
        .then_with(|| a.direction.cmp(&b.direction))
}

/// Distinct directions present in grouped totals, Import/Export first.
pub fn directions(groups: &[GroupTotal]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for group in groups {
        if !seen.contains(&group.direction) {
            seen.push(group.direction.clone());
        }
    }
    seen.sort_by_key(|d| {
        (
            super::model::Direction::from_label(d).map_or(2, |d| d as u8),
            d.clone(),
        )
    });
    seen
}

/// Distinct keys of grouped totals in their sorted order.
pub fn group_keys(groups: &[GroupTotal]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for group in groups {
        if keys.last() != Some(&group.key) {
            keys.push(group.key.clone());
        }
    }
    keys
}
