//! Filter Engine
//! Applies the date range and the optional category equality filters.

use super::model::{date_to_days, Dataset, FilteredView, DATE, PAYMENT_TERMS, SHIPPING_METHOD};
use chrono::{Local, NaiveDate};
use polars::prelude::*;
use std::fmt;
use thiserror::Error;

/// Label shown in the pickers for "no restriction".
pub const ALL_LABEL: &str = "All";

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("End date {end} is before start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Category picker state: everything, or one exact value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Build from a command line or config value; "All" means no restriction.
    pub fn from_label(label: &str) -> Self {
        if label == ALL_LABEL {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(label.to_string())
        }
    }

    fn predicate(&self, column: &str) -> Option<Expr> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(value) => Some(col(column).eq(lit(value.as_str()))),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_LABEL),
            CategoryFilter::Only(value) => f.write_str(value),
        }
    }
}

/// User-selected filters, rebuilt from widget state on every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub shipping_method: CategoryFilter,
    pub payment_terms: CategoryFilter,
}

impl FilterCriteria {
    /// Criteria spanning every parsed date with both pickers on All.
    pub fn covering(dataset: &Dataset) -> Self {
        let (start_date, end_date) = dataset.date_range().unwrap_or_else(|| {
            let today = Local::now().date_naive();
            (today, today)
        });
        Self {
            start_date,
            end_date,
            shipping_method: CategoryFilter::All,
            payment_terms: CategoryFilter::All,
        }
    }

    fn validate(&self) -> Result<(), FilterError> {
        if self.end_date < self.start_date {
            return Err(FilterError::InvalidRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Date predicate plus whichever category predicates are active.
    fn predicates(&self) -> Vec<Expr> {
        let date = col(DATE).cast(DataType::Int32);
        let mut predicates = vec![col(DATE)
            .is_not_null()
            .and(date.clone().gt_eq(lit(date_to_days(self.start_date))))
            .and(date.lt_eq(lit(date_to_days(self.end_date))))];
        predicates.extend(self.shipping_method.predicate(SHIPPING_METHOD));
        predicates.extend(self.payment_terms.predicate(PAYMENT_TERMS));
        predicates
    }
}

/// Rows of `dataset` matching `criteria`. An empty result is not an error.
pub fn apply(dataset: &Dataset, criteria: &FilterCriteria) -> Result<FilteredView, FilterError> {
    criteria.validate()?;

    let lf = criteria
        .predicates()
        .into_iter()
        .fold(dataset.frame().clone().lazy(), |lf, predicate| {
            lf.filter(predicate)
        });
    let df = lf.collect()?;

    log::debug!(
        "Filter {}..={} shipping={} payment={} kept {}/{} rows",
        criteria.start_date,
        criteria.end_date,
        criteria.shipping_method,
        criteria.payment_terms,
        df.height(),
        dataset.len()
    );
    Ok(FilteredView::new(df))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{prepare, LoadOptions};
    use crate::data::model::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset() -> Dataset {
        let raw = df!(
            DATE => ["01-01-2023", "05-01-2023", "01-02-2023", "garbage"],
            COUNTRY => ["India", "China", "India", "Peru"],
            IMPORT_EXPORT => ["Export", "Import", "Export", "Import"],
            SHIPPING_METHOD => ["Air", "Sea", "Air", "Air"],
            PAYMENT_TERMS => ["Net 30", "Net 60", "Net 30", "Net 30"],
            QUANTITY => [10.0, 5.0, 20.0, 1.0],
            VALUE => [100.0, 50.0, 200.0, 10.0],
            PORT => ["PortA", "PortB", "PortA", "PortD"],
        )
        .unwrap();
        prepare(raw, &LoadOptions::default()).unwrap()
    }

    fn sorted_ids(view: &FilteredView) -> Vec<u64> {
        let mut ids = view.row_ids().unwrap();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn date_range_is_inclusive() {
        let criteria = FilterCriteria {
            start_date: date(2023, 1, 1),
            end_date: date(2023, 1, 5),
            shipping_method: CategoryFilter::All,
            payment_terms: CategoryFilter::All,
        };
        let view = apply(&dataset(), &criteria).unwrap();
        assert_eq!(sorted_ids(&view), vec![0, 1]);
    }

    #[test]
    fn null_dates_never_pass_the_range() {
        let data = dataset();
        let criteria = FilterCriteria {
            start_date: date(1900, 1, 1),
            end_date: date(2100, 1, 1),
            ..FilterCriteria::covering(&data)
        };
        let view = apply(&data, &criteria).unwrap();
        assert_eq!(sorted_ids(&view), vec![0, 1, 2]);
    }

    #[test]
    fn category_filters_are_conjunctive() {
        let data = dataset();
        let criteria = FilterCriteria {
            shipping_method: CategoryFilter::Only("Air".into()),
            payment_terms: CategoryFilter::Only("Net 60".into()),
            ..FilterCriteria::covering(&data)
        };
        assert!(apply(&data, &criteria).unwrap().is_empty());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let data = dataset();
        let criteria = FilterCriteria {
            start_date: date(2023, 2, 1),
            end_date: date(2023, 1, 1),
            ..FilterCriteria::covering(&data)
        };
        assert!(matches!(
            apply(&data, &criteria),
            Err(FilterError::InvalidRange { .. })
        ));
    }

    #[test]
    fn all_label_round_trips() {
        assert_eq!(CategoryFilter::from_label("All"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_label("Sea"),
            CategoryFilter::Only("Sea".into())
        );
        assert_eq!(CategoryFilter::Only("Sea".into()).to_string(), "Sea");
    }
}
