//! Data module - CSV loading, filtering, aggregation and export
//!
//! ```text
//!  CSV ──▶ loader ──▶ Dataset ──▶ filter ──▶ FilteredView ──▶ aggregate
//!                                                 │
//!                                                 └──▶ export (CSV)
//! ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;

pub use aggregate::{
    category_frequency, quantity_by_port_and_direction, value_by_country_and_direction,
    value_over_time, AggregateError, CategoryCount, DatedTotal, GroupTotal,
};
pub use export::{write_csv, ExportError};
pub use filter::{apply, CategoryFilter, FilterCriteria, FilterError, ALL_LABEL};
pub use loader::{load, LoadOptions, LoaderError};
pub use model::{CategoryField, Dataset, Direction, FilteredView, Measure, Transaction};
