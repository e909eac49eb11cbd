//! Command line arguments. Flags override values from the config file.

use crate::charts::DashboardLayout;
use crate::config::DashboardConfig;
use crate::data::{CategoryFilter, Dataset, FilterCriteria};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(version, about = "Imports & Exports trade dashboard")]
pub struct Args {
    /// Trade CSV to load
    pub data: Option<PathBuf>,

    /// JSON config file
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Number of rows to sample from the file
    #[arg(long = "sample-size")]
    pub sample_size: Option<usize>,

    /// Seed for the row sample
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Which set of charts to show
    #[arg(long = "layout", value_enum)]
    pub layout: Option<LayoutArg>,

    /// Run the pipeline without a window and exit
    #[arg(long = "headless", action)]
    pub headless: bool,

    /// First day of the date range (YYYY-MM-DD)
    #[arg(long = "start", value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Last day of the date range (YYYY-MM-DD)
    #[arg(long = "end", value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    /// Shipping method to keep, or "All"
    #[arg(long = "shipping")]
    pub shipping: Option<String>,

    /// Payment terms to keep, or "All"
    #[arg(long = "payment")]
    pub payment: Option<String>,

    /// Where the filtered CSV is written
    #[arg(long = "export")]
    pub export: Option<PathBuf>,

    /// Directory for rendered chart images
    #[arg(long = "charts")]
    pub charts: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutArg {
    Classic,
    Extended,
}

impl From<LayoutArg> for DashboardLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Classic => DashboardLayout::Classic,
            LayoutArg::Extended => DashboardLayout::Extended,
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{value}': {e}"))
}

impl Args {
    /// Overlay the flags that were given onto `config`.
    pub fn apply_to(&self, config: &mut DashboardConfig) {
        if let Some(data) = &self.data {
            config.data_path = data.clone();
        }
        if let Some(sample_size) = self.sample_size {
            config.sample_size = sample_size;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(layout) = self.layout {
            config.layout = layout.into();
        }
        if let Some(export) = &self.export {
            config.export_path = export.clone();
        }
        if let Some(charts) = &self.charts {
            config.chart_dir = charts.clone();
        }
    }

    /// Filter criteria from the flags, defaulting to the whole dataset.
    pub fn criteria(&self, dataset: &Dataset) -> FilterCriteria {
        let mut criteria = FilterCriteria::covering(dataset);
        if let Some(start) = self.start {
            criteria.start_date = start;
        }
        if let Some(end) = self.end {
            criteria.end_date = end;
        }
        if let Some(shipping) = &self.shipping {
            criteria.shipping_method = CategoryFilter::from_label(shipping);
        }
        if let Some(payment) = &self.payment {
            criteria.payment_terms = CategoryFilter::from_label(payment);
        }
        criteria
    }
}
