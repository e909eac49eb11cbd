//! Stats module - descriptive summaries behind the distribution charts

mod summary;

pub use summary::{histogram, BoxSummary, HistogramBin, StatsCalculator, HISTOGRAM_BINS};
