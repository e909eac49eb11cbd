//! Statistics Summary Module
//! Box plot summaries and histogram binning for the distribution charts.

use statrs::statistics::{Data, Distribution, Max, Min, OrderStatistics};

/// Matches the dashboard's value histogram.
pub const HISTOGRAM_BINS: usize = 20;

/// Tukey whisker length in multiples of the IQR.
const WHISKER_IQR: f64 = 1.5;

/// Five-number summary of one group, with Tukey whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub group_name: String,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// One histogram bar: `[start, end)` except the last bin, which is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Descriptive statistics for chart series.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Summarise one group's values. Returns `None` when no finite value remains.
    pub fn box_summary(group_name: &str, values: &[f64]) -> Option<BoxSummary> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }

        let mut data = Data::new(finite.clone());
        let q1 = data.lower_quartile();
        let q3 = data.upper_quartile();
        let median = data.median();
        let mean = data.mean().unwrap_or(f64::NAN);
        let min = data.min();
        let max = data.max();

        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        // Whiskers end at the most extreme points still inside the fences
        let whisker_low = finite
            .iter()
            .copied()
            .filter(|&v| v >= low_fence)
            .fold(f64::INFINITY, f64::min)
            .min(q1);
        let whisker_high = finite
            .iter()
            .copied()
            .filter(|&v| v <= high_fence)
            .fold(f64::NEG_INFINITY, f64::max)
            .max(q3);

        let mut outliers: Vec<f64> = finite
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();
        outliers.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        Some(BoxSummary {
            group_name: group_name.to_string(),
            count: finite.len(),
            mean,
            min,
            q1,
            median,
            q3,
            max,
            whisker_low,
            whisker_high,
            outliers,
        })
    }

    /// Padded `(min, max)` range over every value, for shared y axes.
    pub fn value_range(values: &[f64]) -> (f64, f64) {
        let (min, max) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if min.is_infinite() {
            return (0.0, 1.0);
        }
        if min == max {
            return (min - 0.5, max + 0.5);
        }
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }
}

/// Equal-width histogram over the observed range.
///
/// A constant sample is binned over `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (mut lo, mut hi) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + i as f64 * width,
            end: if i + 1 == bins {
                hi
            } else {
                lo + (i + 1) as f64 * width
            },
            count,
        })
        .collect()
}
