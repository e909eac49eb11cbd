//! Chart Data Module
//! Turns a chart descriptor and a filtered view into the series it draws.

use crate::charts::catalog::{ChartDescriptor, ChartSource};
use crate::data::aggregate::{self, AggregateError, CategoryCount, DatedTotal, GroupTotal};
use crate::data::model::{f64_values, str_values};
use crate::data::{FilteredView, Measure};
use crate::stats::{histogram, BoxSummary, HistogramBin, StatsCalculator, HISTOGRAM_BINS};
use std::collections::BTreeMap;

/// Series behind one chart, one variant per chart source shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSeries {
    Boxes(Vec<BoxSummary>),
    Points(Vec<[f64; 2]>),
    Histogram(Vec<HistogramBin>),
    Counts(Vec<CategoryCount>),
    Grouped(Vec<GroupTotal>),
    Timeline(Vec<DatedTotal>),
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        match self {
            ChartSeries::Boxes(v) => v.is_empty(),
            ChartSeries::Points(v) => v.is_empty(),
            ChartSeries::Histogram(v) => v.is_empty(),
            ChartSeries::Counts(v) => v.is_empty(),
            ChartSeries::Grouped(v) => v.is_empty(),
            ChartSeries::Timeline(v) => v.is_empty(),
        }
    }
}

/// A descriptor together with the series computed for the current view.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub descriptor: ChartDescriptor,
    pub series: ChartSeries,
}

impl ChartData {
    pub fn build(descriptor: &ChartDescriptor, view: &FilteredView) -> Result<Self, AggregateError> {
        let series = match descriptor.source {
            ChartSource::MeasureByCategory(measure, field) => {
                ChartSeries::Boxes(boxes_by_category(view, measure, field.column())?)
            }
            ChartSource::QuantityVsValue => ChartSeries::Points(quantity_value_pairs(view)?),
            ChartSource::MeasureDistribution(measure) => ChartSeries::Histogram(histogram(
                &view.measure_values(measure)?,
                HISTOGRAM_BINS,
            )),
            ChartSource::Frequency(field) => {
                ChartSeries::Counts(aggregate::category_frequency(view, field)?)
            }
            ChartSource::ValueByCountryAndDirection => {
                ChartSeries::Grouped(aggregate::value_by_country_and_direction(view)?)
            }
            ChartSource::ValueOverTime => {
                ChartSeries::Timeline(aggregate::value_over_time(view)?)
            }
            ChartSource::QuantityByPortAndDirection => {
                ChartSeries::Grouped(aggregate::quantity_by_port_and_direction(view)?)
            }
        };

        Ok(Self {
            descriptor: *descriptor,
            series,
        })
    }

    /// Build every chart of a layout.
    pub fn build_all(
        descriptors: &[ChartDescriptor],
        view: &FilteredView,
    ) -> Result<Vec<Self>, AggregateError> {
        descriptors.iter().map(|d| Self::build(d, view)).collect()
    }
}

/// Box summaries per category value, ordered by category name.
fn boxes_by_category(
    view: &FilteredView,
    measure: Measure,
    column: &str,
) -> Result<Vec<BoxSummary>, AggregateError> {
    let categories = str_values(view.frame(), column)?;
    let values = f64_values(view.frame(), measure.column())?;

    let mut by_group: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (category, value) in categories.into_iter().zip(values) {
        if let (Some(category), Some(value)) = (category, value) {
            by_group.entry(category).or_default().push(value);
        }
    }

    Ok(by_group
        .iter()
        .filter_map(|(group, values)| StatsCalculator::box_summary(group, values))
        .collect())
}

fn quantity_value_pairs(view: &FilteredView) -> Result<Vec<[f64; 2]>, AggregateError> {
    let quantities = f64_values(view.frame(), Measure::Quantity.column())?;
    let values = f64_values(view.frame(), Measure::Value.column())?;
    Ok(quantities
        .into_iter()
        .zip(values)
        .filter_map(|(q, v)| Some([q?, v?]))
        .collect())
}

/// Percentage share of each count out of the total.
pub fn shares(counts: &[CategoryCount]) -> Vec<(String, f64)> {
    let total: u64 = counts.iter().map(|c| c.count).sum();
    if total == 0 {
        return Vec::new();
    }
    counts
        .iter()
        .map(|c| (c.value.clone(), c.count as f64 * 100.0 / total as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::catalog::{DashboardLayout, CHARTS};
    use crate::data::filter::{apply, FilterCriteria};
    use crate::data::loader::{prepare, LoadOptions};
    use crate::data::model::*;
    use polars::prelude::*;

    fn view() -> FilteredView {
        let raw = df!(
            DATE => ["01-01-2023", "05-01-2023", "01-02-2023"],
            COUNTRY => ["India", "China", "India"],
            IMPORT_EXPORT => ["Export", "Import", "Export"],
            SHIPPING_METHOD => ["Air", "Sea", "Air"],
            PAYMENT_TERMS => ["Net 30", "Net 60", "Net 30"],
            QUANTITY => [10.0, 5.0, 20.0],
            VALUE => [100.0, 50.0, 200.0],
            PORT => ["PortA", "PortB", "PortA"],
        )
        .unwrap();
        let data = prepare(raw, &LoadOptions::default()).unwrap();
        apply(&data, &FilterCriteria::covering(&data)).unwrap()
    }

    #[test]
    fn every_extended_chart_builds() {
        let view = view();
        let charts = ChartData::build_all(DashboardLayout::Extended.charts(), &view).unwrap();
        assert_eq!(charts.len(), CHARTS.len());
        assert!(charts.iter().all(|c| !c.series.is_empty()));
    }

    #[test]
    fn boxes_are_grouped_by_shipping_method() {
        let chart = ChartData::build(&CHARTS[0], &view()).unwrap();
        match chart.series {
            ChartSeries::Boxes(boxes) => {
                let names: Vec<&str> = boxes.iter().map(|b| b.group_name.as_str()).collect();
                assert_eq!(names, vec!["Air", "Sea"]);
                assert_eq!(boxes[0].count, 2);
            }
            other => panic!("unexpected series {other:?}"),
        }
    }

    #[test]
    fn scatter_has_one_point_per_row() {
        let chart = ChartData::build(&CHARTS[1], &view()).unwrap();
        match chart.series {
            ChartSeries::Points(points) => assert_eq!(points.len(), 3),
            other => panic!("unexpected series {other:?}"),
        }
    }

    #[test]
    fn shares_sum_to_one_hundred() {
        let counts = vec![
            CategoryCount {
                value: "Net 30".into(),
                count: 2,
            },
            CategoryCount {
                value: "Net 60".into(),
                count: 1,
            },
        ];
        let split = shares(&counts);
        let total: f64 = split.iter().map(|(_, s)| s).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert!(shares(&[]).is_empty());
    }
}
