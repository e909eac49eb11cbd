//! Chart Catalog
//! Declarative descriptors for every dashboard chart and the two layouts.

use crate::data::{CategoryField, Measure};
use serde::{Deserialize, Serialize};

/// How a chart is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    BoxPlot,
    Scatter,
    Histogram,
    Pie,
    Bar,
    StackedBar,
    Line,
}

/// Which slice of the filtered view feeds a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSource {
    /// Raw measure values grouped by a category.
    MeasureByCategory(Measure, CategoryField),
    /// (Quantity, Value) pairs per row.
    QuantityVsValue,
    /// Raw measure values binned into a histogram.
    MeasureDistribution(Measure),
    /// Row counts per category value.
    Frequency(CategoryField),
    /// Value summed per (Country, Import_Export).
    ValueByCountryAndDirection,
    /// Value summed per day.
    ValueOverTime,
    /// Quantity summed per (Port, Import_Export).
    QuantityByPortAndDirection,
}

/// One dashboard chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartDescriptor {
    /// Stable identifier, also the PNG file stem.
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub kind: ChartKind,
    pub source: ChartSource,
    pub x_label: &'static str,
    pub y_label: &'static str,
}

/// Which of the two dashboard variants to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardLayout {
    /// The five distribution charts.
    Classic,
    /// Classic plus the three trade-flow charts.
    #[default]
    Extended,
}

impl DashboardLayout {
    pub fn charts(self) -> &'static [ChartDescriptor] {
        match self {
            DashboardLayout::Classic => &CHARTS[..CLASSIC_CHART_COUNT],
            DashboardLayout::Extended => &CHARTS[..],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DashboardLayout::Classic => "Classic",
            DashboardLayout::Extended => "Extended",
        }
    }
}

pub const DASHBOARD_TITLE: &str = "Imports and Exports Dataset Dashboard";

pub const OVERVIEW: &str = "This dashboard visualizes the Imports and Exports dataset, allowing \
users to explore transactions based on different filters such as shipping method and payment \
terms. Use the sidebar to select the desired date range, shipping method, and payment terms for \
your analysis.";

pub const ABOUT: &str = "This dashboard was created to visualize the Imports and Exports dataset. \
It allows users to explore data based on selected filters and gain insights into trade \
activities.";

const CLASSIC_CHART_COUNT: usize = 5;

pub static CHARTS: [ChartDescriptor; 8] = [
    ChartDescriptor {
        id: "value_by_shipping_method_boxplot",
        title: "Boxplot of Value by Shipping Method",
        description: "This boxplot shows the distribution of transaction values across \
different shipping methods. It helps identify any outliers and trends.",
        kind: ChartKind::BoxPlot,
        source: ChartSource::MeasureByCategory(Measure::Value, CategoryField::ShippingMethod),
        x_label: "Shipping Method",
        y_label: "Value",
    },
    ChartDescriptor {
        id: "quantity_vs_value_scatter",
        title: "Scatter Plot of Quantity vs Value",
        description: "The scatter plot illustrates the relationship between quantity and value \
of transactions. Each point represents a transaction.",
        kind: ChartKind::Scatter,
        source: ChartSource::QuantityVsValue,
        x_label: "Quantity",
        y_label: "Value",
    },
    ChartDescriptor {
        id: "value_histogram",
        title: "Histogram of Transaction Values",
        description: "This histogram displays the frequency distribution of transaction values, \
providing insights into the most common transaction amounts.",
        kind: ChartKind::Histogram,
        source: ChartSource::MeasureDistribution(Measure::Value),
        x_label: "Value",
        y_label: "Frequency",
    },
    ChartDescriptor {
        id: "payment_terms_pie",
        title: "Pie Chart of Payment Terms",
        description: "This pie chart represents the distribution of payment terms used in \
transactions. It helps understand common practices in payment terms.",
        kind: ChartKind::Pie,
        source: ChartSource::Frequency(CategoryField::PaymentTerms),
        x_label: "",
        y_label: "",
    },
    ChartDescriptor {
        id: "shipping_method_distribution",
        title: "Distribution of Shipping Methods",
        description: "This bar chart shows the number of transactions for each shipping method, \
highlighting the most frequently used methods.",
        kind: ChartKind::Bar,
        source: ChartSource::Frequency(CategoryField::ShippingMethod),
        x_label: "Shipping Method",
        y_label: "Number of Transactions",
    },
    ChartDescriptor {
        id: "value_by_country_and_direction",
        title: "Total Value of Imports vs Exports by Country",
        description: "This bar chart compares the total import and export values for each \
country, providing insights into trade relationships.",
        kind: ChartKind::StackedBar,
        source: ChartSource::ValueByCountryAndDirection,
        x_label: "Country",
        y_label: "Value",
    },
    ChartDescriptor {
        id: "value_over_time",
        title: "Transaction Value Over Time",
        description: "This line chart illustrates the trend of total transaction values over \
time, revealing seasonal patterns and changes in trading activity.",
        kind: ChartKind::Line,
        source: ChartSource::ValueOverTime,
        x_label: "Date",
        y_label: "Value",
    },
    ChartDescriptor {
        id: "quantity_by_port_and_direction",
        title: "Export vs Import Quantity by Port",
        description: "This stacked bar chart shows the quantities of imports and exports for \
each port, helping to visualize trade flow.",
        kind: ChartKind::StackedBar,
        source: ChartSource::QuantityByPortAndDirection,
        x_label: "Port",
        y_label: "Quantity",
    },
];
