//! Charts module - chart catalog, series building and rendering

pub mod catalog;
pub mod data;
pub mod plotter;
pub mod renderer;

pub use catalog::{ChartDescriptor, ChartKind, ChartSource, DashboardLayout, CHARTS};
pub use data::{ChartData, ChartSeries};
pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer};
