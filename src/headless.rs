//! Windowless run: load, filter, summarise, export CSV and chart images.

use crate::charts::{ChartData, StaticChartRenderer};
use crate::cli::Args;
use crate::config::DashboardConfig;
use crate::data::{self, AggregateError, Dataset, FilterCriteria, FilteredView};
use anyhow::Context;
use std::path::PathBuf;

/// What a headless run produced.
#[derive(Debug)]
pub struct HeadlessReport {
    pub summary: String,
    pub exported_rows: usize,
    pub charts: Vec<PathBuf>,
}

pub fn run(config: &DashboardConfig, args: &Args) -> anyhow::Result<HeadlessReport> {
    let dataset = data::load(&config.data_path, &config.load_options())
        .with_context(|| format!("loading {}", config.data_path.display()))?;
    let criteria = args.criteria(&dataset);
    let view = data::apply(&dataset, &criteria).context("applying filters")?;

    let summary = summarize(&dataset, &criteria, &view).context("aggregating filtered rows")?;

    let exported_rows = data::write_csv(&view, &config.export_path, &config.date_format)
        .context("exporting filtered rows")?;

    let charts = ChartData::build_all(config.layout.charts(), &view)
        .context("building chart data")?;
    let charts = StaticChartRenderer::render_all(&charts, &config.chart_dir, config.chart_size())
        .context("rendering charts")?;

    Ok(HeadlessReport {
        summary,
        exported_rows,
        charts,
    })
}

/// Plain-text report of the view and every aggregate.
pub fn summarize(
    dataset: &Dataset,
    criteria: &FilterCriteria,
    view: &FilteredView,
) -> Result<String, AggregateError> {
    let mut out = format!(
        "Rows: {} of {} ({} to {}, shipping {}, payment {})\n",
        view.len(),
        dataset.len(),
        criteria.start_date,
        criteria.end_date,
        criteria.shipping_method,
        criteria.payment_terms
    );

    out.push_str("\nValue by country and direction:\n");
    for g in data::value_by_country_and_direction(view)? {
        out.push_str(&format!("  {:<20} {:<8} {:>16.2}\n", g.key, g.direction, g.total));
    }

    out.push_str("\nValue over time:\n");
    for d in data::value_over_time(view)? {
        out.push_str(&format!("  {} {:>16.2}\n", d.date, d.total));
    }

    out.push_str("\nQuantity by port and direction:\n");
    for g in data::quantity_by_port_and_direction(view)? {
        out.push_str(&format!("  {:<20} {:<8} {:>16.2}\n", g.key, g.direction, g.total));
    }

    for field in [
        data::CategoryField::ShippingMethod,
        data::CategoryField::PaymentTerms,
    ] {
        out.push_str(&format!("\n{} frequency:\n", field.label()));
        for c in data::category_frequency(view, field)? {
            out.push_str(&format!("  {:<20} {:>8}\n", c.value, c.count));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{prepare, LoadOptions};
    use crate::data::model::*;
    use polars::prelude::*;

    #[test]
    fn summary_lists_every_aggregate() {
        let raw = df!(
            DATE => ["01-01-2023", "05-01-2023"],
            COUNTRY => ["India", "China"],
            IMPORT_EXPORT => ["Export", "Import"],
            SHIPPING_METHOD => ["Air", "Sea"],
            PAYMENT_TERMS => ["Net 30", "Net 60"],
            QUANTITY => [10.0, 5.0],
            VALUE => [100.0, 50.0],
            PORT => ["PortA", "PortB"],
        )
        .unwrap();
        let dataset = prepare(raw, &LoadOptions::default()).unwrap();
        let criteria = FilterCriteria::covering(&dataset);
        let view = data::apply(&dataset, &criteria).unwrap();

        let text = summarize(&dataset, &criteria, &view).unwrap();
        assert!(text.starts_with("Rows: 2 of 2 (2023-01-01 to 2023-01-05"));
        assert!(text.contains("India"));
        assert!(text.contains("PortB"));
        assert!(text.contains("Shipping Method frequency:"));
    }

    #[test]
    fn summary_sections_follow_in_order() {
        let raw = df!(
            DATE => ["01-01-2023", "01-01-2023"],
            COUNTRY => ["India", "India"],
            IMPORT_EXPORT => ["Export", "Export"],
            SHIPPING_METHOD => ["Air", "Air"],
            PAYMENT_TERMS => ["Net 30", "Net 30"],
            QUANTITY => [10.0, 5.0],
            VALUE => [100.0, 50.0],
            PORT => ["PortA", "PortA"],
        )
        .unwrap();
        let dataset = prepare(raw, &LoadOptions::default()).unwrap();
        let criteria = FilterCriteria::covering(&dataset);
        let view = data::apply(&dataset, &criteria).unwrap();

        let text = summarize(&dataset, &criteria, &view).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Rows: 2 of 2 (2023-01-01 to 2023-01-01, shipping All, payment All)",
                "",
                "Value by country and direction:",
                "  India                Export             150.00",
                "",
                "Value over time:",
                "  2023-01-01           150.00",
                "",
                "Quantity by port and direction:",
                "  PortA                Export              15.00",
                "",
                "Shipping Method frequency:",
                "  Air                         2",
                "",
                "Payment Terms frequency:",
                "  Net 30                      2",
            ]
        );
    }
}
