//! Chart Plotter Module
//! Draws chart data interactively using egui_plot.

use crate::charts::catalog::ChartKind;
use crate::charts::data::{shares, ChartData, ChartSeries};
use crate::data::aggregate::{directions, group_keys, CategoryCount, DatedTotal, GroupTotal};
use crate::data::model::{date_to_days, days_to_date, Direction};
use crate::stats::{BoxSummary, HistogramBin};
use egui::{Align2, Color32, FontId, RichText, Sense, Shape, Stroke};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoint, PlotPoints, Points,
    Text,
};
use std::ops::RangeInclusive;

pub const IMPORT_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const EXPORT_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

const PLOT_HEIGHT: f32 = 320.0;
const BAR_WIDTH: f64 = 0.6;

/// Draws the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for the n-th category.
    pub fn get_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Import/Export get fixed colors; anything else falls back to the palette.
    pub fn direction_color(direction: &str, index: usize) -> Color32 {
        match Direction::from_label(direction) {
            Some(Direction::Import) => IMPORT_COLOR,
            Some(Direction::Export) => EXPORT_COLOR,
            None => Self::get_color(index + 2),
        }
    }

    /// Draw one chart according to its descriptor.
    pub fn draw(ui: &mut egui::Ui, chart: &ChartData) {
        if chart.series.is_empty() {
            ui.add_sized(
                [ui.available_width(), PLOT_HEIGHT],
                egui::Label::new(RichText::new("No data for the current filters").color(Color32::GRAY)),
            );
            return;
        }

        let d = &chart.descriptor;
        match (&chart.series, d.kind) {
            (ChartSeries::Boxes(boxes), _) => Self::draw_boxplot(ui, d.id, boxes, d.x_label, d.y_label),
            (ChartSeries::Points(points), _) => {
                Self::draw_scatter(ui, d.id, points, d.x_label, d.y_label)
            }
            (ChartSeries::Histogram(bins), _) => {
                Self::draw_histogram(ui, d.id, bins, d.x_label, d.y_label)
            }
            (ChartSeries::Counts(counts), ChartKind::Pie) => Self::draw_pie(ui, counts),
            (ChartSeries::Counts(counts), _) => {
                Self::draw_count_bars(ui, d.id, counts, d.x_label, d.y_label)
            }
            (ChartSeries::Grouped(groups), _) => {
                Self::draw_stacked_bars(ui, d.id, groups, d.x_label, d.y_label)
            }
            (ChartSeries::Timeline(points), _) => {
                Self::draw_timeline(ui, d.id, points, d.x_label, d.y_label)
            }
        }
    }

    /// Formatter showing category names at integer positions only.
    fn category_formatter(
        labels: Vec<String>,
    ) -> impl Fn(egui_plot::GridMark, &RangeInclusive<f64>) -> String {
        move |mark, _range| {
            let rounded = mark.value.round();
            if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            labels.get(rounded as usize).cloned().unwrap_or_default()
        }
    }

    fn draw_boxplot(ui: &mut egui::Ui, id: &str, boxes: &[BoxSummary], x_label: &str, y_label: &str) {
        let labels: Vec<String> = boxes.iter().map(|b| b.group_name.clone()).collect();

        Plot::new(id)
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .x_axis_formatter(Self::category_formatter(labels))
            .show(ui, |plot_ui| {
                for (i, summary) in boxes.iter().enumerate() {
                    let color = Self::get_color(i);
                    let x = i as f64;

                    let elem = BoxElem::new(
                        x,
                        BoxSpread::new(
                            summary.whisker_low,
                            summary.q1,
                            summary.median,
                            summary.q3,
                            summary.whisker_high,
                        ),
                    )
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(Stroke::new(1.5, color));
                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&summary.group_name));

                    if !summary.outliers.is_empty() {
                        let outliers: PlotPoints =
                            summary.outliers.iter().map(|&v| [x, v]).collect();
                        plot_ui.points(
                            Points::new(outliers)
                                .radius(2.5)
                                .color(color.gamma_multiply(0.7)),
                        );
                    }
                }
            });
    }

    fn draw_scatter(ui: &mut egui::Ui, id: &str, points: &[[f64; 2]], x_label: &str, y_label: &str) {
        Plot::new(id)
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(2.0)
                        .color(Self::get_color(0)),
                );
            });
    }

    fn draw_histogram(
        ui: &mut egui::Ui,
        id: &str,
        bins: &[HistogramBin],
        x_label: &str,
        y_label: &str,
    ) {
        let bars: Vec<Bar> = bins
            .iter()
            .map(|bin| {
                Bar::new((bin.start + bin.end) / 2.0, bin.count as f64)
                    .width(bin.end - bin.start)
                    .stroke(Stroke::new(1.0, Color32::BLACK))
            })
            .collect();

        Plot::new(id)
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(Self::get_color(0)));
            });
    }

    fn draw_count_bars(
        ui: &mut egui::Ui,
        id: &str,
        counts: &[CategoryCount],
        x_label: &str,
        y_label: &str,
    ) {
        let labels: Vec<String> = counts.iter().map(|c| c.value.clone()).collect();

        Plot::new(id)
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .include_y(0.0)
            .x_axis_formatter(Self::category_formatter(labels))
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = counts
                    .iter()
                    .enumerate()
                    .map(|(i, c)| {
                        Bar::new(i as f64, c.count as f64)
                            .width(BAR_WIDTH)
                            .name(&c.value)
                            .fill(Self::get_color(i))
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars));

                // Count annotation above every bar
                for (i, c) in counts.iter().enumerate() {
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(i as f64, c.count as f64),
                            RichText::new(c.count.to_string()).size(12.0),
                        )
                        .anchor(Align2::CENTER_BOTTOM),
                    );
                }
            });
    }

    fn draw_stacked_bars(
        ui: &mut egui::Ui,
        id: &str,
        groups: &[GroupTotal],
        x_label: &str,
        y_label: &str,
    ) {
        let keys = group_keys(groups);
        let directions = directions(groups);

        let charts: Vec<BarChart> = directions
            .iter()
            .enumerate()
            .map(|(d_idx, direction)| {
                let bars: Vec<Bar> = keys
                    .iter()
                    .enumerate()
                    .map(|(k_idx, key)| {
                        let total = groups
                            .iter()
                            .find(|g| &g.key == key && &g.direction == direction)
                            .map_or(0.0, |g| g.total);
                        Bar::new(k_idx as f64, total).width(BAR_WIDTH)
                    })
                    .collect();
                BarChart::new(bars)
                    .name(direction)
                    .color(Self::direction_color(direction, d_idx))
            })
            .collect();

        Plot::new(id)
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .include_y(0.0)
            .x_axis_formatter(Self::category_formatter(keys))
            .show(ui, |plot_ui| {
                let mut below: Vec<BarChart> = Vec::new();
                for chart in charts {
                    let stacked = {
                        let refs: Vec<&BarChart> = below.iter().collect();
                        chart.stack_on(&refs)
                    };
                    below.push(stacked);
                }
                for chart in below {
                    plot_ui.bar_chart(chart);
                }
            });
    }

    fn draw_timeline(
        ui: &mut egui::Ui,
        id: &str,
        points: &[DatedTotal],
        x_label: &str,
        y_label: &str,
    ) {
        let line: PlotPoints = points
            .iter()
            .map(|p| [date_to_days(p.date) as f64, p.total])
            .collect();

        Plot::new(id)
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .x_axis_formatter(|mark, _range| {
                days_to_date(mark.value.round() as i32)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(line).color(Self::get_color(0)).width(1.5));
            });
    }

    /// Pie with percentage labels, painted directly.
    fn draw_pie(ui: &mut egui::Ui, counts: &[CategoryCount]) {
        let split = shares(counts);
        let size = egui::vec2(ui.available_width(), PLOT_HEIGHT);
        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        let rect = response.rect;
        let center = egui::pos2(rect.left() + rect.height() * 0.6, rect.center().y);
        let radius = rect.height() * 0.42;

        let mut angle = -std::f32::consts::FRAC_PI_2;
        for (i, (label, share)) in split.iter().enumerate() {
            let color = Self::get_color(i);
            let sweep = (*share as f32 / 100.0) * std::f32::consts::TAU;

            // Fan of thin triangles keeps every shape convex
            let steps = ((sweep / 0.05).ceil() as usize).max(1);
            for s in 0..steps {
                let a0 = angle + sweep * s as f32 / steps as f32;
                let a1 = angle + sweep * (s + 1) as f32 / steps as f32;
                painter.add(Shape::convex_polygon(
                    vec![
                        center,
                        center + radius * egui::vec2(a0.cos(), a0.sin()),
                        center + radius * egui::vec2(a1.cos(), a1.sin()),
                    ],
                    color,
                    Stroke::NONE,
                ));
            }

            let mid = angle + sweep / 2.0;
            painter.text(
                center + radius * 0.65 * egui::vec2(mid.cos(), mid.sin()),
                Align2::CENTER_CENTER,
                format!("{:.2}%", share),
                FontId::proportional(12.0),
                Color32::WHITE,
            );

            // Legend on the right
            let legend_y = rect.top() + 20.0 + i as f32 * 20.0;
            let legend_x = center.x + radius + 30.0;
            painter.rect_filled(
                egui::Rect::from_min_size(egui::pos2(legend_x, legend_y), egui::vec2(14.0, 14.0)),
                3.0,
                color,
            );
            painter.text(
                egui::pos2(legend_x + 20.0, legend_y + 7.0),
                Align2::LEFT_CENTER,
                label,
                FontId::proportional(13.0),
                ui.visuals().text_color(),
            );

            angle += sweep;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_colors_are_fixed() {
        assert_eq!(ChartPlotter::direction_color("Import", 5), IMPORT_COLOR);
        assert_eq!(ChartPlotter::direction_color("Export", 0), EXPORT_COLOR);
        assert_eq!(ChartPlotter::direction_color("Transit", 0), PALETTE[2]);
    }

    #[test]
    fn category_formatter_skips_fractional_marks() {
        let fmt = ChartPlotter::category_formatter(vec!["Air".into(), "Sea".into()]);
        let mark = |value| egui_plot::GridMark {
            value,
            step_size: 0.5,
        };
        assert_eq!(fmt(mark(1.0), &(0.0..=1.0)), "Sea");
        assert_eq!(fmt(mark(0.5), &(0.0..=1.0)), "");
        assert_eq!(fmt(mark(3.0), &(0.0..=1.0)), "");
    }
}
