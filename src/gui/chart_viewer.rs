//! Chart Viewer Widget
//! Right side scrollable panel showing the layout's charts as cards.
//! Cards wrap into as many columns as the available width allows.

use crate::charts::catalog::{ABOUT, DASHBOARD_TITLE, OVERVIEW};
use crate::charts::{ChartData, ChartPlotter, DashboardLayout};
use egui::{Color32, RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;
const CHART_WIDTH: f32 = 620.0;

/// Scrollable chart display area.
#[derive(Default)]
pub struct ChartViewer {
    pub charts: Vec<ChartData>,
    pub layout: DashboardLayout,
    /// Rows in the filtered view behind the charts.
    pub row_count: usize,
}

impl ChartViewer {
    pub fn new(layout: DashboardLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn clear(&mut self) {
        self.charts.clear();
        self.row_count = 0;
    }

    pub fn set_charts(&mut self, layout: DashboardLayout, charts: Vec<ChartData>, row_count: usize) {
        self.layout = layout;
        self.charts = charts;
        self.row_count = row_count;
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        if self.charts.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        let avail_width = ui.available_width();
        let num_columns = ((avail_width / (CHART_WIDTH + CHART_SPACING)).floor() as usize).max(1);
        let extended = self.layout == DashboardLayout::Extended;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new(DASHBOARD_TITLE).strong());
                if extended {
                    ui.add_space(4.0);
                    ui.label(OVERVIEW);
                }
                ui.label(
                    RichText::new(format!("{} transactions match the current filters", self.row_count))
                        .color(Color32::GRAY),
                );
                ui.add_space(CHART_SPACING);

                for row in self.charts.chunks(num_columns) {
                    ui.horizontal_top(|ui| {
                        for chart in row {
                            Self::draw_chart_card(ui, chart);
                            ui.add_space(CHART_SPACING);
                        }
                    });
                    ui.add_space(CHART_SPACING);
                }

                if extended {
                    ui.separator();
                    ui.label(RichText::new("About").strong());
                    ui.label(ABOUT);
                }
            });
    }

    fn draw_chart_card(ui: &mut egui::Ui, chart: &ChartData) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(CHART_WIDTH - 24.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(chart.descriptor.title).size(18.0).strong());
                    ui.label(RichText::new(chart.descriptor.description).size(12.0).color(Color32::GRAY));
                    ui.add_space(8.0);
                    ChartPlotter::draw(ui, chart);
                });
            });
    }
}
