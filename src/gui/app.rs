//! Trade Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::charts::{ChartData, StaticChartRenderer};
use crate::config::DashboardConfig;
use crate::data::{self, Dataset, FilteredView};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// CSV loading result from background thread
enum LoadResult {
    Complete { dataset: Dataset, path: PathBuf },
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    dataset: Option<Dataset>,
    view: Option<FilteredView>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
}

impl DashboardApp {
    /// Create the window and start loading the configured data file.
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(config.layout),
            chart_viewer: ChartViewer::new(config.layout),
            dataset: None,
            view: None,
            load_rx: None,
            config,
        };
        let path = app.config.data_path.clone();
        app.start_load(path);
        app
    }

    fn handle_browse_csv(&mut self) {
        if self.load_rx.is_some() {
            return; // Already loading
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_load(path);
        }
    }

    /// Load and sample a CSV on a background thread.
    fn start_load(&mut self, path: PathBuf) {
        self.control_panel.data_path = Some(path.clone());
        self.control_panel.busy = true;
        self.control_panel.set_status("Loading CSV file...");

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        let options = self.config.load_options();

        thread::spawn(move || {
            let result = match data::load(&path, &options) {
                Ok(dataset) => LoadResult::Complete { dataset, path },
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete { dataset, path }) => {
                self.control_panel.busy = false;
                self.control_panel.update_options(&dataset);
                self.control_panel.set_status(format!(
                    "Loaded {} rows from {}",
                    dataset.len(),
                    path.display()
                ));
                self.dataset = Some(dataset);
                self.recompute();
            }
            Ok(LoadResult::Error(error)) => {
                log::error!("Load failed: {}", error);
                self.control_panel.busy = false;
                self.control_panel.set_status(format!("Error: {}", error));
            }
            // Put receiver back while the thread is still working
            Err(std::sync::mpsc::TryRecvError::Empty) => self.load_rx = Some(rx),
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.control_panel.busy = false;
                self.control_panel.set_status("Error: loader stopped unexpectedly");
            }
        }
    }

    /// Re-run filter and aggregation for the current selections.
    fn recompute(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        let layout = self.control_panel.settings.layout;

        let view = match data::apply(dataset, &self.control_panel.criteria()) {
            Ok(view) => view,
            Err(e) => {
                self.view = None;
                self.chart_viewer.clear();
                self.control_panel.set_status(format!("Error: {}", e));
                return;
            }
        };

        match ChartData::build_all(layout.charts(), &view) {
            Ok(charts) => {
                self.control_panel
                    .set_status(format!("{} of {} rows selected", view.len(), dataset.len()));
                self.chart_viewer.set_charts(layout, charts, view.len());
                self.view = Some(view);
            }
            Err(e) => {
                log::error!("Aggregation failed: {}", e);
                self.view = None;
                self.chart_viewer.clear();
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }

    fn handle_export_csv(&mut self) {
        let Some(view) = &self.view else {
            self.control_panel.set_status("Error: nothing to export");
            return;
        };

        match data::write_csv(view, &self.config.export_path, &self.config.date_format) {
            Ok(rows) => self.control_panel.set_status(format!(
                "Saved {} rows to {}",
                rows,
                self.config.export_path.display()
            )),
            Err(e) => {
                log::error!("CSV export failed: {}", e);
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }

    fn handle_export_charts(&mut self) {
        if self.chart_viewer.charts.is_empty() {
            self.control_panel.set_status("Error: no charts to export");
            return;
        }

        let Some(dir) = rfd::FileDialog::new()
            .set_directory(&self.config.chart_dir)
            .pick_folder()
        else {
            return; // User cancelled
        };

        match StaticChartRenderer::render_all(&self.chart_viewer.charts, &dir, self.config.chart_size())
        {
            Ok(paths) => self
                .control_panel
                .set_status(format!("Saved {} charts to {}", paths.len(), dir.display())),
            Err(e) => {
                log::error!("Chart export failed: {}", e);
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Request repaint while loading
        if self.load_rx.is_some() {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::FiltersChanged | ControlPanelAction::LayoutChanged => {
                            self.recompute()
                        }
                        ControlPanelAction::ExportCsv => self.handle_export_csv(),
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
