//! Control Panel Widget
//! Left side panel with the data source, filters, layout and export buttons.

use crate::charts::DashboardLayout;
use crate::data::{CategoryFilter, Dataset, FilterCriteria, ALL_LABEL};
use chrono::{Local, NaiveDate};
use egui::{Color32, ComboBox, RichText};
use egui_extras::DatePickerButton;
use std::path::PathBuf;

/// Current widget selections.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterSettings {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub shipping_method: CategoryFilter,
    pub payment_terms: CategoryFilter,
    pub layout: DashboardLayout,
}

impl Default for FilterSettings {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            start_date: today,
            end_date: today,
            shipping_method: CategoryFilter::All,
            payment_terms: CategoryFilter::All,
            layout: DashboardLayout::default(),
        }
    }
}

/// Left side control panel with file selection and filter controls.
pub struct ControlPanel {
    pub settings: FilterSettings,
    pub data_path: Option<PathBuf>,
    pub shipping_options: Vec<String>,
    pub payment_options: Vec<String>,
    pub status: String,
    pub busy: bool,
    pub data_loaded: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: FilterSettings::default(),
            data_path: None,
            shipping_options: Vec::new(),
            payment_options: Vec::new(),
            status: "Ready".to_string(),
            busy: false,
            data_loaded: false,
        }
    }
}

impl ControlPanel {
    pub fn new(layout: DashboardLayout) -> Self {
        let mut panel = Self::default();
        panel.settings.layout = layout;
        panel
    }

    /// Reset the pickers to a freshly loaded dataset: full date span, All.
    pub fn update_options(&mut self, dataset: &Dataset) {
        let covering = FilterCriteria::covering(dataset);
        self.settings.start_date = covering.start_date;
        self.settings.end_date = covering.end_date;
        self.settings.shipping_method = CategoryFilter::All;
        self.settings.payment_terms = CategoryFilter::All;
        self.shipping_options = dataset.shipping_methods().to_vec();
        self.payment_options = dataset.payment_terms().to_vec();
        self.data_loaded = true;
    }

    /// Criteria for the current selections.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            start_date: self.settings.start_date,
            end_date: self.settings.end_date,
            shipping_method: self.settings.shipping_method.clone(),
            payment_terms: self.settings.payment_terms.clone(),
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚢 Trade Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Imports & Exports").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .data_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(if self.data_loaded {
                        Color32::WHITE
                    } else {
                        Color32::GRAY
                    }));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_enabled_ui(!self.busy, |ui| {
                            if ui.button("📂 Browse").clicked() {
                                action = ControlPanelAction::BrowseCsv;
                            }
                        });
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters =====
        ui.label(RichText::new("🔧 Filter Options").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 110.0;
        let combo_width = 150.0;

        ui.add_enabled_ui(self.data_loaded && !self.busy, |ui| {
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Start Date:"));
                if ui
                    .add(DatePickerButton::new(&mut self.settings.start_date).id_salt("start_date"))
                    .changed()
                {
                    action = ControlPanelAction::FiltersChanged;
                }
            });

            ui.add_space(5.0);

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("End Date:"));
                if ui
                    .add(DatePickerButton::new(&mut self.settings.end_date).id_salt("end_date"))
                    .changed()
                {
                    action = ControlPanelAction::FiltersChanged;
                }
            });

            ui.add_space(10.0);

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Shipping Method:"));
                if Self::category_combo(
                    ui,
                    "shipping_method",
                    combo_width,
                    &mut self.settings.shipping_method,
                    &self.shipping_options,
                ) {
                    action = ControlPanelAction::FiltersChanged;
                }
            });

            ui.add_space(5.0);

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Payment Terms:"));
                if Self::category_combo(
                    ui,
                    "payment_terms",
                    combo_width,
                    &mut self.settings.payment_terms,
                    &self.payment_options,
                ) {
                    action = ControlPanelAction::FiltersChanged;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Layout =====
        ui.label(RichText::new("⚙️ Layout").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            for layout in [DashboardLayout::Classic, DashboardLayout::Extended] {
                if ui
                    .radio_value(&mut self.settings.layout, layout, layout.label())
                    .changed()
                {
                    action = ControlPanelAction::LayoutChanged;
                }
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.data_loaded && !self.busy, |ui| {
                let button = egui::Button::new(RichText::new("⬇ Download Filtered Data").size(14.0))
                    .min_size(egui::vec2(200.0, 32.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportCsv;
                }

                ui.add_space(8.0);

                let button = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                    .min_size(egui::vec2(200.0, 32.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        if self.busy {
            ui.add(egui::Spinner::new());
        }

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Saved") || self.status.starts_with("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// "All" plus every observed value. Returns true when the pick changed.
    fn category_combo(
        ui: &mut egui::Ui,
        id: &str,
        width: f32,
        selected: &mut CategoryFilter,
        options: &[String],
    ) -> bool {
        let before = selected.clone();
        ComboBox::from_id_salt(id)
            .width(width)
            .selected_text(choice_label(selected))
            .show_ui(ui, |ui| {
                for choice in category_choices(options) {
                    let label = choice_label(&choice);
                    ui.selectable_value(selected, choice, label);
                }
            });
        *selected != before
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

/// Picker entries: no restriction first, then one entry per observed value.
fn category_choices(options: &[String]) -> Vec<CategoryFilter> {
    std::iter::once(CategoryFilter::All)
        .chain(options.iter().cloned().map(CategoryFilter::Only))
        .collect()
}

/// A data value spelled like the "All" entry is shown quoted.
fn choice_label(choice: &CategoryFilter) -> String {
    match choice {
        CategoryFilter::Only(value) if value == ALL_LABEL => format!("\"{value}\""),
        other => other.to_string(),
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    FiltersChanged,
    LayoutChanged,
    ExportCsv,
    ExportCharts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_labels_map_to_unfiltered_criteria() {
        let mut panel = ControlPanel::new(DashboardLayout::Classic);
        assert_eq!(panel.settings.layout, DashboardLayout::Classic);

        let criteria = panel.criteria();
        assert_eq!(criteria.shipping_method, CategoryFilter::All);
        assert_eq!(criteria.payment_terms, CategoryFilter::All);

        panel.settings.shipping_method = CategoryFilter::Only("Air".to_string());
        assert_eq!(
            panel.criteria().shipping_method,
            CategoryFilter::Only("Air".to_string())
        );
    }

    #[test]
    fn value_named_all_stays_a_real_filter() {
        let mut panel = ControlPanel::new(DashboardLayout::Extended);
        panel.shipping_options = vec!["All".to_string(), "Air".to_string()];

        let choices = category_choices(&panel.shipping_options);
        assert_eq!(
            choices,
            vec![
                CategoryFilter::All,
                CategoryFilter::Only("All".to_string()),
                CategoryFilter::Only("Air".to_string()),
            ]
        );
        assert_eq!(choice_label(&choices[0]), "All");
        assert_eq!(choice_label(&choices[1]), "\"All\"");

        panel.settings.shipping_method = choices[1].clone();
        assert_eq!(
            panel.criteria().shipping_method,
            CategoryFilter::Only("All".to_string())
        );
    }
}
