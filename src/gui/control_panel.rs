//! Control Panel Widget
//! Left side panel with the dataset filters, data source and export controls.

use crate::config::BoundMode;
use crate::data::FilteredView;
use crate::state::SessionState;
use egui::{Color32, RichText, ScrollArea, Slider};

/// Actions triggered by the control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    OpenCsv,
    ExportCharts,
}

/// Left side control panel.
pub struct ControlPanel;

impl ControlPanel {
    /// Draw the sidebar. Filter widgets write straight into the session.
    pub fn show(
        ui: &mut egui::Ui,
        session: &mut SessionState,
        view: Option<&FilteredView>,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚗 CO2 Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        ui.label(RichText::new("Filter the data you want to analyze: 🌷").size(14.0).strong());
        ui.add_space(8.0);

        Self::show_filters(ui, session, view);

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = session
                        .dataset
                        .as_ref()
                        .and_then(|d| d.path().file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file loaded".to_string());
                    ui.label(RichText::new(path_text).size(12.0));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_enabled_ui(!session.loading, |ui| {
                            if ui.button("📂 Open CSV").clicked() {
                                action = ControlPanelAction::OpenCsv;
                            }
                        });
                    });
                });
            });

        ui.add_space(10.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(session.dataset.is_some(), |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }
            });
        });

        ui.add_space(10.0);

        if session.loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Loading dataset...").size(11.0));
            });
        }

        if let Some(msg) = &session.status_message {
            let color = if msg.starts_with("Error") {
                Color32::from_rgb(220, 53, 69)
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).size(11.0).color(color));
        }

        action
    }

    fn show_filters(ui: &mut egui::Ui, session: &mut SessionState, view: Option<&FilteredView>) {
        let (Some(dataset), Some(bounds)) = (session.dataset.clone(), session.slider_bounds) else {
            ui.label(RichText::new("No dataset loaded").color(Color32::GRAY));
            return;
        };
        let bound_mode = session.config.bound_mode;
        let Some(filters) = session.filters.as_mut() else {
            return;
        };

        // ===== Vehicle class multi-select =====
        ui.label("Select the vehicle class you want to analyze:");
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("vehicle_class_filter")
                    .max_height(220.0)
                    .show(ui, |ui| {
                        for class in dataset.vehicle_classes() {
                            let mut selected = filters.is_selected(class);
                            if ui.checkbox(&mut selected, class).changed() {
                                filters.set_selected(class, selected);
                            }
                        }
                    });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                filters.select_all(dataset.vehicle_classes());
            }
            if ui.small_button("Clear All").clicked() {
                filters.clear_selection();
            }
        });

        ui.add_space(12.0);

        // ===== Engine size range =====
        ui.label("Select the engine size (Liter) you want to analyze:");
        ui.add_space(4.0);

        let (mut lower, mut upper) = filters.engine_range;
        let lower_slider = Slider::new(&mut lower, bounds.min..=bounds.max)
            .step_by(bounds.step)
            .fixed_decimals(1)
            .text("Min");
        if ui.add(lower_slider).changed() {
            filters.set_lower(lower, &bounds);
        }
        let upper_slider = Slider::new(&mut upper, bounds.min..=bounds.max)
            .step_by(bounds.step)
            .fixed_decimals(1)
            .text("Max");
        if ui.add(upper_slider).changed() {
            filters.set_upper(upper, &bounds);
        }

        if let Some(view) = view {
            let excluded = view.excluded_at_bounds();
            if bound_mode == BoundMode::Exclusive && excluded > 0 {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!(
                        "⚠ Range bounds are exclusive: {excluded} row(s) sitting exactly \
                         on a bound are hidden"
                    ))
                    .size(11.0)
                    .color(Color32::from_rgb(243, 156, 18)),
                );
            }
        }
    }
}
