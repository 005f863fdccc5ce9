//! Chart Viewer Widget
//! Central scrollable page: dataset preview, title and the three chart sections.
//! Each section is a two-column row with text (and a selector) beside its plot.

use crate::charts::{ChartPlotter, DashboardCharts, ScatterSeries};
use crate::data::{Dataset, FilteredView, FuelColumn};
use crate::state::SessionState;
use egui::{Color32, ComboBox, RichText, ScrollArea};
use polars::prelude::PolarsResult;

const PREVIEW_ROWS: usize = 5;

const INTRO_TEXT: &str = "Hello there, this page is a simple data analysis dashboard. \
On this page, you can visualize the distribution of some variables \
or the correlation between variables.";

const ENGINE_TEXT: &str = "The box plot of engine sizes by automotive manufacturer. \
What types of engine sizes do manufacturers produce the most for each brand?";

const CONSUMPTION_TEXT: &str = "The scatter plot illustrating fuel efficiency \
based on engine sizes. \
Which manufacturer might have lower fuel efficiency within the same engine size? \
Which manufacturer might have higher fuel efficiency within the same engine size?";

const EMISSION_TEXT: &str = "The scatter plot depicting the correlation between \
fuel efficiency and carbon emissions, with color differentiation for each manufacturer. \
Which manufacturer might have higher carbon emissions within the same fuel efficiency range?";

/// Main dashboard page.
pub struct ChartViewer;

impl ChartViewer {
    /// Draw the page for the current session and view.
    pub fn show(
        ui: &mut egui::Ui,
        session: &mut SessionState,
        view: Option<&PolarsResult<FilteredView>>,
    ) {
        if let Some(error) = &session.load_error {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(format!("⚠ Failed to load dataset\n\n{error}"))
                        .size(18.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            });
            return;
        }

        let Some(dataset) = session.dataset.clone() else {
            ui.centered_and_justified(|ui| {
                if session.loading {
                    ui.spinner();
                } else {
                    ui.label(RichText::new("No Data").size(20.0));
                }
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::show_preview(ui, &dataset);
                ui.add_space(8.0);

                ui.heading(RichText::new("Data Analysis - CO2 Emission").size(28.0).strong());
                ui.label(INTRO_TEXT);
                ui.separator();

                let view = match view {
                    Some(Ok(view)) => view,
                    Some(Err(e)) => {
                        Self::show_error(ui, &format!("Failed to filter dataset: {e}"));
                        return;
                    }
                    None => return,
                };

                ui.label(
                    RichText::new(format!(
                        "Showing {} of {} rows",
                        view.row_count(),
                        view.total_rows()
                    ))
                    .size(11.0)
                    .color(Color32::GRAY),
                );
                if view.is_empty() {
                    ui.label(
                        RichText::new(
                            "No rows match the current filters; the charts below are empty.",
                        )
                        .size(11.0)
                        .color(Color32::from_rgb(243, 156, 18)),
                    );
                }
                ui.add_space(6.0);

                Self::show_sections(ui, session, view);
            });
    }

    fn show_sections(ui: &mut egui::Ui, session: &mut SessionState, view: &FilteredView) {
        // ===== Engine size distribution =====
        ui.label(RichText::new("Analysis of Engine Sizes").size(20.0).strong());
        let axes = session.axes;
        let charts = match DashboardCharts::build(view, axes.consumption_y, axes.emission_x) {
            Ok(charts) => charts,
            Err(e) => {
                Self::show_error(ui, &format!("Failed to prepare charts: {e}"));
                return;
            }
        };
        ui.columns(2, |cols| {
            cols[0].label(ENGINE_TEXT);
            let (distribution, order) = (&charts.distribution, &charts.make_order);
            ChartPlotter::draw_engine_boxplot(&mut cols[1], distribution, order);
        });
        ui.separator();

        // ===== Fuel consumption =====
        ui.label(RichText::new("Analysis of Fuel Consumption").size(20.0).strong());
        ui.columns(2, |cols| {
            cols[0].label(CONSUMPTION_TEXT);
            cols[0].add_space(8.0);
            let selected = &mut session.axes.consumption_y;
            let changed =
                Self::axis_selector(&mut cols[0], "fig2_yaxis", "Select Y-axis:", selected);
            let series = if changed {
                ScatterSeries::fuel_consumption(view, session.axes.consumption_y)
            } else {
                Ok(charts.consumption.clone())
            };
            match series {
                Ok(series) => {
                    let id = "fuel_consumption_scatter";
                    ChartPlotter::draw_scatter(&mut cols[1], id, &series, &charts.make_order)
                }
                Err(e) => Self::show_error(&mut cols[1], &e.to_string()),
            }
        });
        ui.separator();

        // ===== Carbon emissions =====
        ui.label(RichText::new("Analysis of Carbon Emissions").size(20.0).strong());
        ui.columns(2, |cols| {
            cols[0].label(EMISSION_TEXT);
            cols[0].add_space(8.0);
            let selected = &mut session.axes.emission_x;
            let changed =
                Self::axis_selector(&mut cols[0], "fig3_xaxis", "Select X-axis:", selected);
            let series = if changed {
                ScatterSeries::carbon_emission(view, session.axes.emission_x)
            } else {
                Ok(charts.emission.clone())
            };
            match series {
                Ok(series) => {
                    let id = "carbon_emission_scatter";
                    ChartPlotter::draw_scatter(&mut cols[1], id, &series, &charts.make_order)
                }
                Err(e) => Self::show_error(&mut cols[1], &e.to_string()),
            }
        });
    }

    /// Drop-down over the fuel-consumption columns. Returns true on change.
    fn axis_selector(ui: &mut egui::Ui, id: &str, label: &str, selected: &mut FuelColumn) -> bool {
        let mut changed = false;
        ui.label(label);
        ComboBox::from_id_salt(id)
            .width(280.0)
            .selected_text(selected.column_name())
            .show_ui(ui, |ui| {
                for option in FuelColumn::ALL {
                    changed |= ui
                        .selectable_value(selected, option, option.column_name())
                        .changed();
                }
            });
        changed
    }

    /// Transposed head of the full dataset.
    fn show_preview(ui: &mut egui::Ui, dataset: &Dataset) {
        egui::CollapsingHeader::new(format!("Dataset preview ({} rows)", dataset.row_count()))
            .id_salt("dataset_preview")
            .default_open(false)
            .show(ui, |ui| {
                ScrollArea::horizontal().id_salt("preview_scroll").show(ui, |ui| {
                    egui::Grid::new("preview_grid")
                        .striped(true)
                        .spacing([12.0, 4.0])
                        .show(ui, |ui| {
                            for (column, cells) in dataset.head_transposed(PREVIEW_ROWS) {
                                ui.label(RichText::new(column).strong().size(11.0));
                                for cell in cells {
                                    ui.label(RichText::new(cell).size(11.0));
                                }
                                ui.end_row();
                            }
                        });
                });
            });
    }

    fn show_error(ui: &mut egui::Ui, message: &str) {
        ui.label(RichText::new(message).color(Color32::from_rgb(220, 53, 69)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::test_support::sample_dataset;
    use std::sync::Arc;

    fn render(session: &mut SessionState) {
        let view = session.current_view();
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                ChartViewer::show(ui, session, view.as_ref());
            });
        });
    }

    #[test]
    fn renders_all_sections_for_default_filters() {
        let mut session = SessionState::new(DashboardConfig::default());
        session.set_dataset(Arc::new(sample_dataset()));
        render(&mut session);
        assert_eq!(session.axes.consumption_y, FuelColumn::City);
        assert_eq!(session.axes.emission_x, FuelColumn::City);
    }

    #[test]
    fn empty_selection_renders_empty_charts() {
        let mut session = SessionState::new(DashboardConfig::default());
        session.set_dataset(Arc::new(sample_dataset()));
        session.filters.as_mut().unwrap().clear_selection();

        let view = session.current_view().unwrap().unwrap();
        assert_eq!(view.row_count(), 0);
        render(&mut session);
    }

    #[test]
    fn load_error_renders_message_only() {
        let mut session = SessionState::new(DashboardConfig::default());
        session.set_load_error("Dataset not found: missing.csv".to_string());
        render(&mut session);
        assert!(session.current_view().is_none());
    }

    #[test]
    fn renders_placeholder_before_load() {
        let mut session = SessionState::new(DashboardConfig::default());
        session.loading = true;
        render(&mut session);
    }
}
