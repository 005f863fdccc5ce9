//! CO2 Dashboard Main Application
//! Main window with the filter sidebar and the chart page.

use crate::charts::{DashboardCharts, ExportCharts, StaticChartRenderer};
use crate::config::DashboardConfig;
use crate::data::{Dataset, DatasetCache, LoaderError};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::state::SessionState;
use egui::SidePanel;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// CSV loading result from background thread
enum LoadResult {
    Complete(Dataset),
    Error(LoaderError),
}

/// Main application window; owns one dashboard session.
pub struct DashboardApp {
    cache: DatasetCache,
    session: SessionState,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        Self::with_config(config)
    }

    fn with_config(config: DashboardConfig) -> Self {
        let data_path = config.data_path.clone();
        let mut app = Self {
            cache: DatasetCache::new(),
            session: SessionState::new(config),
            load_rx: None,
        };
        app.start_load(&data_path);
        app
    }

    /// Load a dataset, from the cache when possible, otherwise on a
    /// background thread. A newer request drops any in-flight one.
    fn start_load(&mut self, path: &Path) {
        if let Some(dataset) = self.cache.get(path) {
            log::debug!("Dataset cache hit for {}", path.display());
            self.load_rx = None;
            self.session.set_dataset(dataset);
            return;
        }

        log::info!("Loading dataset {}", path.display());
        self.session.loading = true;
        self.session.status_message = Some(format!("Loading {}...", path.display()));

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        let path = path.to_path_buf();
        thread::spawn(move || {
            let result = match Dataset::read(&path) {
                Ok(dataset) => LoadResult::Complete(dataset),
                Err(e) => LoadResult::Error(e),
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
            Ok(LoadResult::Complete(dataset)) => {
                log::info!(
                    "Loaded {} rows from {}",
                    dataset.row_count(),
                    dataset.path().display()
                );
                let dataset = self.cache.insert(dataset);
                log::debug!("{} dataset(s) cached", self.cache.len());
                self.session.set_dataset(dataset);
            }
            Ok(LoadResult::Error(error)) => {
                log::error!("Failed to load dataset: {error}");
                self.session.set_load_error(error.to_string());
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.session
                    .set_load_error("Loader thread exited without a result".to_string());
            }
        }
    }

    /// Handle CSV file selection
    fn handle_open_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_title("Open emissions dataset")
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_load(&path);
        }
    }

    /// Handle chart export - render the current charts to PNG files
    fn handle_export_charts(&mut self) {
        let Some(dir) = rfd::FileDialog::new()
            .set_title("Export charts to folder")
            .pick_folder()
        else {
            return; // User cancelled
        };

        match self.export_charts(&dir) {
            Ok(written) => {
                self.session.status_message =
                    Some(format!("Exported {} charts to {}", written.len(), dir.display()));
                if self.session.config.open_after_export {
                    if let Err(e) = open::that(&dir) {
                        log::warn!("Could not open {}: {e}", dir.display());
                    }
                }
            }
            Err(e) => {
                log::error!("Chart export failed: {e:#}");
                self.session.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn export_charts(&self, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let view = self
            .session
            .current_view()
            .ok_or_else(|| anyhow::anyhow!("No dataset loaded"))??;
        let axes = self.session.axes;
        let charts = DashboardCharts::build(&view, axes.consumption_y, axes.emission_x)?;
        log::info!(
            "Exporting charts with {} box points and {} + {} scatter points",
            charts.distribution.point_count(),
            charts.consumption.point_count(),
            charts.emission.point_count()
        );

        let written = StaticChartRenderer::export_all(
            dir,
            &ExportCharts {
                distribution: &charts.distribution,
                consumption: &charts.consumption,
                emission: &charts.emission,
                make_order: &charts.make_order,
            },
        )?;
        Ok(written)
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Request repaint while loading
        if self.session.loading {
            ctx.request_repaint();
        }

        // The view is rebuilt from the cached dataset every frame
        let view = self.session.current_view();

        let mut action = ControlPanelAction::None;
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let current = view.as_ref().and_then(|v| v.as_ref().ok());
                    action = ControlPanel::show(ui, &mut self.session, current);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ChartViewer::show(ui, &mut self.session, view.as_ref());
        });

        match action {
            ControlPanelAction::OpenCsv => self.handle_open_csv(),
            ControlPanelAction::ExportCharts => self.handle_export_charts(),
            ControlPanelAction::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{write_csv, SAMPLE_ROWS};
    use std::time::{Duration, Instant};

    fn wait_for_load(app: &mut DashboardApp) {
        let deadline = Instant::now() + Duration::from_secs(30);
        while app.session.loading && Instant::now() < deadline {
            app.check_load_results();
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn loads_configured_dataset_in_background() {
        let file = write_csv(SAMPLE_ROWS);
        let config = DashboardConfig {
            data_path: file.path().to_path_buf(),
            ..DashboardConfig::default()
        };

        let mut app = DashboardApp::with_config(config);
        wait_for_load(&mut app);

        assert!(!app.session.loading);
        assert_eq!(app.session.dataset.as_ref().unwrap().row_count(), 10);
        assert_eq!(app.cache.len(), 1);
    }

    #[test]
    fn second_load_of_same_path_hits_cache() {
        let file = write_csv(SAMPLE_ROWS);
        let config = DashboardConfig {
            data_path: file.path().to_path_buf(),
            ..DashboardConfig::default()
        };

        let mut app = DashboardApp::with_config(config);
        wait_for_load(&mut app);
        let first = app.session.dataset.clone().unwrap();

        app.start_load(file.path());
        assert!(!app.session.loading);
        assert!(std::sync::Arc::ptr_eq(&first, app.session.dataset.as_ref().unwrap()));
    }

    #[test]
    fn missing_dataset_surfaces_an_error() {
        let config = DashboardConfig {
            data_path: PathBuf::from("/no/such/CO2_Emissions.csv"),
            ..DashboardConfig::default()
        };

        let mut app = DashboardApp::with_config(config);
        wait_for_load(&mut app);

        assert!(app.session.dataset.is_none());
        assert!(app.session.load_error.as_deref().unwrap().contains("not found"));
        assert_eq!(app.cache.len(), 0);
    }
}
