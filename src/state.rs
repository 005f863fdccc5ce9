use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::data::{Dataset, FilterState, FilteredView, FuelColumn, SliderBounds, ViewBuilder};

// ---------------------------------------------------------------------------
// Chart axis selections
// ---------------------------------------------------------------------------

/// Axis selectors of the two interactive scatter panels. Each field is its own
/// control, so changing one never touches the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChartAxes {
    /// Y axis of the fuel-consumption panel.
    pub consumption_y: FuelColumn,
    /// X axis of the carbon-emission panel.
    pub emission_x: FuelColumn,
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything one dashboard session knows, independent of rendering.
pub struct SessionState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Arc<Dataset>>,

    /// Sidebar filter selections; reset whenever a new dataset arrives.
    pub filters: Option<FilterState>,

    /// Slider limits derived from the current dataset.
    pub slider_bounds: Option<SliderBounds>,

    pub axes: ChartAxes,

    /// Fatal load error; while set, no charts are rendered.
    pub load_error: Option<String>,

    /// Status line shown in the sidebar.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl SessionState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            filters: None,
            slider_bounds: None,
            axes: ChartAxes::default(),
            load_error: None,
            status_message: None,
            loading: false,
        }
    }

    /// Ingest a newly loaded dataset and initialise the filters from it.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        let same_dataset = self
            .dataset
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &dataset));

        // Re-selecting the same cached dataset keeps the user's filters
        if !same_dataset || self.filters.is_none() {
            self.filters = Some(FilterState::defaults(&dataset, &self.config));
            self.slider_bounds =
                Some(SliderBounds::from_dataset(&dataset, self.config.engine_step));
        }

        self.status_message = Some(format!(
            "Loaded {} rows from {}",
            dataset.row_count(),
            dataset.path().display()
        ));
        self.dataset = Some(dataset);
        self.load_error = None;
        self.loading = false;
    }

    /// Record a failed load. Rendering halts until a load succeeds.
    pub fn set_load_error(&mut self, error: String) {
        self.dataset = None;
        self.filters = None;
        self.slider_bounds = None;
        self.status_message = Some(format!("Error: {error}"));
        self.load_error = Some(error);
        self.loading = false;
    }

    /// Filtered rows for the current filters, rebuilt on every call.
    pub fn current_view(&self) -> Option<polars::prelude::PolarsResult<FilteredView>> {
        let dataset = self.dataset.as_ref()?;
        let filters = self.filters.as_ref()?;
        Some(ViewBuilder::build(dataset, filters, self.config.bound_mode))
    }
}
