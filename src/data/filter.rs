//! Filter state for the sidebar controls and its data-derived defaults.

use super::loader::Dataset;
use crate::config::DashboardConfig;
use crate::stats::StatsCalculator;
use std::collections::BTreeSet;

/// Slider limits for the engine-size range, derived from the full dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderBounds {
    /// Bounds are the dataset's true min and max, so `min <= max` always holds.
    /// A dataset without engine sizes collapses to `[0, 0]`.
    pub fn from_dataset(dataset: &Dataset, step: f64) -> Self {
        let (min, max) = StatsCalculator::value_range(dataset.engine_sizes()).unwrap_or((0.0, 0.0));
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn snap(&self, value: f64) -> f64 {
        StatsCalculator::snap_to_step(value, self.min, self.max, self.step)
    }
}

/// Selected vehicle classes and engine-size range for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub selected_classes: BTreeSet<String>,
    /// `(lower, upper)`; `lower <= upper` is kept by the setters.
    pub engine_range: (f64, f64),
}

impl FilterState {
    pub fn new(
        selected_classes: impl IntoIterator<Item = String>,
        engine_range: (f64, f64),
    ) -> Self {
        Self {
            selected_classes: selected_classes.into_iter().collect(),
            engine_range,
        }
    }

    /// Initial selection: the configured class and the configured quantile
    /// range of engine size over the full dataset, snapped to the slider grid.
    pub fn defaults(dataset: &Dataset, config: &DashboardConfig) -> Self {
        let classes = dataset.vehicle_classes();
        let default_class = if classes.iter().any(|c| c == &config.default_vehicle_class) {
            Some(config.default_vehicle_class.clone())
        } else {
            let fallback = classes.first().cloned();
            log::warn!(
                "Default vehicle class '{}' not in dataset, selecting {:?}",
                config.default_vehicle_class,
                fallback
            );
            fallback
        };

        let bounds = SliderBounds::from_dataset(dataset, config.engine_step);
        let (lower, upper) = default_quantile_range(dataset, config);
        let engine_range = if lower.is_nan() || upper.is_nan() {
            (bounds.min, bounds.max)
        } else {
            (bounds.snap(lower), bounds.snap(upper))
        };

        Self::new(default_class, engine_range)
    }

    pub fn is_selected(&self, class: &str) -> bool {
        self.selected_classes.contains(class)
    }

    pub fn set_selected(&mut self, class: &str, selected: bool) {
        if selected {
            self.selected_classes.insert(class.to_string());
        } else {
            self.selected_classes.remove(class);
        }
    }

    pub fn select_all<'a>(&mut self, classes: impl IntoIterator<Item = &'a String>) {
        self.selected_classes.extend(classes.into_iter().cloned());
    }

    pub fn clear_selection(&mut self) {
        self.selected_classes.clear();
    }

    /// Move the lower handle; it never passes the upper one.
    pub fn set_lower(&mut self, value: f64, bounds: &SliderBounds) {
        self.engine_range.0 = bounds.clamp(value).min(self.engine_range.1);
    }

    /// Move the upper handle; it never passes the lower one.
    pub fn set_upper(&mut self, value: f64, bounds: &SliderBounds) {
        self.engine_range.1 = bounds.clamp(value).max(self.engine_range.0);
    }
}

/// Unsnapped quantile range of engine size over the full dataset.
pub fn default_quantile_range(dataset: &Dataset, config: &DashboardConfig) -> (f64, f64) {
    let sizes = dataset.engine_sizes();
    (
        StatsCalculator::quantile(sizes, config.lower_quantile),
        StatsCalculator::quantile(sizes, config.upper_quantile),
    )
}
