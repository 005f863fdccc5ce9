//! Charts module - Chart data preparation and rendering

mod plotter;
mod renderer;
mod series;

pub use plotter::ChartPlotter;
pub use renderer::{ExportCharts, StaticChartRenderer};
pub use series::{DashboardCharts, ScatterSeries};
