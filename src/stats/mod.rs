//! Stats module - Quantiles and box-plot summaries

mod calculator;

pub use calculator::{BoxSummary, StatsCalculator};
