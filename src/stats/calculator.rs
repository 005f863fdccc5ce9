//! Statistics Calculator Module
//! Quantiles, value ranges and box-plot summaries used by the filters and charts.

use statrs::statistics::Statistics;

/// Whisker reach as a multiple of the interquartile range.
pub const WHISKER_IQR: f64 = 1.5;

/// Five-number summary plus outliers for one box in a box plot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub whisker_low: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Calculate percentile using linear interpolation (NumPy compatible).
    /// `sorted_values` must be sorted ascending and free of NaN.
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Quantile `q` in `[0, 1]` of unsorted values; NaN values are skipped.
    pub fn quantile(values: &[f64], q: f64) -> f64 {
        Self::percentile(&Self::sorted(values), q * 100.0)
    }

    /// Smallest and largest finite values, or `None` when there are none.
    pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        Some((Statistics::min(finite.iter()), Statistics::max(finite.iter())))
    }

    /// Box-plot summary with Tukey whiskers. `None` for empty input.
    pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
        let sorted = Self::sorted(values);
        if sorted.is_empty() {
            return None;
        }

        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        // Whiskers stop at the most extreme data point inside the fences
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Some(BoxSummary {
            whisker_low,
            q1,
            median,
            q3,
            whisker_high,
            outliers,
        })
    }

    /// Snap `value` onto the grid `min + k * step`, clamped to `[min, max]`.
    pub fn snap_to_step(value: f64, min: f64, max: f64, step: f64) -> f64 {
        if !(step > 0.0) || max <= min {
            return value.clamp(min, max.max(min));
        }
        let steps = ((value - min) / step).round();
        // Round away float noise such as 2.0999999999999996
        let snapped = ((min + steps * step) * 1e9).round() / 1e9;
        snapped.clamp(min, max)
    }

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }
}
