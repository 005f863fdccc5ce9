//! Chart Series Module
//! Turns a filtered view into the plain numbers each chart panel draws.

use crate::data::columns::{float_values, string_values, CO2_EMISSIONS, ENGINE_SIZE, MAKE};
use crate::data::{FilteredView, FuelColumn};
use crate::stats::{BoxSummary, StatsCalculator};
use polars::prelude::*;

/// Engine sizes of one make plus its box summary.
#[derive(Debug, Clone)]
pub struct MakeBox {
    pub make: String,
    pub values: Vec<f64>,
    pub summary: BoxSummary,
}

/// Box plot data: one box per make, makes ordered by descending engine size.
#[derive(Debug, Clone, Default)]
pub struct EngineDistribution {
    pub boxes: Vec<MakeBox>,
}

impl EngineDistribution {
    /// Rows are sorted by engine size (descending, stable) and makes are
    /// placed in order of their first appearance in that sorted order.
    pub fn from_view(view: &FilteredView) -> PolarsResult<Self> {
        let df = view.dataframe();
        let makes = string_values(df, MAKE)?;
        let sizes = float_values(df, ENGINE_SIZE)?;

        let mut rows: Vec<(String, f64)> = makes
            .into_iter()
            .zip(sizes)
            .filter_map(|(make, size)| Some((make?, size.filter(|s| !s.is_nan())?)))
            .collect();
        rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut grouped: Vec<(String, Vec<f64>)> = Vec::new();
        for (make, size) in rows {
            match grouped.iter_mut().find(|(m, _)| *m == make) {
                Some((_, values)) => values.push(size),
                None => grouped.push((make, vec![size])),
            }
        }

        let boxes = grouped
            .into_iter()
            .filter_map(|(make, values)| {
                let summary = StatsCalculator::box_summary(&values)?;
                Some(MakeBox {
                    make,
                    values,
                    summary,
                })
            })
            .collect();

        Ok(Self { boxes })
    }

    pub fn makes(&self) -> Vec<String> {
        self.boxes.iter().map(|b| b.make.clone()).collect()
    }

    pub fn point_count(&self) -> usize {
        self.boxes.iter().map(|b| b.values.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Min and max over all values.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let all: Vec<f64> = self.boxes.iter().flat_map(|b| b.values.iter().copied()).collect();
        StatsCalculator::value_range(&all)
    }
}

/// Points of one make in a scatter panel.
#[derive(Debug, Clone)]
pub struct ScatterGroup {
    pub make: String,
    pub points: Vec<[f64; 2]>,
}

/// Scatter plot data colored by make.
#[derive(Debug, Clone)]
pub struct ScatterSeries {
    pub x_column: String,
    pub y_column: String,
    pub groups: Vec<ScatterGroup>,
}

impl ScatterSeries {
    /// Fuel-consumption panel: engine size against the chosen fuel column.
    pub fn fuel_consumption(view: &FilteredView, y: FuelColumn) -> PolarsResult<Self> {
        Self::from_view(view, ENGINE_SIZE, y.column_name())
    }

    /// Carbon-emission panel: the chosen fuel column against CO2 emissions.
    pub fn carbon_emission(view: &FilteredView, x: FuelColumn) -> PolarsResult<Self> {
        Self::from_view(view, x.column_name(), CO2_EMISSIONS)
    }

    /// Group `(x, y)` pairs by make in order of first appearance.
    /// Rows with a missing make or coordinate are skipped.
    pub fn from_view(view: &FilteredView, x_column: &str, y_column: &str) -> PolarsResult<Self> {
        let df = view.dataframe();
        let makes = string_values(df, MAKE)?;
        let xs = float_values(df, x_column)?;
        let ys = float_values(df, y_column)?;

        let mut groups: Vec<ScatterGroup> = Vec::new();
        for ((make, x), y) in makes.into_iter().zip(xs).zip(ys) {
            let (Some(make), Some(x), Some(y)) = (make, x, y) else {
                continue;
            };
            if x.is_nan() || y.is_nan() {
                continue;
            }
            match groups.iter_mut().find(|g| g.make == make) {
                Some(group) => group.points.push([x, y]),
                None => groups.push(ScatterGroup {
                    make,
                    points: vec![[x, y]],
                }),
            }
        }

        Ok(Self {
            x_column: x_column.to_string(),
            y_column: y_column.to_string(),
            groups,
        })
    }

    pub fn point_count(&self) -> usize {
        self.groups.iter().map(|g| g.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Makes of a view in first-appearance order; indexes the shared color palette
/// so a make keeps its color in every panel.
pub fn make_order(view: &FilteredView) -> PolarsResult<Vec<String>> {
    let makes = string_values(view.dataframe(), MAKE)?;
    Ok(crate::data::columns::distinct_in_order(&makes))
}

/// Data for all three panels of one frame.
#[derive(Debug, Clone)]
pub struct DashboardCharts {
    pub make_order: Vec<String>,
    pub distribution: EngineDistribution,
    pub consumption: ScatterSeries,
    pub emission: ScatterSeries,
}

impl DashboardCharts {
    pub fn build(
        view: &FilteredView,
        consumption_y: FuelColumn,
        emission_x: FuelColumn,
    ) -> PolarsResult<Self> {
        Ok(Self {
            make_order: make_order(view)?,
            distribution: EngineDistribution::from_view(view)?,
            consumption: ScatterSeries::fuel_consumption(view, consumption_y)?,
            emission: ScatterSeries::carbon_emission(view, emission_x)?,
        })
    }
}
