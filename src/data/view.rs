//! View Builder Module
//! Derives the filtered table from the dataset and the session filters.

use super::columns::{float_values, string_values, ENGINE_SIZE, VEHICLE_CLASS};
use super::filter::FilterState;
use super::loader::Dataset;
use crate::config::BoundMode;
use polars::prelude::*;

/// Rows of the dataset that pass the current filters.
#[derive(Debug, Clone)]
pub struct FilteredView {
    df: DataFrame,
    total_rows: usize,
    excluded_at_bounds: usize,
}

impl FilteredView {
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Row count of the dataset the view was built from.
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Rows of a selected class dropped only because their engine size
    /// equals one of the range bounds.
    pub fn excluded_at_bounds(&self) -> usize {
        self.excluded_at_bounds
    }
}

/// Handles row filtering for the chart panels.
pub struct ViewBuilder;

impl ViewBuilder {
    /// Keep rows whose class is selected and whose engine size lies in the
    /// range. Null class or engine size never matches. The dataset is untouched.
    pub fn build(
        dataset: &Dataset,
        filters: &FilterState,
        bound_mode: BoundMode,
    ) -> PolarsResult<FilteredView> {
        let df = dataset.dataframe();
        let classes = string_values(df, VEHICLE_CLASS)?;
        let sizes = float_values(df, ENGINE_SIZE)?;
        let (lo, hi) = filters.engine_range;

        let mut excluded_at_bounds = 0;
        let keep: Vec<bool> = classes
            .iter()
            .zip(sizes.iter())
            .map(|(class, size)| match (class, size) {
                (Some(class), Some(size)) if filters.is_selected(class) => {
                    let inside = bound_mode.contains(lo, hi, *size);
                    if !inside && (*size == lo || *size == hi) {
                        excluded_at_bounds += 1;
                    }
                    inside
                }
                _ => false,
            })
            .collect();

        let mask = BooleanChunked::from_slice("mask".into(), &keep);
        let filtered = df.filter(&mask)?;

        Ok(FilteredView {
            df: filtered,
            total_rows: df.height(),
            excluded_at_bounds,
        })
    }
}
