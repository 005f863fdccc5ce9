//! CSV Dataset Loader Module
//! Reads the emissions CSV with Polars and memoizes parsed datasets by path.

use super::columns::{
    distinct_in_order, float_values, is_numeric, string_values, CATEGORY_COLUMNS, ENGINE_SIZE,
    NUMERIC_COLUMNS, VEHICLE_CLASS,
};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Rows scanned for schema inference.
const INFER_SCHEMA_ROWS: usize = 10_000;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Dataset not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Required column '{0}' is missing")]
    MissingColumn(&'static str),
    #[error("Column '{column}' must be numeric, found {dtype}")]
    NonNumeric { column: &'static str, dtype: String },
}

/// Immutable, parsed emissions table.
#[derive(Debug, Clone)]
pub struct Dataset {
    path: PathBuf,
    df: DataFrame,
    vehicle_classes: Vec<String>,
    engine_sizes: Vec<f64>,
}

impl Dataset {
    /// Read and validate a CSV file.
    pub fn read(path: &Path) -> Result<Self, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .finish()?
            .collect()?;

        Self::from_dataframe(path, df)
    }

    /// Validate required columns and normalize their dtypes.
    pub fn from_dataframe(path: &Path, mut df: DataFrame) -> Result<Self, LoaderError> {
        for name in CATEGORY_COLUMNS {
            let column = df.column(name).map_err(|_| LoaderError::MissingColumn(name))?;
            let column = column.cast(&DataType::String)?;
            df.with_column(column)?;
        }

        for name in NUMERIC_COLUMNS {
            let column = df.column(name).map_err(|_| LoaderError::MissingColumn(name))?;
            // A header-only file infers every column as text
            if df.height() > 0 && !is_numeric(column.dtype()) {
                return Err(LoaderError::NonNumeric {
                    column: name,
                    dtype: column.dtype().to_string(),
                });
            }
            let column = column.cast(&DataType::Float64)?;
            df.with_column(column)?;
        }

        let vehicle_classes = distinct_in_order(&string_values(&df, VEHICLE_CLASS)?);
        let engine_sizes = float_values(&df, ENGINE_SIZE)?
            .into_iter()
            .flatten()
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            df,
            vehicle_classes,
            engine_sizes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    /// Distinct vehicle classes of the full table, first-appearance order.
    pub fn vehicle_classes(&self) -> &[String] {
        &self.vehicle_classes
    }

    /// Non-null engine sizes of the full table.
    pub fn engine_sizes(&self) -> &[f64] {
        &self.engine_sizes
    }

    /// First `n` rows transposed: one entry per column with its cell texts.
    pub fn head_transposed(&self, n: usize) -> Vec<(String, Vec<String>)> {
        let head = self.df.head(Some(n));
        head.get_columns()
            .iter()
            .map(|col| {
                let cells = (0..head.height())
                    .map(|i| {
                        col.get(i)
                            .map(|val| {
                                if val.is_null() {
                                    String::new()
                                } else {
                                    val.to_string().trim_matches('"').to_string()
                                }
                            })
                            .unwrap_or_default()
                    })
                    .collect();
                (col.name().to_string(), cells)
            })
            .collect()
    }
}

/// Parsed datasets keyed by canonical path. Failed loads are not cached.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key for a path; falls back to the path as given when it cannot
    /// be canonicalized (e.g. it does not exist yet).
    pub fn key(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    }

    pub fn get(&self, path: &Path) -> Option<Arc<Dataset>> {
        self.entries.get(&Self::key(path)).cloned()
    }

    /// Store a dataset parsed elsewhere (e.g. on a loader thread).
    pub fn insert(&mut self, dataset: Dataset) -> Arc<Dataset> {
        let key = Self::key(dataset.path());
        let dataset = Arc::new(dataset);
        self.entries.insert(key, Arc::clone(&dataset));
        dataset
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
