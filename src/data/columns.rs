//! Column names of the CO2 emissions dataset and typed column access.

use polars::prelude::*;
use std::fmt;

pub const VEHICLE_CLASS: &str = "Vehicle Class";
pub const ENGINE_SIZE: &str = "Engine Size(L)";
pub const MAKE: &str = "Make";
pub const FUEL_CITY: &str = "Fuel Consumption City (L/100 km)";
pub const FUEL_HWY: &str = "Fuel Consumption Hwy (L/100 km)";
pub const FUEL_COMB: &str = "Fuel Consumption Comb (L/100 km)";
pub const CO2_EMISSIONS: &str = "CO2 Emissions(g/km)";

/// Columns read as categories.
pub const CATEGORY_COLUMNS: [&str; 2] = [VEHICLE_CLASS, MAKE];

/// Columns that must hold numbers.
pub const NUMERIC_COLUMNS: [&str; 5] = [ENGINE_SIZE, FUEL_CITY, FUEL_HWY, FUEL_COMB, CO2_EMISSIONS];

/// Fuel-consumption column offered by the chart axis selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FuelColumn {
    #[default]
    City,
    Hwy,
    Comb,
}

impl FuelColumn {
    pub const ALL: [FuelColumn; 3] = [FuelColumn::City, FuelColumn::Hwy, FuelColumn::Comb];

    pub fn column_name(self) -> &'static str {
        match self {
            FuelColumn::City => FUEL_CITY,
            FuelColumn::Hwy => FUEL_HWY,
            FuelColumn::Comb => FUEL_COMB,
        }
    }
}

impl fmt::Display for FuelColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Check whether a dtype is one of the numeric types.
pub fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Read a column as `f64` values, nulls preserved.
pub fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    let values = column.f64()?.into_iter().collect();
    Ok(values)
}

/// Read a column as owned strings, nulls preserved.
pub fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

/// Distinct non-null values in order of first appearance.
pub fn distinct_in_order(values: &[Option<String>]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .iter()
        .flatten()
        .filter(|v| seen.insert(v.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuel_columns_map_to_dataset_headers() {
        assert_eq!(FuelColumn::City.column_name(), "Fuel Consumption City (L/100 km)");
        assert_eq!(FuelColumn::Hwy.column_name(), "Fuel Consumption Hwy (L/100 km)");
        assert_eq!(FuelColumn::Comb.column_name(), "Fuel Consumption Comb (L/100 km)");
        assert_eq!(FuelColumn::default(), FuelColumn::City);
    }

    #[test]
    fn distinct_keeps_first_appearance_order() {
        let values = vec![
            Some("SUV".to_string()),
            None,
            Some("COMPACT".to_string()),
            Some("SUV".to_string()),
            Some("MINIVAN".to_string()),
        ];
        assert_eq!(distinct_in_order(&values), vec!["SUV", "COMPACT", "MINIVAN"]);
    }

    #[test]
    fn typed_access_casts_integers() {
        let df = DataFrame::new(vec![
            Column::new("n".into(), [1i64, 2, 3]),
            Column::new("s".into(), ["a", "b", "c"]),
        ])
        .unwrap();
        assert_eq!(float_values(&df, "n").unwrap(), vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(
            string_values(&df, "s").unwrap(),
            vec![Some("a".to_string()), Some("b".to_string()), Some("c".to_string())]
        );
        assert!(float_values(&df, "missing").is_err());
    }
}
