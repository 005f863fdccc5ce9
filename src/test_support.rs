//! Shared fixtures for unit tests.

use std::io::Write;
use tempfile::NamedTempFile;

pub const HEADER: &str = "Make,Model,Vehicle Class,Engine Size(L),Cylinders,Transmission,Fuel Type,\
Fuel Consumption City (L/100 km),Fuel Consumption Hwy (L/100 km),\
Fuel Consumption Comb (L/100 km),Fuel Consumption Comb (mpg),CO2 Emissions(g/km)";

/// Ten rows over three vehicle classes.
/// Engine sizes: 3.5, 2.0, 1.5, 2.5, 2.0, 5.2, 1.5, 1.5, 2.5, 6.2
pub const SAMPLE_ROWS: &[&str] = &[
    "ACURA,NSX,TWO-SEATER,3.5,6,AM9,Z,11.1,10.8,11.0,26,258",
    "BMW,Z4 sDRIVE30i,TWO-SEATER,2.0,4,A8,Z,9.4,7.0,8.3,34,195",
    "HONDA,CIVIC,COMPACT,1.5,4,AV7,X,7.2,5.9,6.6,43,154",
    "PORSCHE,718 BOXSTER,TWO-SEATER,2.5,4,AM7,Z,11.3,8.4,10.0,28,233",
    "MAZDA,MX-5,TWO-SEATER,2.0,4,M6,Z,8.7,6.8,7.8,36,183",
    "AUDI,R8,TWO-SEATER,5.2,10,AM7,Z,16.0,10.8,13.7,21,320",
    "FORD,ESCAPE,SUV - SMALL,1.5,3,AS8,X,9.1,7.4,8.3,34,195",
    "HONDA,CIVIC SI,COMPACT,1.5,4,M6,Z,8.0,6.2,7.2,39,168",
    "TOYOTA,RAV4,SUV - SMALL,2.5,4,AS8,X,8.6,6.9,7.8,36,182",
    "CHEVROLET,CORVETTE,TWO-SEATER,6.2,8,AM8,Z,15.5,9.9,13.0,22,304",
];

/// Write `HEADER` plus `rows` to a temporary CSV file.
pub fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut text = format!("{HEADER}\n");
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    write_raw(&text)
}

pub fn write_raw(text: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create temp csv");
    file.write_all(text.as_bytes()).expect("write temp csv");
    file.flush().expect("flush temp csv");
    file
}

/// Load the ten-row sample into a dataset.
pub fn sample_dataset() -> crate::data::Dataset {
    let file = write_csv(SAMPLE_ROWS);
    crate::data::Dataset::read(file.path()).expect("sample dataset")
}
