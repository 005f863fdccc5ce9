//! Data module - CSV loading, filter state and the filtered view

pub mod columns;
mod filter;
mod loader;
mod view;

pub use columns::FuelColumn;
pub use filter::{FilterState, SliderBounds};
pub use loader::{Dataset, DatasetCache, LoaderError};
pub use view::{FilteredView, ViewBuilder};
