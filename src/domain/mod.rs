//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - locations and date windows (`Coordinate`, `Location`, `DateWindow`)
//! - the normalized hourly table (`HourlyRow`, `WeatherTable`)
//! - run configuration (`PipelineConfig`) and shared constants

pub mod types;

pub use types::*;
