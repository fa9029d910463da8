//! `weather-trend` library crate.
//!
//! The binary is a thin wrapper around this library so that:
//!
//! - the pipeline is testable without spawning processes or a server
//! - the web handlers and the terminal front-end share one implementation
//! - each stage (fetch, normalize, fit, chart, report) stays easy to navigate

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod plot;
pub mod report;
pub mod web;
