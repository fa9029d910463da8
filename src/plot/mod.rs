//! Chart rendering.

pub mod chart;

pub use chart::render_history_chart;
