//! Mathematical utilities: least squares and R².

pub mod ols;

pub use ols::*;
