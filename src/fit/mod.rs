//! Trend fitting: seeded split, OLS fit, held-out scoring, and point forecast.

pub mod predict;
pub mod split;
pub mod trend;

pub use predict::{Prediction, predict_latest};
pub use split::{Split, train_test_split};
pub use trend::{TrainOptions, TrainedModel, TrendModel, train};
