//! Linear trend model: temperature regressed on the hourly features.
//!
//! Features are `[temperature, humidity, wind_speed]` of an hour; the target
//! is the temperature `target_lag_hours` later. With the default lag of 0 the
//! target is one of its own features, so the fit is (near) exact.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::domain::WeatherTable;
use crate::error::AppError;
use crate::fit::split::train_test_split;
use crate::math::{r2_score, solve_least_squares};

/// Fewer usable rows than this cannot be split and fitted meaningfully.
pub const MIN_USABLE_ROWS: usize = 10;

/// Options that affect how the model is trained.
#[derive(Debug, Clone, Copy)]
pub struct TrainOptions {
    pub target_lag_hours: usize,
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            target_lag_hours: 0,
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

/// One regression observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub features: [f64; 3],
    pub target: f64,
}

/// Fitted linear map `intercept + Σ coefficients[j] * x[j]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendModel {
    pub intercept: f64,
    pub coefficients: [f64; 3],
}

impl TrendModel {
    pub fn predict(&self, features: &[f64; 3]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }

    fn fit(samples: &[Sample]) -> Result<Self, AppError> {
        let n = samples.len();
        let mut x = DMatrix::<f64>::zeros(n, 4);
        let mut y = DVector::<f64>::zeros(n);
        for (i, s) in samples.iter().enumerate() {
            x[(i, 0)] = 1.0;
            for (j, v) in s.features.iter().enumerate() {
                x[(i, j + 1)] = *v;
            }
            y[i] = s.target;
        }

        let beta = solve_least_squares(&x, &y)
            .ok_or_else(|| AppError::FitFailed("least squares system is ill-conditioned".to_string()))?;

        Ok(Self {
            intercept: beta[0],
            coefficients: [beta[1], beta[2], beta[3]],
        })
    }
}

/// A fitted model plus its held-out score.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    pub model: TrendModel,
    /// R² on the held-out split.
    pub accuracy: f64,
    pub n_train: usize,
    pub n_test: usize,
}

/// Pair each complete row with the temperature `lag` rows later.
///
/// Rows with any missing feature (only possible at the head of a
/// forward-filled table) or without a target are skipped.
pub fn build_samples(table: &WeatherTable, lag: usize) -> Vec<Sample> {
    table
        .rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let features = row.features()?;
            let target = table.rows.get(i + lag)?.temperature?;
            Some(Sample { features, target })
        })
        .collect()
}

/// Split, fit on the training side, score on the held-out side.
pub fn train(table: &WeatherTable, options: &TrainOptions) -> Result<TrainedModel, AppError> {
    let samples = build_samples(table, options.target_lag_hours);
    if samples.len() < MIN_USABLE_ROWS {
        return Err(AppError::FitFailed(format!(
            "need at least {MIN_USABLE_ROWS} complete hourly rows, got {}",
            samples.len()
        )));
    }

    let split = train_test_split(samples.len(), options.test_fraction, options.seed);
    if split.train.len() < 4 || split.test.is_empty() {
        return Err(AppError::FitFailed(format!(
            "split left {} training and {} test rows",
            split.train.len(),
            split.test.len()
        )));
    }

    let train_set: Vec<Sample> = split.train.iter().map(|&i| samples[i]).collect();
    let model = TrendModel::fit(&train_set)?;

    let y_true: Vec<f64> = split.test.iter().map(|&i| samples[i].target).collect();
    let y_pred: Vec<f64> = split
        .test
        .iter()
        .map(|&i| model.predict(&samples[i].features))
        .collect();

    if y_pred.iter().any(|v| !v.is_finite()) {
        return Err(AppError::FitFailed("non-finite prediction on held-out rows".to_string()));
    }
    let accuracy = r2_score(&y_true, &y_pred)
        .ok_or_else(|| AppError::FitFailed("empty held-out split".to_string()))?;

    debug!(
        n_train = split.train.len(),
        n_test = split.test.len(),
        accuracy,
        "trend model fitted"
    );

    Ok(TrainedModel {
        model,
        accuracy,
        n_train: split.train.len(),
        n_test: split.test.len(),
    })
}
