//! Ordinary least squares and goodness-of-fit.
//!
//! The trend model solves one small regression per request:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2,   x_i = [1, temperature, humidity, wind_speed]
//! ```
//!
//! We solve with SVD rather than the normal equations: with the inherited
//! feature set the temperature column predicts itself exactly, and on short
//! or flat histories the design matrix can be rank-deficient. SVD returns the
//! minimum-norm solution in both cases.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() != y.len() || x.nrows() == 0 {
        return None;
    }
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Coefficient of determination `1 - SS_res / SS_tot`.
///
/// A constant target has `SS_tot = 0`; the score is then `1.0` for a perfect
/// prediction and `0.0` otherwise. Returns `None` for empty or mismatched input.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> Option<f64> {
    if y_true.is_empty() || y_true.len() != y_pred.len() {
        return None;
    }
    let n = y_true.len() as f64;
    let mean = y_true.iter().sum::<f64>() / n;

    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Some(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Some(1.0 - ss_res / ss_tot)
}
