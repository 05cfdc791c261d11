/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! Ridge-stabilized OLS regression of implied-vol changes against price
//! action and realized vol, producing a z-scored signal for whether
//! implied vol is trading rich or cheap relative to its own recent model.

use crate::error::regression::RegressionError;
use serde::{Deserialize, Serialize};

const DESIGN_WIDTH: usize = 5;
const RIDGE_LAMBDA: f64 = 1e-8;

/// One (timestamp, return, realized vol, implied vol) sample feeding the fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolResponseObservation {
    pub timestamp: i64,
    pub spot_return: f64,
    pub abs_return: f64,
    pub realized_vol: f64,
    pub implied_vol: f64,
    /// Dependent variable: the implied-vol change this observation is explained by.
    pub vol_change: f64,
}

/// Builds one observation from two consecutive snapshots of spot and
/// implied vol, plus an externally computed realized-vol estimate.
pub fn build_vol_response_observation(
    timestamp: i64,
    prev_spot: f64,
    curr_spot: f64,
    prev_implied_vol: f64,
    curr_implied_vol: f64,
    realized_vol: f64,
) -> VolResponseObservation {
    let spot_return = if prev_spot > 1e-12 && curr_spot > 0.0 { (curr_spot / prev_spot).ln() } else { 0.0 };
    VolResponseObservation {
        timestamp,
        spot_return,
        abs_return: spot_return.abs(),
        realized_vol,
        implied_vol: curr_implied_vol,
        vol_change: curr_implied_vol - prev_implied_vol,
    }
}

fn design_row(obs: &VolResponseObservation) -> [f64; DESIGN_WIDTH] {
    [1.0, obs.spot_return, obs.abs_return, obs.realized_vol, obs.implied_vol]
}

/// Solves `a * x = b` via Gauss-Jordan elimination with partial pivoting.
/// `a` is consumed (used as scratch space).
fn gauss_jordan_solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, RegressionError> {
    let n = b.len();
    for col in 0..n {
        let mut pivot_row = col;
        let mut pivot_val = a[col][col].abs();
        for row in (col + 1)..n {
            if a[row][col].abs() > pivot_val {
                pivot_val = a[row][col].abs();
                pivot_row = row;
            }
        }
        if pivot_val < 1e-14 {
            return Err(RegressionError::SingularSystem { row: col, magnitude: pivot_val });
        }
        if pivot_row != col {
            a.swap(col, pivot_row);
            b.swap(col, pivot_row);
        }

        let pivot = a[col][col];
        for v in a[col].iter_mut() {
            *v /= pivot;
        }
        b[col] /= pivot;

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for k in 0..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    Ok(b)
}

/// Fits `coefficients` minimizing `sum((y - X*coef)^2) + lambda*||coef[1..]||^2`
/// via the ridge-regularized normal equations, solved with Gauss-Jordan
/// elimination. The intercept (column 0) is left unpenalized.
fn ridge_ols(rows: &[[f64; DESIGN_WIDTH]], targets: &[f64]) -> Result<[f64; DESIGN_WIDTH], RegressionError> {
    let mut xtx = vec![vec![0.0; DESIGN_WIDTH]; DESIGN_WIDTH];
    let mut xty = vec![0.0; DESIGN_WIDTH];

    for (row, &y) in rows.iter().zip(targets.iter()) {
        for i in 0..DESIGN_WIDTH {
            xty[i] += row[i] * y;
            for j in 0..DESIGN_WIDTH {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 1..DESIGN_WIDTH {
        xtx[i][i] += RIDGE_LAMBDA;
    }

    let solved = gauss_jordan_solve(xtx, xty)?;
    let mut coefficients = [0.0; DESIGN_WIDTH];
    coefficients.copy_from_slice(&solved);
    Ok(coefficients)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolSignal {
    VolBid,
    VolOffered,
    Neutral,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolResponseConfig {
    pub min_observations: usize,
    pub z_score_threshold: f64,
}

impl Default for VolResponseConfig {
    fn default() -> Self {
        Self {
            min_observations: 30,
            z_score_threshold: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolResponseResult {
    pub n_observations: usize,
    pub coefficients: [f64; DESIGN_WIDTH],
    pub r_squared: f64,
    pub residual_std_dev: f64,
    pub z_score: f64,
    pub signal: VolSignal,
    /// Observed implied-vol change of the most recent observation.
    pub observed_vol_change: f64,
    /// Timestamp of the most recent observation.
    pub last_timestamp: i64,
}

fn insufficient_data(observations: &[VolResponseObservation]) -> VolResponseResult {
    let last = observations.last();
    VolResponseResult {
        n_observations: observations.len(),
        coefficients: [0.0; DESIGN_WIDTH],
        r_squared: 0.0,
        residual_std_dev: 0.0,
        z_score: 0.0,
        signal: VolSignal::InsufficientData,
        observed_vol_change: last.map(|o| o.vol_change).unwrap_or(0.0),
        last_timestamp: last.map(|o| o.timestamp).unwrap_or(0),
    }
}

/// Fits the ridge OLS model on `observations` and scores the most recent
/// observation's residual against the fit's own residual spread.
pub fn compute_vol_response(observations: &[VolResponseObservation], config: &VolResponseConfig) -> VolResponseResult {
    let n = observations.len();
    if n < config.min_observations {
        return insufficient_data(observations);
    }

    let rows: Vec<[f64; DESIGN_WIDTH]> = observations.iter().map(design_row).collect();
    let targets: Vec<f64> = observations.iter().map(|o| o.vol_change).collect();

    let coefficients = match ridge_ols(&rows, &targets) {
        Ok(c) => c,
        Err(_) => return insufficient_data(observations),
    };

    let predictions: Vec<f64> = rows.iter().map(|r| r.iter().zip(coefficients.iter()).map(|(x, c)| x * c).sum()).collect();
    let residuals: Vec<f64> = targets.iter().zip(predictions.iter()).map(|(y, p)| y - p).collect();

    let mean_y = targets.iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = targets.iter().map(|y| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = residuals.iter().map(|r| r * r).sum();
    let r_squared = if ss_tot > 1e-12 { (1.0 - ss_res / ss_tot).max(0.0) } else { 0.0 };

    let dof = (n as f64 - DESIGN_WIDTH as f64).max(1.0);
    let residual_std_dev = (ss_res / dof).sqrt();

    let last_residual = *residuals.last().unwrap();
    let z_score = if residual_std_dev > 1e-12 { last_residual / residual_std_dev } else { 0.0 };

    let signal = if z_score > config.z_score_threshold {
        VolSignal::VolBid
    } else if z_score < -config.z_score_threshold {
        VolSignal::VolOffered
    } else {
        VolSignal::Neutral
    };

    VolResponseResult {
        n_observations: n,
        coefficients,
        r_squared,
        residual_std_dev,
        z_score,
        signal,
        observed_vol_change: observations.last().map(|o| o.vol_change).unwrap_or(0.0),
        last_timestamp: observations.last().map(|o| o.timestamp).unwrap_or(0),
    }
}
