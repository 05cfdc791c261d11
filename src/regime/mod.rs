/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! Regime parameters derived from an IV surface's local skew and
//! curvature at spot.

use crate::surfaces::IvSurface;
use serde::{Deserialize, Serialize};

/// Four-level volatility-regime label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Calm,
    Normal,
    Stressed,
    Crisis,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeParams {
    /// Decimal at-the-money IV (0.18 = 18%).
    pub atm_iv: f64,
    /// Clamped to [-0.95, 0.5].
    pub implied_spot_vol_corr: f64,
    pub implied_vol_of_vol: f64,
    pub regime: Regime,
    pub expected_daily_spot_move: f64,
    pub expected_daily_vol_move: f64,
}

/// Finds the bracketing index pair `(lo, hi)` such that
/// `strikes[lo] <= x <= strikes[hi]`, clamping to the array ends.
fn bracket(strikes: &[f64], x: f64) -> (usize, usize) {
    let n = strikes.len();
    if n < 2 {
        return (0, 0);
    }
    if x <= strikes[0] {
        return (0, 1);
    }
    if x >= strikes[n - 1] {
        return (n - 2, n - 1);
    }
    for i in 0..n - 1 {
        if strikes[i] <= x && x <= strikes[i + 1] {
            return (i, i + 1);
        }
    }
    (n - 2, n - 1)
}

fn linear_interp(strikes: &[f64], values: &[f64], x: f64) -> f64 {
    if strikes.is_empty() {
        return 0.0;
    }
    if strikes.len() == 1 {
        return values[0];
    }
    let (lo, hi) = bracket(strikes, x);
    let (x0, x1) = (strikes[lo], strikes[hi]);
    let (y0, y1) = (values[lo], values[hi]);
    if (x1 - x0).abs() < 1e-12 {
        return y0;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// Nearest interior index to `x` (never the first or last point, so a
/// central second difference is always available).
fn nearest_interior_index(strikes: &[f64], x: f64) -> usize {
    let n = strikes.len();
    let mut best = 1usize;
    let mut best_dist = f64::INFINITY;
    for i in 1..n - 1 {
        let d = (strikes[i] - x).abs();
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Derives [`RegimeParams`] from one expiration's smoothed IV surface.
/// Returns all-zero params when the surface has fewer than 3 strikes
/// (no interior point for curvature).
pub fn derive_regime_params(surface: &IvSurface, spot: f64) -> RegimeParams {
    let strikes = &surface.strikes;
    let ivs = &surface.smoothed_ivs;

    if strikes.len() < 3 {
        return RegimeParams {
            atm_iv: 0.0,
            implied_spot_vol_corr: 0.0,
            implied_vol_of_vol: 0.0,
            regime: Regime::Calm,
            expected_daily_spot_move: 0.0,
            expected_daily_vol_move: 0.0,
        };
    }

    let atm_iv = linear_interp(strikes, ivs, spot) / 100.0;

    let (lo, hi) = bracket(strikes, spot);
    let skew = if (strikes[hi] - strikes[lo]).abs() > 1e-12 {
        (ivs[hi] - ivs[lo]) / (strikes[hi] - strikes[lo]) * spot / 100.0
    } else {
        0.0
    };

    let i = nearest_interior_index(strikes, spot);
    let h = (strikes[i + 1] - strikes[i - 1]) / 2.0;
    let curvature = if h.abs() > 1e-12 {
        (ivs[i + 1] - 2.0 * ivs[i] + ivs[i - 1]) / (h * h) * spot * spot / 100.0
    } else {
        0.0
    };

    let implied_spot_vol_corr = (skew * 0.15).clamp(-0.95, 0.5);
    let implied_vol_of_vol = curvature.abs().sqrt() * 2.0 * atm_iv;

    let regime = if atm_iv < 0.15 {
        Regime::Calm
    } else if atm_iv < 0.20 {
        Regime::Normal
    } else if atm_iv < 0.35 {
        Regime::Stressed
    } else {
        Regime::Crisis
    };

    let sqrt_252 = 252f64.sqrt();
    RegimeParams {
        atm_iv,
        implied_spot_vol_corr,
        implied_vol_of_vol,
        regime,
        expected_daily_spot_move: atm_iv / sqrt_252,
        expected_daily_vol_move: implied_vol_of_vol / sqrt_252,
    }
}
