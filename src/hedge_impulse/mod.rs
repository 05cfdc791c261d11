/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! Kernel-smoothed hedge-impulse curve: a continuous function of price built
//! from the discrete per-strike gamma and vanna exposure rows, combined with
//! the spot-vol coupling implied by the local skew of the IV surface.

use crate::exposure::ExposureVariantsPerExpiry;
use crate::regime::derive_regime_params;
use crate::surfaces::IvSurface;
use serde::{Deserialize, Serialize};

fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Grid geometry and kernel-bandwidth knobs for [`compute_hedge_impulse_curve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HedgeImpulseConfig {
    /// Half-width of the price grid around spot, in percent.
    pub range_percent: f64,
    /// Grid step, in percent of spot.
    pub step_percent: f64,
    /// Gaussian kernel bandwidth, expressed as a multiple of the modal strike spacing.
    pub kernel_width_strikes: f64,
}

impl Default for HedgeImpulseConfig {
    fn default() -> Self {
        Self {
            range_percent: 3.0,
            step_percent: 0.05,
            kernel_width_strikes: 2.0,
        }
    }
}

/// One sample of the smoothed curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HedgeImpulsePoint {
    pub price: f64,
    pub gamma_smoothed: f64,
    pub vanna_smoothed: f64,
    pub impulse: f64,
}

/// Sign change of the impulse curve between two adjacent grid points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CrossingDirection {
    Rising,
    Falling,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZeroCrossing {
    pub price: f64,
    pub direction: CrossingDirection,
}

/// A positive-impulse local maximum (price tends to be pulled back toward it)
/// or a negative-impulse local minimum (price tends to be pushed away from it).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExtremumKind {
    Basin,
    Peak,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremum {
    pub price: f64,
    pub impulse: f64,
    pub kind: ExtremumKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpulseBias {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpulseRegime {
    Pinned,
    Expansion,
    SqueezeUp,
    SqueezeDown,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgeImpulseCurve {
    pub spot: f64,
    pub expiration_timestamp: i64,
    pub computed_at: i64,
    pub points: Vec<HedgeImpulsePoint>,
    /// Spot-vol coupling `k`, clamped to `[2, 20]`.
    pub k: f64,
    /// Gaussian kernel bandwidth actually used (strikes, not percent).
    pub kernel_width: f64,
    pub detected_strike_spacing: f64,
    pub impulse_at_spot: f64,
    pub slope_at_spot: f64,
    pub zero_crossings: Vec<ZeroCrossing>,
    pub basins: Vec<Extremum>,
    pub peaks: Vec<Extremum>,
    pub asymmetry: ImpulseBias,
    pub asymmetry_ratio: f64,
    pub regime: ImpulseRegime,
    pub nearest_basin_above: Option<f64>,
    pub nearest_basin_below: Option<f64>,
}

fn detect_strike_spacing(strikes: &[f64]) -> f64 {
    if strikes.len() < 2 {
        return 1.0;
    }
    let mut gaps: Vec<i64> = strikes
        .windows(2)
        .map(|w| ((w[1] - w[0]) * 100.0).round() as i64)
        .filter(|&g| g > 0)
        .collect();
    if gaps.is_empty() {
        return 1.0;
    }
    gaps.sort_unstable();
    let mut best_gap = gaps[0];
    let mut best_count = 0usize;
    let mut i = 0;
    while i < gaps.len() {
        let mut j = i;
        while j < gaps.len() && gaps[j] == gaps[i] {
            j += 1;
        }
        if j - i > best_count {
            best_count = j - i;
            best_gap = gaps[i];
        }
        i = j;
    }
    best_gap as f64 / 100.0
}

fn gaussian_kernel_smooth(strikes: &[f64], values: &[f64], price: f64, bandwidth: f64) -> f64 {
    if bandwidth <= 0.0 {
        return 0.0;
    }
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (&k, &v) in strikes.iter().zip(values.iter()) {
        let z = (k - price) / bandwidth;
        let w = (-0.5 * z * z).exp();
        weighted_sum += w * v;
        weight_total += w;
    }
    if weight_total > 0.0 {
        weighted_sum / weight_total
    } else {
        0.0
    }
}

fn impulse_at(strikes: &[f64], gammas: &[f64], vannas: &[f64], price: f64, bandwidth: f64, k: f64) -> (f64, f64, f64) {
    let gamma = gaussian_kernel_smooth(strikes, gammas, price, bandwidth);
    let vanna = gaussian_kernel_smooth(strikes, vannas, price, bandwidth);
    let impulse = if price.abs() > 1e-12 {
        gamma - (k / price) * vanna
    } else {
        gamma
    };
    (gamma, vanna, impulse)
}

/// Linear interpolation of the curve's impulse values at an arbitrary price,
/// used to evaluate the curve between grid points (spot, S ± step).
fn interp_impulse(points: &[HedgeImpulsePoint], price: f64) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    if price <= points[0].price {
        return points[0].impulse;
    }
    let last = points.len() - 1;
    if price >= points[last].price {
        return points[last].impulse;
    }
    for w in points.windows(2) {
        if price >= w[0].price && price <= w[1].price {
            let (x0, x1) = (w[0].price, w[1].price);
            if (x1 - x0).abs() < 1e-12 {
                return w[0].impulse;
            }
            return w[0].impulse + (w[1].impulse - w[0].impulse) * (price - x0) / (x1 - x0);
        }
    }
    points[last].impulse
}

/// Builds the hedge-impulse curve for one expiration's exposure row, using
/// the canonical exposure variant and the matching (call-side) IV surface to
/// derive the local spot-vol coupling.
pub fn compute_hedge_impulse_curve(
    exposures: &ExposureVariantsPerExpiry,
    surface: &IvSurface,
    config: &HedgeImpulseConfig,
) -> HedgeImpulseCurve {
    let spot = exposures.spot;
    let mut rows = exposures.canonical.strike_exposures.clone();
    rows.sort_by(|a, b| a.strike.partial_cmp(&b.strike).unwrap());

    let strikes: Vec<f64> = rows.iter().map(|r| r.strike).collect();
    let gammas: Vec<f64> = rows.iter().map(|r| r.gamma_exposure).collect();
    let vannas: Vec<f64> = rows.iter().map(|r| r.vanna_exposure).collect();

    let spacing = detect_strike_spacing(&strikes);
    let bandwidth = config.kernel_width_strikes * spacing;

    let regime_params = derive_regime_params(surface, spot);
    let k = (-regime_params.implied_spot_vol_corr * regime_params.atm_iv * 252f64.sqrt()).clamp(2.0, 20.0);

    let n_steps = ((2.0 * config.range_percent) / config.step_percent).floor() as usize;
    let grid_step = spot * config.step_percent / 100.0;
    let start = spot * (1.0 - config.range_percent / 100.0);

    let mut points = Vec::with_capacity(n_steps + 1);
    for i in 0..=n_steps {
        let price = start + grid_step * i as f64;
        let (gamma, vanna, impulse) = impulse_at(&strikes, &gammas, &vannas, price, bandwidth, k);
        points.push(HedgeImpulsePoint {
            price,
            gamma_smoothed: gamma,
            vanna_smoothed: vanna,
            impulse,
        });
    }

    let impulse_at_spot = interp_impulse(&points, spot);
    let h = grid_step.max(1e-9);
    let slope_at_spot = (interp_impulse(&points, spot + h) - interp_impulse(&points, spot - h)) / (2.0 * h);

    let mut zero_crossings = Vec::new();
    for w in points.windows(2) {
        let (a, b) = (w[0].impulse, w[1].impulse);
        if a == 0.0 || (a < 0.0) != (b < 0.0) {
            if a.signum() == b.signum() && a != 0.0 {
                continue;
            }
            let frac = if (b - a).abs() > 1e-12 { -a / (b - a) } else { 0.0 };
            let price = w[0].price + frac * (w[1].price - w[0].price);
            let direction = if b > a { CrossingDirection::Rising } else { CrossingDirection::Falling };
            zero_crossings.push(ZeroCrossing { price, direction });
        }
    }

    let mut basins = Vec::new();
    let mut peaks = Vec::new();
    for i in 1..points.len().saturating_sub(1) {
        let (prev, cur, next) = (points[i - 1].impulse, points[i].impulse, points[i + 1].impulse);
        if cur > prev && cur > next && cur > 0.0 {
            basins.push(Extremum {
                price: points[i].price,
                impulse: cur,
                kind: ExtremumKind::Basin,
            });
        } else if cur < prev && cur < next && cur < 0.0 {
            peaks.push(Extremum {
                price: points[i].price,
                impulse: cur,
                kind: ExtremumKind::Peak,
            });
        }
    }

    let upside_integral: f64 = points
        .iter()
        .filter(|p| p.price > spot && p.price <= spot * 1.005)
        .map(|p| p.impulse * grid_step)
        .sum();
    let downside_integral: f64 = points
        .iter()
        .filter(|p| p.price < spot && p.price >= spot * 0.995)
        .map(|p| p.impulse * grid_step)
        .sum();

    let max_abs = upside_integral.abs().max(downside_integral.abs());
    let asymmetry = if upside_integral < downside_integral - 0.10 * max_abs {
        ImpulseBias::Up
    } else if downside_integral < upside_integral - 0.10 * max_abs {
        ImpulseBias::Down
    } else {
        ImpulseBias::Neutral
    };
    let asymmetry_ratio = upside_integral.abs() / downside_integral.abs().max(1e-10);

    let mean_abs_impulse = if points.is_empty() {
        0.0
    } else {
        points.iter().map(|p| p.impulse.abs()).sum::<f64>() / points.len() as f64
    };
    let normalized = if mean_abs_impulse > 1e-12 { impulse_at_spot / mean_abs_impulse } else { 0.0 };

    let regime = if normalized > 0.5 {
        ImpulseRegime::Pinned
    } else if normalized < -0.3 {
        match asymmetry {
            ImpulseBias::Up => ImpulseRegime::SqueezeUp,
            ImpulseBias::Down => ImpulseRegime::SqueezeDown,
            ImpulseBias::Neutral => ImpulseRegime::Expansion,
        }
    } else if asymmetry_ratio > 1.5 {
        match asymmetry {
            ImpulseBias::Up => ImpulseRegime::SqueezeUp,
            ImpulseBias::Down => ImpulseRegime::SqueezeDown,
            ImpulseBias::Neutral => ImpulseRegime::Neutral,
        }
    } else {
        ImpulseRegime::Neutral
    };

    let nearest_basin_above = basins
        .iter()
        .filter(|b| b.price > spot)
        .min_by(|a, b| a.price.partial_cmp(&b.price).unwrap())
        .map(|b| b.price);
    let nearest_basin_below = basins
        .iter()
        .filter(|b| b.price < spot)
        .max_by(|a, b| a.price.partial_cmp(&b.price).unwrap())
        .map(|b| b.price);

    HedgeImpulseCurve {
        spot,
        expiration_timestamp: exposures.expiration_timestamp,
        computed_at: now_ms(),
        points,
        k,
        kernel_width: bandwidth,
        detected_strike_spacing: spacing,
        impulse_at_spot,
        slope_at_spot,
        zero_crossings,
        basins,
        peaks,
        asymmetry,
        asymmetry_ratio,
        regime,
        nearest_basin_above,
        nearest_basin_below,
    }
}
