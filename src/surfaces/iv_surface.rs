/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! Per-(expiration, option type) implied-volatility surfaces.

use crate::constants::MS_PER_YEAR;
use crate::model::{OptionChain, OptionType};
use crate::pricing::calculate_implied_volatility;
use crate::surfaces::smoothing::smooth_total_variance;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Volatility model used to build the raw IV grid. Only `BlackScholes` is
/// implemented; other tags are reserved for future parametric models
/// and are rejected before reaching the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolModel {
    BlackScholes,
}

/// Smoothing strategy applied to the raw IV grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SmoothingModel {
    /// Cubic spline over total variance plus convex-hull projection.
    #[default]
    TotalVariance,
    /// No smoothing; `smoothed_ivs` mirrors `raw_ivs`.
    None,
}

/// Raw and smoothed IV grid for one (expiration, option type) pair.
///
/// Invariant: `strikes` is strictly increasing and
/// `raw_ivs.len() == smoothed_ivs.len() == strikes.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IvSurface {
    pub expiration_timestamp: i64,
    pub option_type: OptionType,
    pub strikes: Vec<f64>,
    /// Percentage units (20.0 = 20%).
    pub raw_ivs: Vec<f64>,
    /// Percentage units; equals `raw_ivs` when smoothing was skipped or failed.
    pub smoothed_ivs: Vec<f64>,
}

const SMOOTHING_MIN_IV_PCT: f64 = 1.5;
const IV_FLOOR_PCT: f64 = 1.0;

/// Builds the raw (and, when requested, smoothed) IV surfaces for every
/// (expiration, option type) pair in `chain`.
///
/// An unrecognized smoothing model is treated as `None`.
pub fn get_iv_surfaces(
    _vol_model: VolModel,
    smoothing_model: SmoothingModel,
    chain: &OptionChain,
    as_of_timestamp: i64,
) -> Vec<IvSurface> {
    let mut expirations = chain.expirations();
    expirations.sort_unstable();

    let mut surfaces = Vec::new();
    for expiration_timestamp in expirations {
        for option_type in [OptionType::Call, OptionType::Put] {
            let mut rows: Vec<(f64, f64)> = chain
                .options
                .iter()
                .filter(|o| o.expiration_timestamp == expiration_timestamp && o.option_type == option_type)
                .filter(|o| o.mark > 0.0)
                .map(|o| {
                    let t = (expiration_timestamp - as_of_timestamp).max(0) as f64 / MS_PER_YEAR;
                    let iv = calculate_implied_volatility(
                        o.mark,
                        chain.spot,
                        o.strike,
                        chain.risk_free_rate,
                        chain.dividend_yield,
                        t,
                        option_type,
                    );
                    (o.strike, iv)
                })
                .collect();
            rows.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
            rows.dedup_by(|a, b| (a.0 - b.0).abs() < 1e-9);

            let strikes: Vec<f64> = rows.iter().map(|r| r.0).collect();
            let raw_ivs: Vec<f64> = rows.iter().map(|r| r.1).collect();

            let in_future = expiration_timestamp > as_of_timestamp;
            let smoothed_ivs = if smoothing_model == SmoothingModel::TotalVariance && in_future {
                smooth_surface(&strikes, &raw_ivs, expiration_timestamp, as_of_timestamp)
            } else {
                raw_ivs.clone()
            };

            surfaces.push(IvSurface {
                expiration_timestamp,
                option_type,
                strikes,
                raw_ivs,
                smoothed_ivs,
            });
        }
    }
    surfaces
}

fn smooth_surface(
    strikes: &[f64],
    raw_ivs: &[f64],
    expiration_timestamp: i64,
    as_of_timestamp: i64,
) -> Vec<f64> {
    let t = (expiration_timestamp - as_of_timestamp).max(0) as f64 / MS_PER_YEAR;
    if t <= 0.0 {
        return raw_ivs.to_vec();
    }

    let valid: Vec<(f64, f64)> = strikes
        .iter()
        .zip(raw_ivs.iter())
        .filter(|(_, &iv)| iv > SMOOTHING_MIN_IV_PCT)
        .map(|(&k, &iv)| (k, iv))
        .collect();

    if valid.len() < 5 {
        return raw_ivs.to_vec();
    }

    let valid_strikes: Vec<f64> = valid.iter().map(|v| v.0).collect();
    let total_variance: Vec<f64> = valid.iter().map(|v| (v.1 / 100.0).powi(2) * t).collect();

    let smoothed_w = match smooth_total_variance(&valid_strikes, &total_variance) {
        Ok(w) => w,
        Err(err) => {
            warn!(%err, "IV surface smoothing failed, falling back to raw IVs");
            return raw_ivs.to_vec();
        }
    };

    // Map the smoothed total variance back across the full (unfiltered) strike list.
    let mut by_strike = std::collections::HashMap::new();
    for (k, w) in valid_strikes.iter().zip(smoothed_w.iter()) {
        by_strike.insert((k * 1_000.0).round() as i64, *w);
    }

    strikes
        .iter()
        .zip(raw_ivs.iter())
        .map(|(&k, &raw_iv)| {
            match by_strike.get(&((k * 1_000.0).round() as i64)) {
                Some(&w) if w > 0.0 => (w / t).sqrt() * 100.0,
                _ => raw_iv,
            }
        })
        .collect()
}

/// Exact strike lookup into the smoothed IV grid; `0.0` if there is no
/// matching (expiration, option type, strike) row.
pub fn get_iv_for_strike(
    surfaces: &[IvSurface],
    expiration_timestamp: i64,
    option_type: OptionType,
    strike: f64,
) -> f64 {
    surfaces
        .iter()
        .find(|s| s.expiration_timestamp == expiration_timestamp && s.option_type == option_type)
        .and_then(|s| {
            s.strikes
                .iter()
                .position(|&k| (k - strike).abs() < 1e-9)
                .map(|idx| s.smoothed_ivs[idx])
        })
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NormalizedOption;

    fn opt(strike: f64, ot: OptionType, mark: f64, exp: i64) -> NormalizedOption {
        NormalizedOption {
            occ_symbol: "T".into(),
            underlying: "T".into(),
            strike,
            expiration: "2025-06-20".into(),
            expiration_timestamp: exp,
            option_type: ot,
            bid: mark - 0.05,
            bid_size: 1,
            ask: mark + 0.05,
            ask_size: 1,
            mark,
            last: mark,
            volume: 1,
            open_interest: 1.0,
            live_open_interest: None,
            implied_volatility: 0.2,
            timestamp: 0,
            greeks: None,
        }
    }

    #[test]
    fn lookup_returns_zero_when_absent() {
        let surfaces: Vec<IvSurface> = Vec::new();
        assert_eq!(get_iv_for_strike(&surfaces, 0, OptionType::Call, 100.0), 0.0);
    }

    #[test]
    fn builds_one_surface_per_type_per_expiration() {
        let exp = 30 * 86_400_000;
        let options: Vec<_> = [90.0, 95.0, 100.0, 105.0, 110.0]
            .iter()
            .flat_map(|&k| {
                vec![
                    opt(k, OptionType::Call, (100.0 - k).max(1.0), exp),
                    opt(k, OptionType::Put, (k - 100.0).max(1.0), exp),
                ]
            })
            .collect();
        let chain = OptionChain::new("T", 100.0, 0.04, 0.0, options);
        let surfaces = get_iv_surfaces(VolModel::BlackScholes, SmoothingModel::None, &chain, 0);
        assert_eq!(surfaces.len(), 2);
        for s in &surfaces {
            assert_eq!(s.strikes.len(), s.raw_ivs.len());
            assert_eq!(s.strikes.len(), s.smoothed_ivs.len());
            assert!(s.strikes.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
