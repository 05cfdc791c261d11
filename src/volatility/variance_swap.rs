/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! CBOE model-free variance-swap implied volatility and its two-term
//! interpolation to a target maturity.

use crate::constants::MS_PER_YEAR;
use crate::model::{NormalizedOption, OptionType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Result of the single-expiration CBOE variance-swap computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct VarianceSwapResult {
    /// Decimal annualized implied volatility (0.18 = 18%).
    pub implied_volatility: f64,
    pub forward: f64,
    pub k0: f64,
    pub num_strikes: usize,
    pub put_contribution: f64,
    pub call_contribution: f64,
    /// Time to expiry in years used for this computation.
    pub time_to_expiry: f64,
}

struct StrikePair<'a> {
    strike: f64,
    call: Option<&'a NormalizedOption>,
    put: Option<&'a NormalizedOption>,
}

fn group_by_strike(options: &[NormalizedOption]) -> Vec<StrikePair<'_>> {
    let mut map: BTreeMap<u64, StrikePair<'_>> = BTreeMap::new();
    for opt in options {
        // Bucket on a fixed-point strike key so float strikes compare stably.
        let key = (opt.strike * 1_000.0).round() as u64;
        let entry = map.entry(key).or_insert_with(|| StrikePair {
            strike: opt.strike,
            call: None,
            put: None,
        });
        match opt.option_type {
            OptionType::Call => entry.call = Some(opt),
            OptionType::Put => entry.put = Some(opt),
        }
    }
    map.into_values().collect()
}

/// Computes the CBOE model-free implied variance for a single expiration's
/// option slice. `as_of_timestamp` and the options'
/// `expiration_timestamp` determine `T`; the caller is expected to have
/// already filtered `options` down to a single expiration.
pub fn compute_variance_swap_iv(
    options: &[NormalizedOption],
    spot: f64,
    risk_free_rate: f64,
    as_of_timestamp: i64,
) -> VarianceSwapResult {
    if options.is_empty() {
        return VarianceSwapResult {
            forward: spot,
            k0: spot,
            ..Default::default()
        };
    }

    let expiration_timestamp = options[0].expiration_timestamp;
    let t = (expiration_timestamp - as_of_timestamp).max(0) as f64 / MS_PER_YEAR;
    if t <= 0.0 {
        warn!(expiration_timestamp, as_of_timestamp, "variance swap requested for past expiration");
        return VarianceSwapResult {
            forward: spot,
            k0: spot,
            ..Default::default()
        };
    }

    let pairs = group_by_strike(options);
    let strikes: Vec<f64> = pairs.iter().map(|p| p.strike).collect();
    let n = strikes.len();
    if n == 0 {
        return VarianceSwapResult {
            forward: spot,
            k0: spot,
            time_to_expiry: t,
            ..Default::default()
        };
    }

    // ΔK_i: centered gap, one-sided at the endpoints, fallback 1 for a lone strike.
    let delta_k: Vec<f64> = if n == 1 {
        vec![1.0]
    } else {
        (0..n)
            .map(|i| {
                if i == 0 {
                    strikes[1] - strikes[0]
                } else if i == n - 1 {
                    strikes[n - 1] - strikes[n - 2]
                } else {
                    (strikes[i + 1] - strikes[i - 1]) / 2.0
                }
            })
            .collect()
    };

    let mid = |pair: &StrikePair<'_>, which: OptionType| -> f64 {
        match which {
            OptionType::Call => pair.call.map(|o| o.mid()).unwrap_or(0.0),
            OptionType::Put => pair.put.map(|o| o.mid()).unwrap_or(0.0),
        }
    };

    // K0: the strike minimizing |call_mid - put_mid| among strikes with both mids positive.
    let mut k0_idx = None;
    let mut best_gap = f64::INFINITY;
    for (i, pair) in pairs.iter().enumerate() {
        let c = mid(pair, OptionType::Call);
        let p = mid(pair, OptionType::Put);
        if c > 0.0 && p > 0.0 {
            let gap = (c - p).abs();
            if gap < best_gap {
                best_gap = gap;
                k0_idx = Some(i);
            }
        }
    }

    let k0_idx = match k0_idx {
        Some(i) => i,
        None => {
            return VarianceSwapResult {
                forward: spot,
                k0: spot,
                time_to_expiry: t,
                num_strikes: n,
                ..Default::default()
            };
        }
    };

    let k0 = strikes[k0_idx];
    let rt = risk_free_rate * t;
    let forward = k0
        + rt.exp() * (mid(&pairs[k0_idx], OptionType::Call) - mid(&pairs[k0_idx], OptionType::Put));

    let mut sum = 0.0;
    let mut put_contribution = 0.0;
    let mut call_contribution = 0.0;
    let mut contributing = 0usize;

    let q_at = |pair: &StrikePair<'_>, idx: usize| -> f64 {
        if idx < k0_idx {
            mid(pair, OptionType::Put)
        } else if idx > k0_idx {
            mid(pair, OptionType::Call)
        } else {
            (mid(pair, OptionType::Call) + mid(pair, OptionType::Put)) / 2.0
        }
    };

    let has_zero_bid = |pair: &StrikePair<'_>, idx: usize| -> bool {
        if idx < k0_idx {
            pair.put.map(|o| o.bid <= 0.0).unwrap_or(true)
        } else if idx > k0_idx {
            pair.call.map(|o| o.bid <= 0.0).unwrap_or(true)
        } else {
            false
        }
    };

    // K0 itself always contributes.
    {
        let q = q_at(&pairs[k0_idx], k0_idx);
        let term = delta_k[k0_idx] / (k0 * k0) * rt.exp() * q;
        sum += term;
        contributing += 1;
        call_contribution += term.max(0.0) / 2.0;
        put_contribution += term.max(0.0) / 2.0;
    }

    // Walk downward from K0 (puts), stopping on two consecutive zero bids.
    let mut consecutive_zero = 0;
    let mut idx = k0_idx;
    while idx > 0 {
        idx -= 1;
        if has_zero_bid(&pairs[idx], idx) {
            consecutive_zero += 1;
            if consecutive_zero >= 2 {
                break;
            }
            continue;
        }
        consecutive_zero = 0;
        let q = q_at(&pairs[idx], idx);
        let term = delta_k[idx] / (strikes[idx] * strikes[idx]) * rt.exp() * q;
        sum += term;
        put_contribution += term;
        contributing += 1;
    }

    // Walk upward from K0 (calls), same rule.
    let mut consecutive_zero = 0;
    let mut idx = k0_idx;
    while idx + 1 < n {
        idx += 1;
        if has_zero_bid(&pairs[idx], idx) {
            consecutive_zero += 1;
            if consecutive_zero >= 2 {
                break;
            }
            continue;
        }
        consecutive_zero = 0;
        let q = q_at(&pairs[idx], idx);
        let term = delta_k[idx] / (strikes[idx] * strikes[idx]) * rt.exp() * q;
        sum += term;
        call_contribution += term;
        contributing += 1;
    }

    let variance = (2.0 / t) * sum - (forward / k0 - 1.0).powi(2) / t;
    let variance = variance.max(0.0);
    let iv = variance.sqrt();

    debug!(k0, forward, iv, contributing, "variance swap computed");

    VarianceSwapResult {
        implied_volatility: iv,
        forward,
        k0,
        num_strikes: contributing,
        put_contribution,
        call_contribution,
        time_to_expiry: t,
    }
}

/// Result of two-term VIX-style interpolation to a target maturity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ImpliedVolatilityResult {
    pub implied_volatility: f64,
    pub target_days: f64,
}

/// Interpolates between a near- and far-term variance-swap result to a
/// target number of calendar days.
pub fn compute_implied_volatility(
    near: VarianceSwapResult,
    far: Option<VarianceSwapResult>,
    target_days: Option<f64>,
) -> ImpliedVolatilityResult {
    let far = match (far, target_days) {
        (Some(f), Some(days)) => (f, days),
        _ => {
            return ImpliedVolatilityResult {
                implied_volatility: near.implied_volatility,
                target_days: near.time_to_expiry * 365.0,
            };
        }
    };
    let (far, target_days) = far;

    let n1 = near.time_to_expiry * 365.0;
    let n2 = far.time_to_expiry * 365.0;

    if (n2 - n1).abs() < (1.0 / 86_400_000.0) {
        return ImpliedVolatilityResult {
            implied_volatility: near.implied_volatility,
            target_days: n1,
        };
    }

    let w1 = (n2 - target_days) / (n2 - n1);
    let w2 = (target_days - n1) / (n2 - n1);

    let n_year = 365.0;
    let interpolated_variance = (near.time_to_expiry * near.implied_volatility.powi(2) * w1
        + far.time_to_expiry * far.implied_volatility.powi(2) * w2)
        * (n_year / target_days);

    ImpliedVolatilityResult {
        implied_volatility: interpolated_variance.max(0.0).sqrt(),
        target_days,
    }
}
