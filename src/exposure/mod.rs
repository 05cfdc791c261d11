/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! Per-strike dealer gamma/vanna/charm exposure in three variants.
//!
//! Sign convention throughout: dealers are modeled short calls, long
//! puts, so a call leg's open interest contributes negatively and a
//! put leg's contributes positively.

use crate::constants::{MS_PER_DAY, MS_PER_YEAR};
use crate::model::{BsParams, OptionChain, OptionType};
use crate::pricing;
use crate::surfaces::{get_iv_for_strike, IvSurface};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// A single strike's exposure row, shared shape across all three variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct StrikeExposure {
    pub strike: f64,
    pub gamma_exposure: f64,
    pub vanna_exposure: f64,
    pub charm_exposure: f64,
    pub net_exposure: f64,
}

impl StrikeExposure {
    fn new(strike: f64, gamma: f64, vanna: f64, charm: f64) -> Self {
        let gamma = sanitize(gamma);
        let vanna = sanitize(vanna);
        let charm = sanitize(charm);
        Self {
            strike,
            gamma_exposure: gamma,
            vanna_exposure: vanna,
            charm_exposure: charm,
            net_exposure: sanitize(gamma + vanna + charm),
        }
    }
}

/// Totals, argmax/argmin strikes, and the strike list (sorted by net
/// exposure descending) for one exposure variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExposureModeBreakdown {
    pub total_gamma: f64,
    pub total_vanna: f64,
    pub total_charm: f64,
    pub total_net: f64,
    pub strike_at_max_gamma: f64,
    pub strike_at_min_gamma: f64,
    pub strike_at_max_vanna: f64,
    pub strike_at_min_vanna: f64,
    pub strike_at_max_charm: f64,
    pub strike_at_min_charm: f64,
    pub strike_at_max_net: f64,
    pub strike_at_min_net: f64,
    /// Sorted by `net_exposure` descending (stable sort, first-hit tie-break).
    pub strike_exposures: Vec<StrikeExposure>,
}

fn argmax_strike(rows: &[StrikeExposure], f: impl Fn(&StrikeExposure) -> f64) -> f64 {
    rows.iter()
        .fold(None::<(f64, f64)>, |best, row| {
            let v = f(row);
            match best {
                Some((_, bv)) if bv >= v => best,
                _ => Some((row.strike, v)),
            }
        })
        .map(|(s, _)| s)
        .unwrap_or(0.0)
}

fn argmin_strike(rows: &[StrikeExposure], f: impl Fn(&StrikeExposure) -> f64) -> f64 {
    rows.iter()
        .fold(None::<(f64, f64)>, |best, row| {
            let v = f(row);
            match best {
                Some((_, bv)) if bv <= v => best,
                _ => Some((row.strike, v)),
            }
        })
        .map(|(s, _)| s)
        .unwrap_or(0.0)
}

fn build_breakdown(mut rows: Vec<StrikeExposure>) -> ExposureModeBreakdown {
    let strike_at_max_gamma = argmax_strike(&rows, |r| r.gamma_exposure);
    let strike_at_min_gamma = argmin_strike(&rows, |r| r.gamma_exposure);
    let strike_at_max_vanna = argmax_strike(&rows, |r| r.vanna_exposure);
    let strike_at_min_vanna = argmin_strike(&rows, |r| r.vanna_exposure);
    let strike_at_max_charm = argmax_strike(&rows, |r| r.charm_exposure);
    let strike_at_min_charm = argmin_strike(&rows, |r| r.charm_exposure);
    let strike_at_max_net = argmax_strike(&rows, |r| r.net_exposure);
    let strike_at_min_net = argmin_strike(&rows, |r| r.net_exposure);

    let total_gamma = sanitize(rows.iter().map(|r| r.gamma_exposure).sum());
    let total_vanna = sanitize(rows.iter().map(|r| r.vanna_exposure).sum());
    let total_charm = sanitize(rows.iter().map(|r| r.charm_exposure).sum());
    let total_net = sanitize(total_gamma + total_vanna + total_charm);

    rows.sort_by(|a, b| b.net_exposure.partial_cmp(&a.net_exposure).unwrap());

    ExposureModeBreakdown {
        total_gamma,
        total_vanna,
        total_charm,
        total_net,
        strike_at_max_gamma,
        strike_at_min_gamma,
        strike_at_max_vanna,
        strike_at_min_vanna,
        strike_at_max_charm,
        strike_at_min_charm,
        strike_at_max_net,
        strike_at_min_net,
        strike_exposures: rows,
    }
}

/// The three exposure variants plus the per-strike rows for one expiration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureVariantsPerExpiry {
    pub spot: f64,
    pub expiration_timestamp: i64,
    pub canonical: ExposureModeBreakdown,
    pub state_weighted: ExposureModeBreakdown,
    pub flow_delta: ExposureModeBreakdown,
}

struct StrikeLeg<'a> {
    strike: f64,
    call: &'a crate::model::NormalizedOption,
    put: &'a crate::model::NormalizedOption,
}

fn resolve_vol(
    surfaces: &[IvSurface],
    expiration_timestamp: i64,
    option_type: OptionType,
    strike: f64,
    fallback_decimal_iv: f64,
) -> f64 {
    let surface_pct = get_iv_for_strike(surfaces, expiration_timestamp, option_type, strike);
    if surface_pct > 0.0 && surface_pct.is_finite() {
        surface_pct / 100.0
    } else {
        fallback_decimal_iv
    }
}

fn pair_by_strike<'a>(options: &'a [crate::model::NormalizedOption]) -> Vec<StrikeLeg<'a>> {
    let mut calls = std::collections::HashMap::new();
    let mut puts = std::collections::HashMap::new();
    for opt in options {
        let key = (opt.strike * 1_000.0).round() as i64;
        match opt.option_type {
            OptionType::Call => {
                calls.insert(key, opt);
            }
            OptionType::Put => {
                puts.insert(key, opt);
            }
        }
    }
    let mut legs: Vec<StrikeLeg<'_>> = calls
        .into_iter()
        .filter_map(|(key, call)| puts.get(&key).map(|&put| StrikeLeg { strike: call.strike, call, put }))
        .collect();
    legs.sort_by(|a, b| a.strike.partial_cmp(&b.strike).unwrap());
    legs
}

fn compute_expiry_row(
    chain: &OptionChain,
    surfaces: &[IvSurface],
    expiration_timestamp: i64,
    as_of_timestamp: i64,
) -> Option<ExposureVariantsPerExpiry> {
    let options = chain.options_for_expiration(expiration_timestamp);
    let owned: Vec<_> = options.into_iter().cloned().collect();
    let legs = pair_by_strike(&owned);
    if legs.is_empty() {
        return None;
    }

    let t = (expiration_timestamp - as_of_timestamp).max(0) as f64 / MS_PER_YEAR;
    let days_to_expiration = ((expiration_timestamp - as_of_timestamp) as f64 / MS_PER_DAY).max(0.0);
    let spot = chain.spot;

    let mut canonical_rows = Vec::with_capacity(legs.len());
    let mut state_rows = Vec::with_capacity(legs.len());
    let mut flow_rows = Vec::with_capacity(legs.len());

    for leg in &legs {
        let vol_call = resolve_vol(surfaces, expiration_timestamp, OptionType::Call, leg.strike, leg.call.implied_volatility);
        let vol_put = resolve_vol(surfaces, expiration_timestamp, OptionType::Put, leg.strike, leg.put.implied_volatility);

        let call_params = BsParams::new(spot, leg.strike, t, vol_call, chain.risk_free_rate, OptionType::Call)
            .with_dividend_yield(chain.dividend_yield);
        let put_params = BsParams::new(spot, leg.strike, t, vol_put, chain.risk_free_rate, OptionType::Put)
            .with_dividend_yield(chain.dividend_yield);
        let gc = pricing::greeks(&call_params);
        let gp = pricing::greeks(&put_params);

        let oi_c = leg.call.open_interest;
        let oi_p = leg.put.open_interest;

        let canonical_gamma = (-oi_c * gc.gamma + oi_p * gp.gamma) * spot * spot * 0.01 * 100.0;
        let canonical_vanna = (-oi_c * gc.vanna + oi_p * gp.vanna) * spot * 100.0 * 0.01;
        let canonical_charm = (-oi_c * gc.charm + oi_p * gp.charm) * spot * 100.0;
        canonical_rows.push(StrikeExposure::new(leg.strike, canonical_gamma, canonical_vanna, canonical_charm));

        let state_vol_level = (vol_call + vol_put) / 2.0;
        let state_vanna = canonical_vanna * state_vol_level;
        let state_charm = canonical_charm * days_to_expiration.max(0.0);
        state_rows.push(StrikeExposure::new(leg.strike, canonical_gamma, state_vanna, state_charm));

        let flow_c = leg.call.flow_delta().unwrap_or(0.0);
        let flow_p = leg.put.flow_delta().unwrap_or(0.0);
        let flow_gamma = (-flow_c * gc.gamma + flow_p * gp.gamma) * spot * spot * 0.01 * 100.0;
        let flow_vanna = (-flow_c * gc.vanna + flow_p * gp.vanna) * spot * 100.0 * 0.01;
        let flow_charm = (-flow_c * gc.charm + flow_p * gp.charm) * spot * 100.0;
        flow_rows.push(StrikeExposure::new(leg.strike, flow_gamma, flow_vanna, flow_charm));
    }

    Some(ExposureVariantsPerExpiry {
        spot,
        expiration_timestamp,
        canonical: build_breakdown(canonical_rows),
        state_weighted: build_breakdown(state_rows),
        flow_delta: build_breakdown(flow_rows),
    })
}

/// Computes gamma/vanna/charm exposure for every future expiration in
/// `chain`. `as_of_timestamp` defaults to the caller's notion of "now";
/// expirations at or before it are pruned from the output entirely.
pub fn calculate_gamma_vanna_charm_exposures(
    chain: &OptionChain,
    surfaces: &[IvSurface],
    as_of_timestamp: Option<i64>,
) -> Vec<ExposureVariantsPerExpiry> {
    let as_of = as_of_timestamp.unwrap_or_else(now_ms);
    let mut expirations = chain.expirations();
    expirations.retain(|&exp| exp > as_of);
    expirations.sort_unstable();

    expirations
        .par_iter()
        .filter_map(|&exp| compute_expiry_row(chain, surfaces, exp, as_of))
        .collect()
}

fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Dealer-hedging "shares needed to cover" inversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SharesToCover {
    pub action: String,
    pub shares: f64,
    pub implied_move_pct: f64,
    pub resulting_spot: f64,
}

pub fn calculate_shares_needed_to_cover(shares_outstanding: f64, total_net: f64, spot: f64) -> SharesToCover {
    if spot == 0.0 || shares_outstanding == 0.0 || !total_net.is_finite() || !spot.is_finite() {
        return SharesToCover {
            action: String::new(),
            shares: 0.0,
            implied_move_pct: 0.0,
            resulting_spot: spot,
        };
    }

    let action = if total_net > 0.0 { "SELL" } else { "BUY" };
    let shares = (-total_net / spot).abs();
    let implied_move_pct = (-total_net / spot) / shares_outstanding * 100.0;
    let resulting_spot = spot * (1.0 + implied_move_pct / 100.0);

    SharesToCover {
        action: action.to_string(),
        shares: sanitize(shares),
        implied_move_pct: sanitize(implied_move_pct),
        resulting_spot: sanitize(resulting_spot),
    }
}
