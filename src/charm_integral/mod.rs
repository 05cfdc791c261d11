/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! Projects an expiration's aggregate charm exposure forward across discrete
//! time buckets between now and expiry, so a desk can see not just the
//! total delta drift but when in the session it lands.

use crate::constants::MINUTES_PER_DAY_SESSION;
use crate::exposure::ExposureModeBreakdown;
use serde::{Deserialize, Serialize};

fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharmIntegralConfig {
    /// Width of one walk step, in minutes.
    pub time_step_minutes: f64,
}

impl Default for CharmIntegralConfig {
    fn default() -> Self {
        Self { time_step_minutes: 15.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecayDirection {
    Buying,
    Selling,
    Neutral,
}

/// One strike's share of the expiration's total charm decay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharmContribution {
    pub strike: f64,
    pub charm_exposure: f64,
    pub fraction_of_total: f64,
}

/// One minute-bucket sample of the charm-decay walk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub minutes_remaining: f64,
    pub instantaneous_cex: f64,
    pub cumulative_cex: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharmIntegral {
    pub spot: f64,
    pub expiration_timestamp: i64,
    pub computed_at: i64,
    pub minutes_remaining: f64,
    pub total_charm_to_close: f64,
    pub direction: DecayDirection,
    pub buckets: Vec<TimeBucket>,
    /// Sorted by `|charm_exposure|` descending.
    pub contributions: Vec<CharmContribution>,
}

fn empty_result(spot: f64, expiration_timestamp: i64) -> CharmIntegral {
    CharmIntegral {
        spot,
        expiration_timestamp,
        computed_at: now_ms(),
        minutes_remaining: 0.0,
        total_charm_to_close: 0.0,
        direction: DecayDirection::Neutral,
        buckets: Vec::new(),
        contributions: Vec::new(),
    }
}

/// Walks one expiration's total charm exposure forward from `as_of_timestamp`
/// to expiry in discrete `time_step_minutes`-wide buckets, scaling each
/// bucket's instantaneous charm by `sqrt(minutesRemaining / t)` and
/// accumulating a running total. The final bucket's cumulative figure is
/// `total_charm_to_close`.
pub fn compute_charm_integral(
    breakdown: &ExposureModeBreakdown,
    spot: f64,
    expiration_timestamp: i64,
    as_of_timestamp: i64,
    config: &CharmIntegralConfig,
) -> CharmIntegral {
    let minutes_remaining = ((expiration_timestamp - as_of_timestamp).max(0) as f64) / 60_000.0;
    if minutes_remaining <= 0.0 {
        return empty_result(spot, expiration_timestamp);
    }

    let total_cex = breakdown.total_charm;
    let total_abs: f64 = breakdown.strike_exposures.iter().map(|r| r.charm_exposure.abs()).sum();

    let mut contributions: Vec<CharmContribution> = breakdown
        .strike_exposures
        .iter()
        .filter(|r| r.charm_exposure != 0.0)
        .map(|r| CharmContribution {
            strike: r.strike,
            charm_exposure: r.charm_exposure,
            fraction_of_total: if total_abs > 1e-12 { r.charm_exposure.abs() / total_abs } else { 0.0 },
        })
        .collect();
    contributions.sort_by(|a, b| b.charm_exposure.abs().partial_cmp(&a.charm_exposure.abs()).unwrap());

    let time_step = config.time_step_minutes.max(1e-6);
    let lower_bound = time_step.max(1.0);

    let mut buckets = Vec::new();
    let mut cumulative_cex = 0.0;
    let mut t = minutes_remaining;
    while t >= lower_bound {
        let time_scaling = (minutes_remaining / t).sqrt();
        let instantaneous_cex = total_cex * time_scaling;
        let bucket_contribution = instantaneous_cex * (time_step / MINUTES_PER_DAY_SESSION);
        cumulative_cex += bucket_contribution;
        buckets.push(TimeBucket {
            minutes_remaining: t,
            instantaneous_cex,
            cumulative_cex,
        });
        t -= time_step;
    }

    let total_charm_to_close = buckets.last().map(|b| b.cumulative_cex).unwrap_or(0.0);
    let direction = if total_charm_to_close > 1e-9 {
        DecayDirection::Buying
    } else if total_charm_to_close < -1e-9 {
        DecayDirection::Selling
    } else {
        DecayDirection::Neutral
    };

    CharmIntegral {
        spot,
        expiration_timestamp,
        computed_at: now_ms(),
        minutes_remaining,
        total_charm_to_close,
        direction,
        buckets,
        contributions,
    }
}
