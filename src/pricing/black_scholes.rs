/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! Black-Scholes-Merton price and the 13-field Greeks vector.

use crate::model::{BsParams, Greeks, OptionType};
use crate::statistics::{cumulative_normal_distribution as big_n, normal_pdf as phi};
use tracing::trace;

fn d1(p: &BsParams) -> f64 {
    ((p.spot / p.strike).ln()
        + (p.risk_free_rate - p.dividend_yield + p.volatility * p.volatility / 2.0)
            * p.time_to_expiry)
        / (p.volatility * p.time_to_expiry.sqrt())
}

fn d2(d1_value: f64, p: &BsParams) -> f64 {
    d1_value - p.volatility * p.time_to_expiry.sqrt()
}

/// Black-Scholes-Merton price. Returns 0 for degenerate inputs.
pub fn price(p: &BsParams) -> f64 {
    if p.is_degenerate() {
        return 0.0;
    }
    let d1v = d1(p);
    let d2v = d2(d1v, p);
    let disc_q = (-p.dividend_yield * p.time_to_expiry).exp();
    let disc_r = (-p.risk_free_rate * p.time_to_expiry).exp();
    match p.option_type {
        OptionType::Call => p.spot * disc_q * big_n(d1v) - p.strike * disc_r * big_n(d2v),
        OptionType::Put => p.strike * disc_r * big_n(-d2v) - p.spot * disc_q * big_n(-d1v),
    }
}

/// Computes the full Greeks vector, rounded per its presentation
/// convention. Returns an all-zero [`Greeks`] for degenerate inputs.
pub fn greeks(p: &BsParams) -> Greeks {
    if p.is_degenerate() {
        trace!(spot = p.spot, vol = p.volatility, t = p.time_to_expiry, "degenerate BS input");
        return Greeks::default();
    }

    let t = p.time_to_expiry;
    let sigma = p.volatility;
    let s = p.spot;
    let k = p.strike;
    let r = p.risk_free_rate;
    let q = p.dividend_yield;
    let sqrt_t = t.sqrt();

    let d1v = d1(p);
    let d2v = d2(d1v, p);
    let disc_q = (-q * t).exp();
    let disc_r = (-r * t).exp();
    let pdf_d1 = phi(d1v);

    let raw_vega = s * disc_q * sqrt_t * pdf_d1;
    let raw_rho = match p.option_type {
        OptionType::Call => k * t * disc_r * big_n(d2v),
        OptionType::Put => -k * t * disc_r * big_n(-d2v),
    };

    let price_value = price(p);

    let delta = match p.option_type {
        OptionType::Call => disc_q * big_n(d1v),
        OptionType::Put => disc_q * (big_n(d1v) - 1.0),
    };

    let gamma = disc_q * pdf_d1 / (s * sigma * sqrt_t);

    let theta_annual = match p.option_type {
        OptionType::Call => {
            -(s * pdf_d1 * sigma * disc_q) / (2.0 * sqrt_t) - r * k * disc_r * big_n(d2v)
                + q * s * disc_q * big_n(d1v)
        }
        OptionType::Put => {
            -(s * pdf_d1 * sigma * disc_q) / (2.0 * sqrt_t) + r * k * disc_r * big_n(-d2v)
                - q * s * disc_q * big_n(-d1v)
        }
    };

    let vanna = -disc_q * pdf_d1 * d2v / sigma;

    let charm = match p.option_type {
        OptionType::Call => {
            q * disc_q * big_n(d1v)
                - disc_q * pdf_d1 * (2.0 * (r - q) * t - d2v * sigma * sqrt_t)
                    / (2.0 * t * sigma * sqrt_t)
        }
        OptionType::Put => {
            -q * disc_q * big_n(-d1v)
                - disc_q * pdf_d1 * (2.0 * (r - q) * t - d2v * sigma * sqrt_t)
                    / (2.0 * t * sigma * sqrt_t)
        }
    };

    let volga = raw_vega * d1v * d2v / sigma;
    let speed = -gamma / s * (d1v / (sigma * sqrt_t) + 1.0);
    let zomma = gamma * (d1v * d2v - 1.0) / sigma;
    let color = -disc_q * pdf_d1 / (2.0 * s * t * sigma * sqrt_t)
        * (2.0 * q * t + 1.0 + (2.0 * (r - q) * t - d2v * sigma * sqrt_t) / (sigma * sqrt_t));
    let ultima = -raw_vega / (sigma * sigma)
        * (d1v * d2v * (1.0 - d1v * d2v) + d1v * d1v + d2v * d2v);

    Greeks {
        price: price_value,
        delta,
        gamma,
        theta: theta_annual / 365.0,
        vega: raw_vega * 0.01,
        rho: raw_rho * 0.01,
        vanna,
        charm: charm / 365.0,
        volga,
        speed,
        zomma,
        color,
        ultima,
    }
    .rounded()
}
