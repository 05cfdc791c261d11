/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! Bisection implied-volatility inversion.

use crate::constants::{
    IV_DEEP_ITM_FLOOR_PCT, IV_MAX_ITERATIONS, IV_PRICE_TOLERANCE, IV_SEARCH_CEILING,
    IV_SEARCH_FLOOR,
};
use crate::model::{BsParams, OptionType};
use crate::pricing::black_scholes;
use tracing::trace;

fn intrinsic_value(spot: f64, strike: f64, option_type: OptionType) -> f64 {
    match option_type {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    }
}

/// Inverts a quoted option price to an implied volatility, in percent
/// (e.g. `20.0` means 20%).
///
/// Returns `0.0` for degenerate inputs (non-positive spot/strike/time).
/// Returns `1.0` (the percent floor) when the quote is at or below
/// intrinsic value plus one cent, since bisection cannot distinguish a
/// volatility there.
#[allow(clippy::too_many_arguments)]
pub fn calculate_implied_volatility(
    option_price: f64,
    spot: f64,
    strike: f64,
    risk_free_rate: f64,
    dividend_yield: f64,
    time_to_expiry: f64,
    option_type: OptionType,
) -> f64 {
    if spot <= 0.0 || strike <= 0.0 || time_to_expiry <= 0.0 || !option_price.is_finite() {
        return 0.0;
    }

    let intrinsic = intrinsic_value(spot, strike, option_type);
    if option_price <= intrinsic + 0.01 {
        return IV_DEEP_ITM_FLOOR_PCT;
    }

    let mut low = IV_SEARCH_FLOOR;
    let mut high = IV_SEARCH_CEILING;
    let mut mid = (low + high) / 2.0;

    for _ in 0..IV_MAX_ITERATIONS {
        mid = (low + high) / 2.0;
        let params = BsParams::new(spot, strike, time_to_expiry, mid, risk_free_rate, option_type)
            .with_dividend_yield(dividend_yield);
        let model_price = black_scholes::price(&params);
        let diff = model_price - option_price;

        if diff.abs() < IV_PRICE_TOLERANCE {
            break;
        }
        if diff > 0.0 {
            high = mid;
        } else {
            low = mid;
        }
    }

    trace!(mid, low, high, "implied volatility bisection converged");
    mid * 100.0
}
