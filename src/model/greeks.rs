/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

use crate::model::option_type::OptionType;
use serde::{Deserialize, Serialize};

/// Inputs to the Black-Scholes-Merton pricer and Greeks equations.
///
/// Invariant: if any of `{volatility, spot, time_to_expiry}` is
/// non-positive, every price/Greek is defined as zero rather than
/// propagating NaN or a division error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BsParams {
    /// Current underlying price. Must be > 0 for a non-degenerate result.
    pub spot: f64,
    /// Strike price. Must be > 0.
    pub strike: f64,
    /// Time to expiry in years. Must be > 0.
    pub time_to_expiry: f64,
    /// Annualized volatility, decimal (0.20 = 20%). Must be > 0.
    pub volatility: f64,
    /// Continuously compounded annual risk-free rate, decimal.
    pub risk_free_rate: f64,
    /// Continuously compounded annual dividend yield, decimal.
    pub dividend_yield: f64,
    pub option_type: OptionType,
}

impl BsParams {
    pub fn new(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        volatility: f64,
        risk_free_rate: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            spot,
            strike,
            time_to_expiry,
            volatility,
            risk_free_rate,
            dividend_yield: 0.0,
            option_type,
        }
    }

    pub fn with_dividend_yield(mut self, q: f64) -> Self {
        self.dividend_yield = q;
        self
    }

    /// True when any required input is non-positive and the degenerate-input rule applies.
    pub fn is_degenerate(&self) -> bool {
        self.volatility <= 0.0 || self.spot <= 0.0 || self.time_to_expiry <= 0.0
    }
}

/// The full 13-field Greeks vector plus price.
///
/// Rounding convention (applied by the caller at the presentation edge,
/// not inside the pricer, so that internal composition stays exact):
/// price to 2 decimals; every Greek to 5 decimals; theta/charm are
/// per-day figures; vega/rho are per-1-percentage-point figures.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Greeks {
    pub price: f64,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
    pub vanna: f64,
    pub charm: f64,
    pub volga: f64,
    pub speed: f64,
    pub zomma: f64,
    pub color: f64,
    pub ultima: f64,
}

impl Greeks {
    /// Rounds every field to its presentation convention: price to 2
    /// decimals, every other field to 5.
    pub fn rounded(self) -> Self {
        Self {
            price: round_to(self.price, 2),
            delta: round_to(self.delta, 5),
            gamma: round_to(self.gamma, 5),
            theta: round_to(self.theta, 5),
            vega: round_to(self.vega, 5),
            rho: round_to(self.rho, 5),
            vanna: round_to(self.vanna, 5),
            charm: round_to(self.charm, 5),
            volga: round_to(self.volga, 5),
            speed: round_to(self.speed, 5),
            zomma: round_to(self.zomma, 5),
            color: round_to(self.color, 5),
            ultima: round_to(self.ultima, 5),
        }
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
