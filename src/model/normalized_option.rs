/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

use crate::error::chains::ChainError;
use crate::model::option_type::OptionType;
use serde::{Deserialize, Serialize};

/// A single normalized option quote, as produced by the excluded
/// broker/REST boundary layer.
///
/// This is the seam between the excluded collaborators (streaming
/// clients, REST fetchers, symbol adapters) and the pure core: every
/// core entry point consumes a `Vec<NormalizedOption>` wrapped in an
/// [`OptionChain`], never a raw feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedOption {
    pub occ_symbol: String,
    pub underlying: String,
    pub strike: f64,
    /// ISO-8601 expiration date, e.g. `"2025-01-17"`.
    pub expiration: String,
    /// Expiration instant, milliseconds since epoch. Must agree with `expiration`.
    pub expiration_timestamp: i64,
    pub option_type: OptionType,
    pub bid: f64,
    pub bid_size: u64,
    pub ask: f64,
    pub ask_size: u64,
    pub mark: f64,
    pub last: f64,
    pub volume: u64,
    pub open_interest: f64,
    pub live_open_interest: Option<f64>,
    /// Decimal implied volatility (0.20 = 20%), as carried by the quote source.
    pub implied_volatility: f64,
    pub timestamp: i64,
    pub greeks: Option<crate::model::greeks::Greeks>,
}

impl NormalizedOption {
    /// Validates the invariant (`bid <= ask` when both positive)
    /// before handing the quote to the core. This is the one constructor
    /// path allowed to fail; everything downstream treats the quote as
    /// trusted.
    pub fn validated(self) -> Result<Self, ChainError> {
        if self.bid > 0.0 && self.ask > 0.0 && self.bid > self.ask {
            return Err(ChainError::CrossedMarket {
                occ_symbol: self.occ_symbol,
                bid: self.bid,
                ask: self.ask,
            });
        }
        Ok(self)
    }

    pub fn mid(&self) -> f64 {
        if self.bid > 0.0 && self.ask > 0.0 {
            (self.bid + self.ask) / 2.0
        } else {
            0.0
        }
    }

    /// Sanitized position delta for the flow-delta exposure variant:
    /// `live_open_interest - open_interest`, or `None` if live open
    /// interest was never supplied.
    pub fn flow_delta(&self) -> Option<f64> {
        self.live_open_interest.map(|live| live - self.open_interest)
    }
}

/// A snapshot of one underlying's option market, the unit of work every
/// core entry point consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChain {
    pub underlying: String,
    pub spot: f64,
    pub risk_free_rate: f64,
    pub dividend_yield: f64,
    pub options: Vec<NormalizedOption>,
}

impl OptionChain {
    pub fn new(
        underlying: impl Into<String>,
        spot: f64,
        risk_free_rate: f64,
        dividend_yield: f64,
        options: Vec<NormalizedOption>,
    ) -> Self {
        Self {
            underlying: underlying.into(),
            spot,
            risk_free_rate,
            dividend_yield,
            options,
        }
    }

    /// Distinct expiration timestamps present in the chain, in first-seen order.
    pub fn expirations(&self) -> Vec<i64> {
        let mut seen = Vec::new();
        for opt in &self.options {
            if !seen.contains(&opt.expiration_timestamp) {
                seen.push(opt.expiration_timestamp);
            }
        }
        seen
    }

    pub fn options_for_expiration(&self, expiration_timestamp: i64) -> Vec<&NormalizedOption> {
        self.options
            .iter()
            .filter(|o| o.expiration_timestamp == expiration_timestamp)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(bid: f64, ask: f64) -> NormalizedOption {
        NormalizedOption {
            occ_symbol: "QQQ250117C00520000".to_string(),
            underlying: "QQQ".to_string(),
            strike: 520.0,
            expiration: "2025-01-17".to_string(),
            expiration_timestamp: 1_737_072_000_000,
            option_type: OptionType::Call,
            bid,
            bid_size: 1,
            ask,
            ask_size: 1,
            mark: (bid + ask) / 2.0,
            last: 0.0,
            volume: 0,
            open_interest: 0.0,
            live_open_interest: None,
            implied_volatility: 0.2,
            timestamp: 0,
            greeks: None,
        }
    }

    #[test]
    fn rejects_crossed_market() {
        assert!(sample(5.0, 4.0).validated().is_err());
    }

    #[test]
    fn accepts_normal_market() {
        assert!(sample(4.0, 5.0).validated().is_ok());
    }

    #[test]
    fn zero_quotes_are_not_crossed() {
        assert!(sample(0.0, 0.0).validated().is_ok());
    }

    #[test]
    fn flow_delta_absent_without_live_oi() {
        assert_eq!(sample(1.0, 2.0).flow_delta(), None);
    }
}
