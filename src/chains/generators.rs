/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! Synthetic strike-list and OCC-symbol generation, mainly useful for tests
//! and for building a chain skeleton to normalize live quotes into.

use crate::chains::occ::generate_occ_symbol;
use crate::model::OptionType;
use chrono::NaiveDate;

/// Builds a strike ladder of `num_strikes_each_side * 2 + 1` strikes spaced
/// by `increment`, centered on the increment-aligned strike nearest spot
/// (`floor(spot / increment) * increment`).
pub fn generate_strike_list(spot: f64, increment: f64, num_strikes_each_side: usize) -> Vec<f64> {
    if increment <= 0.0 || spot <= 0.0 {
        return Vec::new();
    }
    let center = (spot / increment).floor() * increment;
    let n = num_strikes_each_side as i64;
    (-n..=n)
        .map(|i| center + i as f64 * increment)
        .filter(|&k| k > 0.0)
        .collect()
}

/// Generates one canonical OCC symbol per (strike, option type) combination
/// over `strikes`.
pub fn generate_chain_symbols(root: &str, expiration: NaiveDate, strikes: &[f64]) -> Vec<String> {
    strikes
        .iter()
        .flat_map(|&k| {
            [
                generate_occ_symbol(root, expiration, OptionType::Call, k, true),
                generate_occ_symbol(root, expiration, OptionType::Put, k, true),
            ]
        })
        .collect()
}
