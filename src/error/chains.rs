/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

use thiserror::Error;

/// Errors raised at the boundary of the core: malformed OCC symbols and
/// quote snapshots that violate the normalized-quote invariants.
///
/// This is the one place the core throws rather than sanitizing to zero,
/// because a parse failure means the caller handed us a string that isn't
/// an option identifier at all.
#[derive(Debug, Error, PartialEq)]
pub enum ChainError {
    #[error("OCC symbol '{symbol}' does not end in the expected /[CP]\\d{{8}}$/ suffix")]
    MissingOccSuffix { symbol: String },

    #[error("OCC symbol '{symbol}' has a malformed date component '{date}'")]
    InvalidOccDate { symbol: String, date: String },

    #[error("OCC symbol '{symbol}' has an empty root")]
    EmptyRoot { symbol: String },

    #[error("quote {occ_symbol} is crossed: bid {bid} > ask {ask}")]
    CrossedMarket {
        occ_symbol: String,
        bid: f64,
        ask: f64,
    },
}
