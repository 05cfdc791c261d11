/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! OCC symbol parsing/generation and synthetic strike-chain construction.

pub mod generators;
pub mod occ;

pub use generators::{generate_chain_symbols, generate_strike_list};
pub use occ::{generate_occ_symbol, parse_occ_symbol, ParsedOccSymbol};
