/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! OCC option-symbol parsing and generation.
//!
//! The canonical OCC symbol is `ROOT` (left-justified, space-padded to six
//! characters) followed by a `YYMMDD` expiration, a single `C`/`P` tag, and
//! an eight-digit strike in thousandths of a dollar. Feeds that strip the
//! padding (a "compact" form, root run together with the date) are accepted
//! too: parsing anchors on the fixed nine-character `[C|P]\d{8}` suffix and
//! takes everything before the six date digits as the root, padding or not.
//! Generation emits either form on request.

use crate::error::ChainError;
use crate::model::OptionType;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOccSymbol {
    pub root: String,
    pub expiration: NaiveDate,
    pub option_type: OptionType,
    pub strike: f64,
}

/// Parses a full OCC symbol, accepting both the padded and compact root forms.
pub fn parse_occ_symbol(symbol: &str) -> Result<ParsedOccSymbol, ChainError> {
    if symbol.len() < 15 {
        return Err(ChainError::MissingOccSuffix { symbol: symbol.to_string() });
    }

    let suffix_start = symbol.len() - 9;
    let suffix = &symbol[suffix_start..];
    let cp_char = suffix.chars().next().unwrap();
    let strike_digits = &suffix[1..9];

    if !strike_digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ChainError::MissingOccSuffix { symbol: symbol.to_string() });
    }
    let option_type = OptionType::from_occ_char(cp_char).ok_or_else(|| ChainError::MissingOccSuffix {
        symbol: symbol.to_string(),
    })?;

    let date_start = suffix_start - 6;
    let date_str = &symbol[date_start..suffix_start];
    let expiration = NaiveDate::parse_from_str(date_str, "%y%m%d").map_err(|_| ChainError::InvalidOccDate {
        symbol: symbol.to_string(),
        date: date_str.to_string(),
    })?;

    let root = symbol[..date_start].trim_end().to_string();
    if root.is_empty() {
        return Err(ChainError::EmptyRoot { symbol: symbol.to_string() });
    }

    let strike: f64 = strike_digits.parse::<i64>().unwrap() as f64 / 1000.0;

    Ok(ParsedOccSymbol {
        root,
        expiration,
        option_type,
        strike,
    })
}

/// Generates an OCC symbol. `padded` selects the canonical six-character,
/// space-padded root form; `false` emits the compact, unpadded root instead.
pub fn generate_occ_symbol(root: &str, expiration: NaiveDate, option_type: OptionType, strike: f64, padded: bool) -> String {
    let strike_thousandths = (strike * 1_000.0).round() as i64;
    let root = root.to_uppercase();
    let root_field = if padded { format!("{root:<6}") } else { root };
    format!(
        "{}{}{}{:08}",
        root_field,
        expiration.format("%y%m%d"),
        option_type.occ_char(),
        strike_thousandths
    )
}
