/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed sum type for the two option styles the pipeline understands.
///
/// Represented as a tag rather than via inheritance or a trait object,
/// per the small, closed cardinality of the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Single-character OCC tag (`C`/`P`).
    pub fn occ_char(&self) -> char {
        match self {
            OptionType::Call => 'C',
            OptionType::Put => 'P',
        }
    }

    pub fn from_occ_char(c: char) -> Option<Self> {
        match c {
            'C' | 'c' => Some(OptionType::Call),
            'P' | 'p' => Some(OptionType::Put),
            _ => None,
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self, OptionType::Call)
    }

    pub fn is_put(&self) -> bool {
        matches!(self, OptionType::Put)
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}
