/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! Library-wide numeric and calendar constants.

/// Milliseconds in a 365-day year, used to annualize ms-denominated durations.
pub const MS_PER_YEAR: f64 = 31_536_000_000.0;

/// Milliseconds in a calendar day.
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Trading/calendar days assumed per year throughout the pipeline.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Minutes in one regular equity trading session, used only to scale
/// charm-integral buckets (see `charm_integral`).
pub const MINUTES_PER_DAY_SESSION: f64 = 390.0;

/// Lower bound of the implied-volatility bisection search space (decimal).
pub const IV_SEARCH_FLOOR: f64 = 1.0e-4;

/// Upper bound of the implied-volatility bisection search space (decimal).
pub const IV_SEARCH_CEILING: f64 = 5.0;

/// Convergence tolerance for the implied-volatility bisection, in price units.
pub const IV_PRICE_TOLERANCE: f64 = 1.0e-6;

/// Maximum number of bisection iterations before giving up.
pub const IV_MAX_ITERATIONS: u32 = 100;

/// Floor IV (percent) returned when a quoted price is at or below intrinsic value.
pub const IV_DEEP_ITM_FLOOR_PCT: f64 = 1.0;

/// Epsilon below which a floating-point value is treated as zero for sign/degeneracy checks.
pub const ZERO: f64 = 0.0;
