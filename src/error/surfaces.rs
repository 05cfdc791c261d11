/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

use thiserror::Error;

/// Internal failure modes of total-variance smoothing.
///
/// Never surfaced to a caller of `get_iv_surfaces`: when smoothing fails,
/// the surface falls back to its raw IV grid and the failure is logged
/// at `warn!` instead of propagated.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum SmoothingError {
    #[error("need at least 5 points with IV > 1.5% to fit a spline, got {found}")]
    InsufficientPoints { found: usize },

    #[error("natural cubic spline system is singular")]
    SingularSpline,
}
