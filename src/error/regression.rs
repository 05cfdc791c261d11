/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

use thiserror::Error;

/// Failure modes of the ridge-stabilized OLS fit.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum RegressionError {
    #[error("pivot magnitude {magnitude} below singularity threshold at row {row}")]
    SingularSystem { row: usize, magnitude: f64 },
}
