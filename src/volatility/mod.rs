/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! Model-free variance-swap implied volatility.

mod variance_swap;

pub use variance_swap::{
    compute_implied_volatility, compute_variance_swap_iv, ImpliedVolatilityResult,
    VarianceSwapResult,
};
