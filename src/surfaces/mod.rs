/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! Implied-volatility surface construction and smoothing.

mod iv_surface;
pub(crate) mod smoothing;

pub use iv_surface::{get_iv_for_strike, get_iv_surfaces, IvSurface, SmoothingModel, VolModel};
