/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! # Error Module
//!
//! Error types for the computation core. The core's
//! numeric components never throw: a degenerate input produces a
//! well-formed zero/empty result, sanitized at the component boundary.
//! Only the boundary adapters that validate caller-supplied snapshots —
//! [`chains::ChainError`] for OCC symbols and crossed quotes — return
//! `Result`.
//!
//! Internal, non-public error types (`surfaces::SmoothingError`,
//! `regression::RegressionError`) exist to let a fallible sub-step
//! (spline fit, ridge solve) short-circuit cleanly inside a component
//! that itself remains infallible from the outside.

pub mod chains;
pub(crate) mod regression;
pub(crate) mod surfaces;

pub use chains::ChainError;
