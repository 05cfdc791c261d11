#![allow(unknown_lints)]

//! # dealer-flow
//!
//! Computes dealer positioning analytics from a live options chain: Greeks,
//! implied volatility (both per-option and the CBOE model-free variance-swap
//! estimate), smoothed IV surfaces, per-strike gamma/vanna/charm exposure,
//! the volatility regime implied by the surface's local skew and curvature,
//! a kernel-smoothed hedge-impulse curve, the pressure-cloud zones and
//! futures hedge sizing derived from it, the charm-decay time walk, and a
//! ridge-regularized vol-response z-score.
//!
//! ## Core Modules

/// * `boundary` - The `QuoteSource` seam a broker/REST adapter would
///   implement; mockable via `mockall` so the core's entry points can be
///   exercised in tests without a live feed.
pub mod boundary;

/// * `chains` - OCC symbol parsing/generation and synthetic strike-chain
///   construction.
///
/// Turns a raw option identifier into its root, expiration, type, and
/// strike, and the other way around; also builds synthetic strike ladders
/// for tests and chain skeletons.
pub mod chains;

/// * `charm_integral` - Forward projection of aggregate charm decay.
///
/// Walks an expiration's total charm exposure across discrete time buckets
/// between now and expiry, attributing the decay to the strikes that drive it.
pub mod charm_integral;

/// * `constants` - Calendar, search, and tolerance constants shared across
///   the pricing and analytics modules.
pub mod constants;

/// * `error` - Typed error enums for the core's few genuinely fallible
///   operations: OCC parsing, quote validation, and internal numeric
///   sub-steps (spline fit, ridge solve).
pub mod error;

/// * `exposure` - Per-strike dealer gamma/vanna/charm exposure, in three
///   variants (canonical open-interest, IV/DTE-state-weighted, and
///   live-flow-delta-weighted).
pub mod exposure;

/// * `hedge_impulse` - Kernel-smoothed hedge-impulse curve combining
///   per-strike gamma and vanna exposure with the spot-vol coupling implied
///   by the local skew of the IV surface.
pub mod hedge_impulse;

/// * `model` - Core data structures: Black-Scholes parameters, the Greeks
///   vector, normalized option quotes, and the option chain they live in.
pub mod model;

/// * `pressure_cloud` - Stability and acceleration price zones, regime
///   edges, and per-instrument futures hedge sizing derived from a
///   hedge-impulse curve.
pub mod pressure_cloud;

/// * `pricing` - Black-Scholes-Merton pricing, the full Greeks vector, and
///   bisection-based implied-volatility inversion.
pub mod pricing;

/// * `regime` - Volatility-regime classification and expected daily
///   move/vol-of-vol derived from an IV surface's local skew and curvature
///   at spot.
pub mod regime;

/// * `statistics` - The standard-normal CDF and PDF the pricing and
///   exposure modules are built on.
pub mod statistics;

/// * `surfaces` - Implied-volatility surface construction per (expiration,
///   option type), plus total-variance cubic-spline and convex-hull
///   smoothing.
pub mod surfaces;

/// * `utils` - Cross-cutting helpers; currently just `tracing` subscriber
///   setup.
pub mod utils;

/// * `vol_response` - Ridge-stabilized OLS regression of implied-vol change
///   against price action and realized vol, scored into a rich/cheap
///   z-score signal.
pub mod vol_response;

/// * `volatility` - CBOE model-free variance-swap implied volatility and
///   its two-term maturity interpolation.
pub mod volatility;

pub use error::ChainError;
pub use model::{BsParams, Greeks, NormalizedOption, OptionChain, OptionType};
