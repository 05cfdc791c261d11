/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! Standard-normal CDF/PDF approximations.
//!
//! The pricer needs these in the hot path of every Greek, for every
//! strike of every expiration, so they are hand-rolled polynomial
//! approximations rather than a general distributions crate: the
//! Abramowitz-Stegun formula below is within 7.5e-8 of the true CDF for
//! |x| <= 6, which is the only accuracy the pipeline ever asks for.

use std::f64::consts::PI;

/// Cumulative standard-normal distribution function, Abramowitz-Stegun 26.2.17.
///
/// Accuracy target: |result - true CDF| < 7.5e-8 for |x| <= 6.
pub fn cumulative_normal_distribution(x: f64) -> f64 {
    let t = 1.0 / (1.0 + 0.231_641_9 * x.abs());
    let d = 0.398_942_3 * (-x * x / 2.0).exp();
    let poly = t
        * (0.319_381_5
            + t * (-0.356_563_8
                + t * (1.781_478 + t * (-1.821_256 + 1.330_274 * t))));
    let tail = 1.0 - d * poly;
    if x > 0.0 { tail } else { 1.0 - tail }
}

/// Standard-normal probability density function.
pub fn normal_pdf(x: f64) -> f64 {
    (-x * x / 2.0).exp() / (2.0 * PI).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn matches_known_quantiles() {
        assert_relative_eq!(cumulative_normal_distribution(0.0), 0.5, epsilon = 1e-8);
        assert_relative_eq!(cumulative_normal_distribution(1.96), 0.975, epsilon = 1e-4);
        assert_relative_eq!(cumulative_normal_distribution(-1.96), 0.025, epsilon = 1e-4);
    }

    #[test]
    fn symmetric_around_origin() {
        for x in [0.1, 0.5, 1.0, 2.5, 5.9] {
            let sum = cumulative_normal_distribution(x) + cumulative_normal_distribution(-x);
            assert_relative_eq!(sum, 1.0, epsilon = 1e-7);
        }
    }

    #[test]
    fn pdf_peaks_at_zero() {
        assert!(normal_pdf(0.0) > normal_pdf(0.5));
        assert!(normal_pdf(0.5) > normal_pdf(1.0));
    }
}
