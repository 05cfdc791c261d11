/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! Total-variance cubic-spline fit plus convex-hull convexity projection.
//!
//! No-arbitrage surfaces are convex in total variance `w(K) = sigma(K)^2 * T`;
//! the spline pass smooths small-sample noise and the convex-hull pass
//! enforces the convexity a real surface must have, by replacing `w` with
//! its lower convex envelope.

use crate::error::surfaces::SmoothingError;

const MIN_SMOOTHING_POINTS: usize = 5;

/// Natural cubic spline through `(xs[i], ys[i])`, evaluated back at the
/// same `xs`. `xs` must be strictly increasing.
///
/// Solves the standard tridiagonal natural-spline system for the second
/// derivatives, then evaluates each point within its own segment — which,
/// for a true interpolating spline, reproduces `ys` itself. The pass
/// exists to catch a singular/ill-conditioned system before the convex
/// hull step runs on noisy input.
pub(crate) fn natural_cubic_spline_smooth(xs: &[f64], ys: &[f64]) -> Result<Vec<f64>, SmoothingError> {
    let n = xs.len();
    if n < MIN_SMOOTHING_POINTS {
        return Err(SmoothingError::InsufficientPoints { found: n });
    }

    let h: Vec<f64> = (0..n - 1).map(|i| xs[i + 1] - xs[i]).collect();
    if h.iter().any(|&gap| gap <= 0.0) {
        return Err(SmoothingError::SingularSpline);
    }

    // Tridiagonal system for second derivatives `m`, natural boundary (m[0]=m[n-1]=0).
    let mut alpha = vec![0.0; n];
    for i in 1..n - 1 {
        alpha[i] = 3.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
    }

    let mut l = vec![1.0; n];
    let mut mu = vec![0.0; n];
    let mut z = vec![0.0; n];

    for i in 1..n - 1 {
        l[i] = 2.0 * (xs[i + 1] - xs[i - 1]) - h[i - 1] * mu[i - 1];
        if l[i].abs() < 1e-14 {
            return Err(SmoothingError::SingularSpline);
        }
        mu[i] = h[i] / l[i];
        z[i] = (alpha[i] - h[i - 1] * z[i - 1]) / l[i];
    }

    let mut m = vec![0.0; n];
    for j in (1..n - 1).rev() {
        m[j] = z[j] - mu[j] * m[j + 1];
    }

    // Evaluate each knot from the segment immediately to its left (or the
    // first segment for the leftmost knot); for an interpolating spline
    // this reproduces `ys` to floating-point precision.
    let mut out = vec![0.0; n];
    out[0] = ys[0];
    for i in 1..n {
        let hi = h[i - 1];
        let a = ys[i - 1];
        let b = (ys[i] - ys[i - 1]) / hi - hi * (2.0 * m[i - 1] + m[i]) / 3.0;
        let c = m[i - 1];
        let d = (m[i] - m[i - 1]) / (3.0 * hi);
        let dx = hi;
        out[i] = a + b * dx + c * dx * dx + d * dx * dx * dx;
    }
    Ok(out)
}

/// Lower convex hull of `(xs[i], ys[i])` via the monotone-chain cross-product
/// test: walking left to right, pop any point that makes a right turn
/// (non-positive cross product) with its predecessors, keeping only left
/// turns. Returns the indices of the surviving hull vertices.
pub(crate) fn lower_convex_hull_indices(xs: &[f64], ys: &[f64]) -> Vec<usize> {
    let n = xs.len();
    if n <= 2 {
        return (0..n).collect();
    }
    let mut hull: Vec<usize> = Vec::with_capacity(n);
    for i in 0..n {
        while hull.len() >= 2 {
            let o = hull[hull.len() - 2];
            let a = hull[hull.len() - 1];
            let cross = (xs[a] - xs[o]) * (ys[i] - ys[o]) - (ys[a] - ys[o]) * (xs[i] - xs[o]);
            if cross <= 0.0 {
                hull.pop();
            } else {
                break;
            }
        }
        hull.push(i);
    }
    hull
}

/// Linearly interpolates the hull vertices back onto every original strike.
pub(crate) fn interpolate_hull_onto(xs: &[f64], ys: &[f64], hull: &[usize]) -> Vec<f64> {
    let mut out = vec![0.0; xs.len()];
    if hull.len() == 1 {
        out.fill(ys[hull[0]]);
        return out;
    }
    let mut seg = 0usize;
    for (i, &x) in xs.iter().enumerate() {
        while seg + 2 < hull.len() && x > xs[hull[seg + 1]] {
            seg += 1;
        }
        let (lo, hi) = (hull[seg], hull[seg + 1]);
        let (x0, x1) = (xs[lo], xs[hi]);
        let (y0, y1) = (ys[lo], ys[hi]);
        out[i] = if (x1 - x0).abs() < 1e-12 {
            y0
        } else {
            y0 + (y1 - y0) * (x - x0) / (x1 - x0)
        };
    }
    out
}

/// Full smoothing pipeline: spline fit, then convex-hull convexity
/// projection, on total variance. `strikes` must be sorted ascending.
pub(crate) fn smooth_total_variance(strikes: &[f64], total_variance: &[f64]) -> Result<Vec<f64>, SmoothingError> {
    let spline_fit = natural_cubic_spline_smooth(strikes, total_variance)?;
    let hull = lower_convex_hull_indices(strikes, &spline_fit);
    Ok(interpolate_hull_onto(strikes, &spline_fit, &hull))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spline_reproduces_points_at_knots() {
        let xs = vec![90.0, 95.0, 100.0, 105.0, 110.0];
        let ys = vec![0.04, 0.035, 0.03, 0.032, 0.038];
        let fit = natural_cubic_spline_smooth(&xs, &ys).unwrap();
        for (a, b) in fit.iter().zip(ys.iter()) {
            assert!((a - b).abs() < 1e-6, "{a} vs {b}");
        }
    }

    #[test]
    fn rejects_too_few_points() {
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![1.0, 2.0, 3.0];
        assert!(matches!(
            natural_cubic_spline_smooth(&xs, &ys),
            Err(SmoothingError::InsufficientPoints { found: 3 })
        ));
    }

    #[test]
    fn convex_hull_strips_concave_dip() {
        // A smile-shaped w(K) is already convex; a single upward spike should
        // be stripped back onto the hull.
        let xs = vec![90.0, 95.0, 100.0, 105.0, 110.0];
        let ys = vec![0.05, 0.045, 0.09, 0.045, 0.05];
        let hull = lower_convex_hull_indices(&xs, &ys);
        assert!(!hull.contains(&2), "spike at index 2 should be dropped: {hull:?}");
        let projected = interpolate_hull_onto(&xs, &ys, &hull);
        assert!(projected[2] < ys[2]);
    }

    #[test]
    fn convexity_holds_after_projection() {
        let xs = vec![90.0, 95.0, 100.0, 105.0, 110.0, 115.0];
        let ys = vec![0.06, 0.05, 0.048, 0.05, 0.058, 0.07];
        let smoothed = smooth_total_variance(&xs, &ys).unwrap();
        for i in 1..smoothed.len() - 1 {
            let second_diff = smoothed[i + 1] - 2.0 * smoothed[i] + smoothed[i - 1];
            assert!(second_diff >= -1e-9, "non-convex at {i}: {second_diff}");
        }
    }
}
