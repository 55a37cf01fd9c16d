// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Guarded vector math and the secant root finder

use nalgebra::{Point3, Vector3};

/// Threshold below which a vector is treated as degenerate
pub const DEGENERATE_EPSILON: f64 = 1e-9;

/// Threshold for coincident points
pub const POINT_EPSILON: f64 = 1e-6;

/// Sign as +1 / -1, with zero counted as positive
#[inline]
pub fn sign(value: f64) -> f64 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Normalize `v`, or return `fallback` (normalized) when `v` is degenerate
///
/// The flag reports whether the fallback was used.
#[inline]
pub fn normalize_or(v: &Vector3<f64>, fallback: &Vector3<f64>) -> (Vector3<f64>, bool) {
    let len = v.norm();
    if len > DEGENERATE_EPSILON && len.is_finite() {
        (v / len, false)
    } else {
        let fallback_len = fallback.norm();
        if fallback_len > DEGENERATE_EPSILON {
            (fallback / fallback_len, true)
        } else {
            (Vector3::y(), true)
        }
    }
}

/// Check whether two points coincide
#[inline]
pub fn coincident(a: &Point3<f64>, b: &Point3<f64>) -> bool {
    (a - b).norm() < POINT_EPSILON
}

/// Closest approach between the lines `p + t*d` and `q + s*e`
///
/// Returns `(t, s, distance)`; parallel lines pin `t` to zero.
pub fn closest_between_lines(
    p: &Point3<f64>,
    d: &Vector3<f64>,
    q: &Point3<f64>,
    e: &Vector3<f64>,
) -> (f64, f64, f64) {
    let r = p - q;
    let a = d.dot(d);
    let b = d.dot(e);
    let c = e.dot(e);
    let dd = d.dot(&r);
    let ee = e.dot(&r);
    let denom = a * c - b * b;

    let (t, s) = if denom.abs() < DEGENERATE_EPSILON {
        (0.0, if c > DEGENERATE_EPSILON { ee / c } else { 0.0 })
    } else {
        ((b * ee - c * dd) / denom, (a * ee - b * dd) / denom)
    };

    let distance = ((p + d * t) - (q + e * s)).norm();
    (t, s, distance)
}

/// Result of a bounded secant iteration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SecantOutcome {
    /// Best estimate found (lowest |residual|)
    pub root: f64,
    pub residual: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Find a root of `f` with the secant method, starting from `x0` and `x1`
///
/// Stops after `max_iterations` updates or when the secant stalls, returning
/// the best point seen so far.
pub fn secant_solve<F>(f: F, x0: f64, x1: f64, tolerance: f64, max_iterations: usize) -> SecantOutcome
where
    F: Fn(f64) -> f64,
{
    let mut a = x0;
    let mut fa = f(a);
    let mut b = x1;
    let mut fb = f(b);

    let mut best = if fa.abs() <= fb.abs() { (a, fa) } else { (b, fb) };
    if best.1.abs() <= tolerance {
        return SecantOutcome {
            root: best.0,
            residual: best.1,
            iterations: 0,
            converged: true,
        };
    }

    let mut iterations = 0;
    while iterations < max_iterations {
        let denom = fb - fa;
        if denom.abs() < DEGENERATE_EPSILON || !denom.is_finite() {
            break;
        }
        let next = b - fb * (b - a) / denom;
        iterations += 1;

        a = b;
        fa = fb;
        b = next;
        fb = f(b);

        if fb.abs() < best.1.abs() {
            best = (b, fb);
        }
        if fb.abs() <= tolerance {
            break;
        }
    }

    SecantOutcome {
        root: best.0,
        residual: best.1,
        iterations,
        converged: best.1.abs() <= tolerance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_secant_linear_one_step() {
        let outcome = secant_solve(|x| 2.0 * x - 1.0, 0.0, 0.05, 1e-9, 8);
        assert!(outcome.converged);
        assert_eq!(outcome.iterations, 1);
        assert_relative_eq!(outcome.root, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_secant_nonlinear() {
        let outcome = secant_solve(|x| x * x - 2.0, 1.0, 1.05, 1e-10, 8);
        assert!(outcome.converged);
        assert_relative_eq!(outcome.root, 2f64.sqrt(), epsilon = 1e-8);
    }

    #[test]
    fn test_secant_cap_returns_best_estimate() {
        let outcome = secant_solve(|x| x * x - 2.0, 1.0, 1.05, 1e-12, 1);
        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, 1);
        // Still better than both starting points
        assert!(outcome.residual.abs() < (1.05f64 * 1.05 - 2.0).abs());
    }

    #[test]
    fn test_secant_flat_function_stalls() {
        let outcome = secant_solve(|_| 1.0, 0.0, 1.0, 1e-6, 8);
        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.residual, 1.0);
    }

    #[test]
    fn test_normalize_fallback() {
        let (v, used) = normalize_or(&Vector3::zeros(), &Vector3::new(0.0, 0.0, 2.0));
        assert!(used);
        assert_relative_eq!(v, Vector3::z());

        let (v, used) = normalize_or(&Vector3::new(3.0, 0.0, 4.0), &Vector3::x());
        assert!(!used);
        assert_relative_eq!(v.norm(), 1.0);
    }

    #[test]
    fn test_closest_between_lines() {
        // Vertical line through (1, 0, 0) and the x axis raised to y = 2
        let (t, s, distance) = closest_between_lines(
            &Point3::new(0.0, 2.0, 0.0),
            &Vector3::x(),
            &Point3::new(1.0, 0.0, 0.0),
            &Vector3::y(),
        );
        assert_relative_eq!(t, 1.0, epsilon = 1e-12);
        assert_relative_eq!(s, 2.0, epsilon = 1e-12);
        assert_relative_eq!(distance, 0.0, epsilon = 1e-12);

        // Skew by one unit in z
        let (_, _, distance) = closest_between_lines(
            &Point3::new(0.0, 2.0, 0.0),
            &Vector3::x(),
            &Point3::new(1.0, 0.0, 1.0),
            &Vector3::y(),
        );
        assert_relative_eq!(distance, 1.0, epsilon = 1e-12);
    }
}
