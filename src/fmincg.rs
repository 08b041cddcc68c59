//! Nonlinear conjugate-gradient minimizer.
//!
//! `fmincg` minimizes a continuously differentiable multivariate function,
//! starting from a given point. Search directions follow the Polack-Ribiere
//! conjugate-gradient update; each outer iteration runs a line search using
//! quadratic and cubic polynomial approximations with the Wolfe-Powell stopping
//! conditions, and the slope-ratio method guesses the next initial step size.
//! Extrapolation is bounded so exploration cannot grow without limit.
//!
//! The algorithm is Carl Edward Rasmussen's `fmincg` (2001-2002), kept
//! heuristic-for-heuristic so its convergence behavior carries over.
//!
//! Design notes:
//! - All optimizer state (current point, gradients, direction, step size,
//!   bracket limit, evaluation counter) is local to the call; the function is a
//!   pure map from (cost function, initial vector, budget) to a result, plus an
//!   optional logging side channel.
//! - Numeric degeneracy inside the interpolation steps (NaN/infinite step
//!   proposals) is recovered by deterministic bisection, never surfaced as an
//!   error.
//! - A failed line search restores the pre-search point; two failures in a row
//!   end the run. The returned point is therefore always the best accepted one.

use ndarray::Array1;
use tracing::info;

use crate::CostFunction;

// Line-search constants. RHO and SIG are the Wolfe-Powell fractions; INT keeps
// re-evaluations away from bracket endpoints; EXT caps extrapolation; MAX
// bounds evaluations per line search; RATIO caps the slope-ratio step rescale.
const RHO: f64 = 0.01;
const SIG: f64 = 0.5;
const INT: f64 = 0.1;
const EXT: f64 = 3.0;
const MAX: i32 = 30;
const RATIO: f64 = 100.0;

// Smallest positive normalized double, guarding the slope-ratio division.
const REALMIN: f64 = 2.2251e-308;

/// Result of a minimization run.
#[derive(Debug, Clone)]
pub struct Minimization {
    /// The parameter vector at the last accepted line-search point (the
    /// initial vector if no line search ever succeeded).
    pub theta: Array1<f64>,
    /// Cost at each accepted line search, in order. Non-increasing.
    pub costs: Vec<f64>,
}

/// Minimize `f` starting from `initial`.
///
/// The sign of `length` selects the budget's unit: positive counts line
/// searches, negative counts individual cost evaluations (its absolute value).
/// `verbose` logs the running iteration count and cost after each accepted line
/// search; it has no effect on the numbers.
///
/// Panics if `length` is zero.
pub fn fmincg<F: CostFunction>(
    f: &F,
    initial: Array1<f64>,
    length: i32,
    verbose: bool,
) -> Minimization {
    assert!(length != 0, "iteration budget must be nonzero");

    let mut x = initial;
    let mut costs = Vec::new();

    let mut i: i32 = 0;
    let red = 1.0;
    let mut ls_failed = false;

    let (mut f1, mut df1) = f.evaluate_cost(&x);
    if length < 0 {
        i += 1;
    }

    // Steepest descent to start.
    let mut s = -&df1;
    let mut d1 = -s.dot(&s);
    let mut z1 = red / (1.0 - d1);

    while i < length.abs() {
        if length > 0 {
            i += 1;
        }

        // Copy the current values so a failed line search can restore them.
        let x0 = x.clone();
        let f0 = f1;
        let df0 = df1.clone();

        x.scaled_add(z1, &s);
        let (nf2, ndf2) = f.evaluate_cost(&x);
        let mut f2 = nf2;
        let mut df2 = ndf2;
        if length < 0 {
            i += 1;
        }

        let mut d2 = df2.dot(&s);
        // Point 3 starts equal to point 1.
        let mut f3 = f1;
        let mut d3 = d1;
        let mut z3 = -z1;

        let mut m = if length > 0 { MAX } else { MAX.min(-length - i) };
        let mut success = false;
        let mut limit = -1.0;

        loop {
            // Bracketing: tighten while sufficient decrease or the curvature
            // condition fails and evaluations remain.
            while ((f2 > f1 + z1 * RHO * d1) || (d2 > -SIG * d1)) && m > 0 {
                limit = z1;
                let mut z2 = if f2 > f1 {
                    // Quadratic fit through the two most recent points.
                    z3 - (0.5 * d3 * z3 * z3) / (d3 * z3 + f2 - f3)
                } else {
                    // Cubic fit.
                    let a = 6.0 * (f2 - f3) / z3 + 3.0 * (d2 + d3);
                    let b = 3.0 * (f3 - f2) - z3 * (d3 + 2.0 * d2);
                    ((b * b - a * d2 * z3 * z3).sqrt() - b) / a
                };
                if z2.is_nan() || z2.is_infinite() {
                    // Numerical problem: bisect.
                    z2 = z3 / 2.0;
                }
                // Stay clear of the bracket endpoints.
                z2 = z2.min(INT * z3).max((1.0 - INT) * z3);
                z1 += z2;
                x.scaled_add(z2, &s);
                let (nf2, ndf2) = f.evaluate_cost(&x);
                f2 = nf2;
                df2 = ndf2;
                m -= 1;
                if length < 0 {
                    i += 1;
                }
                d2 = df2.dot(&s);
                // z3 is now relative to the location of z2.
                z3 -= z2;
            }

            if f2 > f1 + z1 * RHO * d1 || d2 > -SIG * d1 {
                break; // failure
            } else if d2 > SIG * d1 {
                success = true;
                break;
            } else if m == 0 {
                break; // failure
            }

            // Cubic extrapolation toward a larger step.
            let a = 6.0 * (f2 - f3) / z3 + 3.0 * (d2 + d3);
            let b = 3.0 * (f3 - f2) - z3 * (d3 + 2.0 * d2);
            let mut z2 = -d2 * z3 * z3 / (b + (b * b - a * d2 * z3 * z3).sqrt());
            if z2.is_nan() || z2.is_infinite() || z2 < 0.0 {
                // Numeric problem or wrong sign.
                if limit < -0.5 {
                    z2 = z1 * (EXT - 1.0); // no known limit: extrapolate the maximum amount
                } else {
                    z2 = (limit - z1) / 2.0; // otherwise bisect
                }
            } else if limit > -0.5 && z2 + z1 > limit {
                // Extrapolation beyond the known limit: bisect.
                z2 = (limit - z1) / 2.0;
            } else if limit < -0.5 && z2 + z1 > z1 * EXT {
                // Beyond the extrapolation cap.
                z2 = z1 * (EXT - 1.0);
            } else if z2 < -z3 * INT {
                z2 = -z3 * INT;
            } else if limit > -0.5 && z2 < (limit - z1) * (1.0 - INT) {
                // Too close to the limit.
                z2 = (limit - z1) * (1.0 - INT);
            }

            // Point 3 becomes point 2.
            f3 = f2;
            d3 = d2;
            z3 = -z2;
            z1 += z2;
            x.scaled_add(z2, &s);
            let (nf2, ndf2) = f.evaluate_cost(&x);
            f2 = nf2;
            df2 = ndf2;
            m -= 1;
            if length < 0 {
                i += 1;
            }
            d2 = df2.dot(&s);
        }

        if success {
            f1 = f2;
            costs.push(f1);
            if verbose {
                info!(iteration = i, cost = f1, "line search accepted");
            }
            // Polack-Ribiere direction: s = (df2'df2 - df1'df2)/(df1'df1) * s - df2.
            let pr = (df2.dot(&df2) - df1.dot(&df2)) / df1.dot(&df1);
            s = s * pr - &df2;
            std::mem::swap(&mut df1, &mut df2);
            d2 = df1.dot(&s);
            if d2 > 0.0 {
                // The new slope must be negative; fall back to steepest descent.
                s = -&df1;
                d2 = -s.dot(&s);
            }
            // Slope-ratio rescale of the step, capped at RATIO.
            z1 *= RATIO.min(d1 / (d2 - REALMIN));
            d1 = d2;
            ls_failed = false;
        } else {
            // Restore the point from before the failed line search.
            x = x0;
            f1 = f0;
            df1 = df0;
            // Give up after two consecutive failures or an exhausted budget.
            if ls_failed || i > length.abs() {
                break;
            }
            std::mem::swap(&mut df1, &mut df2);
            s = -&df1;
            d1 = -s.dot(&s);
            z1 = 1.0 / (1.0 - d1);
            ls_failed = true;
        }
    }

    Minimization { theta: x, costs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// f(v) = v'v with gradient 2v; minimum at the origin.
    struct Quadratic;

    impl CostFunction for Quadratic {
        fn evaluate_cost(&self, theta: &Array1<f64>) -> (f64, Array1<f64>) {
            (theta.dot(theta), theta * 2.0)
        }
    }

    /// Flat everywhere: no line search can ever succeed.
    struct Constant;

    impl CostFunction for Constant {
        fn evaluate_cost(&self, theta: &Array1<f64>) -> (f64, Array1<f64>) {
            (4.0, Array1::zeros(theta.len()))
        }
    }

    #[test]
    fn converges_on_convex_quadratic() {
        let start = array![1.5, -2.0, 0.5];
        let initial_cost = start.dot(&start);

        let result = fmincg(&Quadratic, start, 100, false);
        let norm = result.theta.dot(&result.theta).sqrt();
        assert!(norm < 1e-6, "did not converge, |theta| = {norm}");

        assert!(!result.costs.is_empty());
        assert!(result.costs[0] <= initial_cost);
        assert!(
            result.costs.windows(2).all(|w| w[1] <= w[0]),
            "accepted costs must be non-increasing: {:?}",
            result.costs
        );
    }

    #[test]
    fn evaluation_budget_mode_also_descends() {
        let start = array![3.0, 1.0, -0.5, 2.0];
        let initial_cost = start.dot(&start);

        let result = fmincg(&Quadratic, start, -50, false);
        let (final_cost, _) = Quadratic.evaluate_cost(&result.theta);
        assert!(final_cost < initial_cost);
        assert!(result.costs.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn returns_initial_point_when_nothing_improves() {
        let start = array![1.0, -1.0];
        let result = fmincg(&Constant, start.clone(), 20, false);
        assert_eq!(result.theta, start);
        assert!(result.costs.is_empty());
    }

    #[test]
    #[should_panic]
    fn zero_budget_is_rejected() {
        fmincg(&Quadratic, array![1.0], 0, false);
    }
}
