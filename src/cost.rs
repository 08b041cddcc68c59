//! The backpropagation cost function.
//!
//! [`BackpropCost`] is what the optimizer actually minimizes: a pure function
//! from a flat parameter vector to a scalar cost and its gradient. Each
//! evaluation is self-contained (one forward pass, one backward pass, no state
//! carried between calls), so evaluations are freely reorderable and reentrant.
//!
//! The cost is the mean binary cross-entropy between the hypothesis and the
//! labels, plus an L2 penalty on all non-bias weights scaled by
//! `lambda / (2 * m)`. Labels are expected to be drawn from {0, 1}; this is a
//! precondition of the model, not something checked numerically here.

use ndarray::{s, Array1, Array2};

use crate::forward;
use crate::params::flatten_matrices;
use crate::{Error, Result, Topology, WeightSet};

/// The capability the optimizer minimizes over.
///
/// The returned gradient must have the same length as `theta`. Implementations
/// must be pure: two calls with the same vector return the same pair.
pub trait CostFunction {
    fn evaluate_cost(&self, theta: &Array1<f64>) -> (f64, Array1<f64>);
}

/// Regularized backpropagation cost over a fixed training set.
///
/// Borrows its inputs for the duration of one training run; nothing is
/// retained afterwards.
#[derive(Debug, Clone, Copy)]
pub struct BackpropCost<'a> {
    x: &'a Array2<f64>,
    y: &'a Array2<f64>,
    topology: &'a Topology,
    lambda: f64,
}

impl<'a> BackpropCost<'a> {
    /// Close over a training set, a topology, and a regularization strength.
    ///
    /// Returns `ShapeMismatch` if `x`/`y` column counts disagree with the
    /// topology's input/output dimensions, and `InvalidData` if their row
    /// counts differ or are zero.
    pub fn new(
        x: &'a Array2<f64>,
        y: &'a Array2<f64>,
        topology: &'a Topology,
        lambda: f64,
    ) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(Error::InvalidData(
                "training set must not be empty".to_owned(),
            ));
        }
        if x.nrows() != y.nrows() {
            return Err(Error::InvalidData(format!(
                "x has {} rows, y has {} rows",
                x.nrows(),
                y.nrows()
            )));
        }
        if x.ncols() != topology.input_dim() {
            return Err(Error::ShapeMismatch(format!(
                "x has {} columns, topology input dim is {}",
                x.ncols(),
                topology.input_dim()
            )));
        }
        if y.ncols() != topology.output_dim() {
            return Err(Error::ShapeMismatch(format!(
                "y has {} columns, topology output dim is {}",
                y.ncols(),
                topology.output_dim()
            )));
        }
        if !(lambda.is_finite() && lambda >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "lambda must be finite and >= 0, got {lambda}"
            )));
        }
        Ok(Self {
            x,
            y,
            topology,
            lambda,
        })
    }
}

impl CostFunction for BackpropCost<'_> {
    /// One forward pass for the cost, one backward pass for the gradient.
    ///
    /// Panics if `theta` does not hold exactly `topology.num_params()`
    /// elements; the optimizer only ever produces vectors of the right length.
    fn evaluate_cost(&self, theta: &Array1<f64>) -> (f64, Array1<f64>) {
        assert_eq!(
            theta.len(),
            self.topology.num_params(),
            "parameter vector has {} elements, topology implies {}",
            theta.len(),
            self.topology.num_params()
        );

        let weights =
            WeightSet::unflatten(theta, self.topology).expect("theta length was just checked");
        let m = self.x.nrows() as f64;

        let acts = forward::activations(&weights, self.x);
        let h = forward::output_layer(&weights, acts.last().expect("at least one activation"));

        // Mean cross-entropy over examples: sum(-y.*ln(h) - (1-y).*ln(1-h)) / m.
        let log_h = h.mapv(f64::ln);
        let log_1h = h.mapv(|v| (1.0 - v).ln());
        let data_cost = -((self.y * &log_h) + (self.y.mapv(|v| 1.0 - v) * &log_1h)).sum() / m;

        // L2 penalty on everything except the bias columns.
        let mut penalty = 0.0;
        if self.lambda != 0.0 {
            for w in weights.matrices() {
                penalty += w.slice(s![.., 1..]).mapv(|v| v * v).sum();
            }
        }
        let cost = data_cost + self.lambda * penalty / (2.0 * m);

        // Backward pass. delta starts as the output-layer error and is pulled
        // back through each transition; the bias column never accumulates a
        // regularization term.
        let num_mats = weights.len();
        let mut grads: Vec<Array2<f64>> = Vec::with_capacity(num_mats);
        let mut delta = &h - self.y;

        for k in (0..num_mats).rev() {
            let a = &acts[k];
            let w = weights.matrix(k);

            let mut grad = delta.t().dot(a) / m;
            if self.lambda != 0.0 {
                let mut reg = w.mapv(|v| v * self.lambda / m);
                reg.column_mut(0).fill(0.0);
                grad += &reg;
            }
            grads.push(grad);

            if k > 0 {
                // (delta * W) dropping the bias column, times the sigmoid
                // gradient expressed through the cached activation a*(1-a).
                let pulled = delta.dot(w);
                let inner = pulled.slice(s![.., 1..]).to_owned();
                let sg = a.slice(s![.., 1..]).mapv(|v| v * (1.0 - v));
                delta = inner * sg;
            }
        }
        grads.reverse();

        (cost, flatten_matrices(&grads))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn assert_close(analytic: f64, numeric: f64, abs_tol: f64, rel_tol: f64) {
        let diff = (analytic - numeric).abs();
        let scale = analytic.abs().max(numeric.abs()).max(1.0);
        assert!(
            diff <= abs_tol || diff / scale <= rel_tol,
            "analytic={analytic} numeric={numeric} diff={diff}"
        );
    }

    fn toy_data() -> (Array2<f64>, Array2<f64>) {
        let x = array![[0.2, -0.4], [1.0, 0.3], [-0.7, 0.9], [0.5, 0.5]];
        let y = array![[1.0, 0.0], [0.0, 1.0], [1.0, 0.0], [0.0, 1.0]];
        (x, y)
    }

    #[test]
    fn gradient_length_matches_parameter_vector() {
        let (x, y) = toy_data();
        let topo = Topology::new(vec![2, 3, 2]).unwrap();
        let cost = BackpropCost::new(&x, &y, &topo, 0.5).unwrap();

        let theta = WeightSet::random_with_seed(&topo, 1).flatten();
        let (j, grad) = cost.evaluate_cost(&theta);
        assert!(j.is_finite());
        assert_eq!(grad.len(), theta.len());
    }

    #[test]
    fn gradient_matches_numeric_gradient() {
        let (x, y) = toy_data();
        let topo = Topology::new(vec![2, 3, 2]).unwrap();
        let cost = BackpropCost::new(&x, &y, &topo, 0.3).unwrap();

        let theta = WeightSet::random_with_seed(&topo, 5).flatten();
        let (_, grad) = cost.evaluate_cost(&theta);

        let eps = 1e-6;
        for p in 0..theta.len() {
            let mut plus = theta.clone();
            plus[p] += eps;
            let mut minus = theta.clone();
            minus[p] -= eps;

            let (j_plus, _) = cost.evaluate_cost(&plus);
            let (j_minus, _) = cost.evaluate_cost(&minus);
            let numeric = (j_plus - j_minus) / (2.0 * eps);
            assert_close(grad[p], numeric, 1e-7, 1e-5);
        }
    }

    #[test]
    fn evaluation_is_pure() {
        let (x, y) = toy_data();
        let topo = Topology::new(vec![2, 4, 2]).unwrap();
        let cost = BackpropCost::new(&x, &y, &topo, 1.0).unwrap();

        let theta = WeightSet::random_with_seed(&topo, 2).flatten();
        let (j1, g1) = cost.evaluate_cost(&theta);
        let (j2, g2) = cost.evaluate_cost(&theta);
        assert_eq!(j1, j2);
        assert_eq!(g1, g2);
    }

    #[test]
    fn regularization_penalizes_non_bias_weights_only() {
        let (x, y) = toy_data();
        let topo = Topology::new(vec![2, 3, 2]).unwrap();
        let ws = WeightSet::random_with_seed(&topo, 3);
        let theta = ws.flatten();

        let plain = BackpropCost::new(&x, &y, &topo, 0.0).unwrap();
        let reg = BackpropCost::new(&x, &y, &topo, 2.0).unwrap();

        let (j0, _) = plain.evaluate_cost(&theta);
        let (j2, _) = reg.evaluate_cost(&theta);
        // Random weights make some non-bias entry nonzero with certainty.
        assert!(j2 > j0);

        // Perturbing only a bias weight must leave the penalty term unchanged.
        let mut mats: Vec<_> = ws.matrices().to_vec();
        mats[0][[0, 0]] += 10.0;
        let biased = WeightSet::from_matrices(mats, &topo).unwrap();
        let theta_b = biased.flatten();

        let (jb0, _) = plain.evaluate_cost(&theta_b);
        let (jb2, _) = reg.evaluate_cost(&theta_b);
        let penalty = j2 - j0;
        let penalty_b = jb2 - jb0;
        assert_close(penalty, penalty_b, 1e-9, 1e-9);
    }

    #[test]
    fn rejects_mismatched_inputs() {
        let (x, y) = toy_data();
        let topo = Topology::new(vec![3, 3, 2]).unwrap();
        assert!(matches!(
            BackpropCost::new(&x, &y, &topo, 0.0),
            Err(Error::ShapeMismatch(_))
        ));

        let topo = Topology::new(vec![2, 3, 2]).unwrap();
        let y_short = array![[1.0, 0.0]];
        assert!(matches!(
            BackpropCost::new(&x, &y_short, &topo, 0.0),
            Err(Error::InvalidData(_))
        ));

        assert!(matches!(
            BackpropCost::new(&x, &y, &topo, -1.0),
            Err(Error::InvalidConfig(_))
        ));
    }
}
