//! Forward propagation.
//!
//! Activations flow layer by layer: each hidden activation is bias-augmented
//! (a leading ones column) so the next transition's matrix multiply picks up
//! the bias weights in column 0. The output layer is produced un-augmented.
//!
//! Rows of `x` are examples, columns are features.

use ndarray::{concatenate, Array2, Axis};

use crate::WeightSet;

/// Elementwise logistic function `1 / (1 + e^-x)`.
pub fn sigmoid(z: &Array2<f64>) -> Array2<f64> {
    z.mapv(sigmoid_scalar)
}

/// Elementwise derivative of the logistic function, `s(x) * (1 - s(x))`.
pub fn sigmoid_gradient(z: &Array2<f64>) -> Array2<f64> {
    z.mapv(|v| {
        let s = sigmoid_scalar(v);
        s * (1.0 - s)
    })
}

#[inline]
pub(crate) fn sigmoid_scalar(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// All bias-augmented activations, from the input layer up to the last hidden
/// layer.
///
/// `result[0]` is `[1 | x]`; `result[k]` is `[1 | sigmoid(result[k-1] * W[k-1]^T)]`.
/// The returned vector has one entry per weight matrix; the output layer itself
/// comes from [`hypothesis`] (or [`output_layer`] given `result.last()`).
///
/// Shape contract (asserted): `x` has `weights.matrix(0).ncols() - 1` columns.
pub fn activations(weights: &WeightSet, x: &Array2<f64>) -> Vec<Array2<f64>> {
    assert!(!weights.is_empty(), "weight set must not be empty");
    assert_eq!(
        x.ncols(),
        weights.matrix(0).ncols() - 1,
        "input has {} features, first weight matrix expects {}",
        x.ncols(),
        weights.matrix(0).ncols() - 1
    );

    let m = x.nrows();
    let mut acts = Vec::with_capacity(weights.len());
    acts.push(augment(m, x.clone()));

    for k in 0..weights.len() - 1 {
        let z = acts[k].dot(&weights.matrix(k).t());
        acts.push(augment(m, sigmoid(&z)));
    }
    acts
}

/// The network output ("hypothesis") for inputs `x`: every element lies in
/// the open interval (0, 1).
pub fn hypothesis(weights: &WeightSet, x: &Array2<f64>) -> Array2<f64> {
    let acts = activations(weights, x);
    let last = acts.last().expect("activations are never empty");
    output_layer(weights, last)
}

/// Output layer from the last hidden activation.
pub(crate) fn output_layer(weights: &WeightSet, last_activation: &Array2<f64>) -> Array2<f64> {
    let w = &weights.matrices()[weights.len() - 1];
    sigmoid(&last_activation.dot(&w.t()))
}

/// One-hot predictions: for each row of the hypothesis, the column holding the
/// maximum value is set to 1 and all others to 0.
///
/// Ties go to the lowest column index (first-occurrence argmax).
pub fn predict(weights: &WeightSet, x: &Array2<f64>) -> Array2<f64> {
    one_hot_rows(&hypothesis(weights, x))
}

/// Row-wise first-occurrence argmax, encoded as a one-hot matrix.
pub(crate) fn one_hot_rows(values: &Array2<f64>) -> Array2<f64> {
    let mut out = Array2::zeros(values.raw_dim());
    for (i, row) in values.rows().into_iter().enumerate() {
        let mut best = 0;
        let mut best_v = row[0];
        for (j, &v) in row.iter().enumerate().skip(1) {
            if v > best_v {
                best = j;
                best_v = v;
            }
        }
        out[[i, best]] = 1.0;
    }
    out
}

fn augment(m: usize, a: Array2<f64>) -> Array2<f64> {
    let ones = Array2::ones((m, 1));
    concatenate![Axis(1), ones, a]
}
