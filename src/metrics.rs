//! Evaluation helpers.
//!
//! Metrics do not participate in training; they only score predictions.

use ndarray::Array2;

/// Percentage of examples whose one-hot prediction matches the label row.
///
/// `predictions` is expected to be the output of
/// [`predict`](crate::forward::predict) (exactly one 1 per row) and `y` a
/// {0, 1} label matrix of the same shape.
///
/// Shape contract (asserted): `predictions.dim() == y.dim()`.
pub fn accuracy(predictions: &Array2<f64>, y: &Array2<f64>) -> f64 {
    assert_eq!(
        predictions.dim(),
        y.dim(),
        "predictions shape {:?} does not match labels shape {:?}",
        predictions.dim(),
        y.dim()
    );
    (predictions * y).sum() * 100.0 / y.nrows() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn accuracy_counts_matching_rows() {
        let pred = array![[1.0, 0.0], [0.0, 1.0], [1.0, 0.0], [0.0, 1.0]];
        let y = array![[1.0, 0.0], [0.0, 1.0], [0.0, 1.0], [0.0, 1.0]];
        assert_eq!(accuracy(&pred, &y), 75.0);
    }

    #[test]
    fn accuracy_is_100_on_perfect_predictions() {
        let pred = array![[0.0, 1.0], [1.0, 0.0]];
        assert_eq!(accuracy(&pred, &pred.clone()), 100.0);
    }

    #[test]
    #[should_panic]
    fn accuracy_panics_on_shape_mismatch() {
        let pred = array![[1.0, 0.0]];
        let y = array![[1.0]];
        accuracy(&pred, &y);
    }
}
