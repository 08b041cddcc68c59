//! Training orchestration.
//!
//! `Network::train` is a pure pipeline: flatten the current weights, close a
//! [`BackpropCost`](crate::BackpropCost) over the training set, hand the flat
//! vector to [`fmincg`](crate::fmincg::fmincg), and unflatten the result back
//! into the network. Nothing persists between calls except the replaced
//! weight set.

use tracing::debug;

use crate::cost::BackpropCost;
use crate::fmincg::fmincg;
use crate::{Error, Network, Result, Topology, TrainingSet, WeightSet};

#[derive(Debug, Clone, Copy)]
pub struct TrainConfig {
    /// Regularization strength; 0 disables the penalty.
    pub lambda: f64,
    /// Optimizer budget: positive counts line searches, negative counts cost
    /// evaluations (absolute value). Must be nonzero.
    pub max_iter: i32,
    /// Log iteration count and cost after each accepted line search.
    pub verbose: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            lambda: 0.0,
            max_iter: 50,
            verbose: false,
        }
    }
}

impl TrainConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.lambda.is_finite() && self.lambda >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "lambda must be finite and >= 0, got {}",
                self.lambda
            )));
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidConfig("max_iter must be nonzero".to_owned()));
        }
        Ok(())
    }
}

/// Summary of one training run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    /// Number of accepted line searches.
    pub iterations: usize,
    /// Cost at the last accepted line search; `None` if none succeeded (the
    /// weights are then unchanged up to the optimizer's restore).
    pub final_cost: Option<f64>,
}

/// Train a weight set with backpropagation, returning the new weights.
///
/// This is the bare pipeline: flatten `initial`, minimize the regularized
/// backpropagation cost over `data`, unflatten the optimizer's best point.
/// It owns no state; [`Network::train`] wraps it and performs the actual
/// replacement of the stored weights.
pub fn train_weights(
    data: &TrainingSet,
    initial: &WeightSet,
    topology: &Topology,
    cfg: &TrainConfig,
) -> Result<(WeightSet, TrainReport)> {
    cfg.validate()?;
    initial.validate(topology)?;

    let cost = BackpropCost::new(data.x(), data.y(), topology, cfg.lambda)?;
    let flat = initial.flatten();
    debug!(
        params = flat.len(),
        examples = data.num_examples(),
        lambda = cfg.lambda,
        "starting training"
    );

    let result = fmincg(&cost, flat, cfg.max_iter, cfg.verbose);
    let trained = WeightSet::unflatten(&result.theta, topology)?;
    let report = TrainReport {
        iterations: result.costs.len(),
        final_cost: result.costs.last().copied(),
    };
    Ok((trained, report))
}

impl Network {
    /// Train the network with backpropagation, replacing its weights.
    ///
    /// The optimizer returns its best point even when it stops early (two
    /// consecutive failed line searches or an exhausted budget), so the
    /// resulting weights are best-effort rather than proven optimal.
    pub fn train(&mut self, data: &TrainingSet, cfg: &TrainConfig) -> Result<TrainReport> {
        let (trained, report) = train_weights(data, self.weights(), self.topology(), cfg)?;
        self.set_weights(trained)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Topology;
    use ndarray::array;

    #[test]
    fn config_validation() {
        assert!(TrainConfig::default().validate().is_ok());
        assert!(TrainConfig {
            lambda: -0.1,
            ..TrainConfig::default()
        }
        .validate()
        .is_err());
        assert!(TrainConfig {
            lambda: f64::NAN,
            ..TrainConfig::default()
        }
        .validate()
        .is_err());
        assert!(TrainConfig {
            max_iter: 0,
            ..TrainConfig::default()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn train_rejects_mismatched_data() {
        let mut net = Network::with_seed(Topology::new(vec![3, 2, 2]).unwrap(), 0);
        let data = TrainingSet::new(
            array![[0.0, 1.0], [1.0, 0.0]],
            array![[1.0, 0.0], [0.0, 1.0]],
        )
        .unwrap();
        assert!(net.train(&data, &TrainConfig::default()).is_err());
    }
}
