//! The network object: a topology plus its weight set.
//!
//! `Network` owns both halves and keeps them consistent: every constructor and
//! setter validates the weights against the topology, and training replaces
//! the weight set wholesale (callers never observe partial in-place mutation).

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{forward, Error, Result, Topology, WeightSet};

#[derive(Debug, Clone)]
pub struct Network {
    topology: Topology,
    weights: WeightSet,
}

impl Network {
    /// Create a network with randomly initialized weights from a seed.
    pub fn with_seed(topology: Topology, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::with_rng(topology, &mut rng)
    }

    /// Create a network with randomly initialized weights from the given RNG.
    pub fn with_rng<R: Rng + ?Sized>(topology: Topology, rng: &mut R) -> Self {
        let weights = WeightSet::random_with_rng(&topology, rng);
        Self { topology, weights }
    }

    /// Create a network from an existing weight set (e.g. pre-trained).
    ///
    /// Returns `ShapeMismatch` if the weights disagree with the topology.
    pub fn from_parts(topology: Topology, weights: WeightSet) -> Result<Self> {
        weights.validate(&topology)?;
        Ok(Self { topology, weights })
    }

    #[inline]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    #[inline]
    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }

    /// Replace the stored weights.
    ///
    /// Returns `ShapeMismatch` if the new weights disagree with the topology.
    pub fn set_weights(&mut self, weights: WeightSet) -> Result<()> {
        weights.validate(&self.topology)?;
        self.weights = weights;
        Ok(())
    }

    /// The network output for each row of `x`; elements lie in (0, 1).
    pub fn hypothesis(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_input(x)?;
        Ok(forward::hypothesis(&self.weights, x))
    }

    /// One-hot predictions for each row of `x` (first column wins on ties).
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_input(x)?;
        Ok(forward::predict(&self.weights, x))
    }

    fn check_input(&self, x: &Array2<f64>) -> Result<()> {
        if x.ncols() != self.topology.input_dim() {
            return Err(Error::ShapeMismatch(format!(
                "input has {} columns, network input dim is {}",
                x.ncols(),
                self.topology.input_dim()
            )));
        }
        Ok(())
    }
}
