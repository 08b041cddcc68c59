//! Weight storage and the flat parameter codec.
//!
//! A [`WeightSet`] holds one dense matrix per layer transition. The optimizer
//! never sees that structure: it works on a single flat column vector, produced
//! by [`WeightSet::flatten`] and undone by [`WeightSet::unflatten`].
//!
//! The flat layout is an explicit contract, not an artifact of container
//! iteration order: matrices are concatenated in transition order, each matrix
//! row-major. `unflatten(flatten(w), topo)` reproduces `w` element for element.

use ndarray::{s, Array1, Array2};
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::{Error, Result, Topology};

/// The per-transition weight matrices of a network ("Theta").
///
/// Matrix `k` has shape `(topology[k + 1], topology[k] + 1)`; column 0 carries
/// the bias weights.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightSet {
    matrices: Vec<Array2<f64>>,
}

impl WeightSet {
    /// Draw a fresh weight set with standard-normal entries.
    pub fn random_with_rng<R: Rng + ?Sized>(topology: &Topology, rng: &mut R) -> Self {
        let matrices = topology
            .weight_shapes()
            .map(|(rows, cols)| Array2::random_using((rows, cols), StandardNormal, rng))
            .collect();
        Self { matrices }
    }

    /// Draw a fresh weight set using a deterministic seed.
    pub fn random_with_seed(topology: &Topology, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::random_with_rng(topology, &mut rng)
    }

    /// Build a weight set from pre-existing matrices (e.g. pre-trained weights).
    ///
    /// Returns `ShapeMismatch` if the count or any shape disagrees with
    /// `topology`.
    pub fn from_matrices(matrices: Vec<Array2<f64>>, topology: &Topology) -> Result<Self> {
        let ws = Self { matrices };
        ws.validate(topology)?;
        Ok(ws)
    }

    /// Check this weight set against a topology.
    pub fn validate(&self, topology: &Topology) -> Result<()> {
        let expected = topology.num_layers() - 1;
        if self.matrices.len() != expected {
            return Err(Error::ShapeMismatch(format!(
                "weight set has {} matrices, topology implies {expected}",
                self.matrices.len()
            )));
        }
        for (k, ((rows, cols), m)) in topology.weight_shapes().zip(&self.matrices).enumerate() {
            if m.dim() != (rows, cols) {
                return Err(Error::ShapeMismatch(format!(
                    "weight matrix {k} has shape {:?}, expected ({rows}, {cols})",
                    m.dim()
                )));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    #[inline]
    pub fn matrix(&self, k: usize) -> &Array2<f64> {
        &self.matrices[k]
    }

    #[inline]
    pub fn matrices(&self) -> &[Array2<f64>] {
        &self.matrices
    }

    /// Total number of weight elements.
    #[inline]
    pub fn num_params(&self) -> usize {
        self.matrices.iter().map(|m| m.len()).sum()
    }

    /// Encode all matrices into a single flat parameter vector.
    pub fn flatten(&self) -> Array1<f64> {
        flatten_matrices(&self.matrices)
    }

    /// Decode a flat parameter vector back into per-transition matrices.
    ///
    /// Shapes are reconstructed purely from `topology`. Returns `ShapeMismatch`
    /// if `flat` does not hold exactly `topology.num_params()` elements.
    pub fn unflatten(flat: &Array1<f64>, topology: &Topology) -> Result<Self> {
        if flat.len() != topology.num_params() {
            return Err(Error::ShapeMismatch(format!(
                "flat vector has {} elements, topology implies {}",
                flat.len(),
                topology.num_params()
            )));
        }

        let mut matrices = Vec::with_capacity(topology.num_layers() - 1);
        let mut offset = 0;
        for (rows, cols) in topology.weight_shapes() {
            let n = rows * cols;
            let chunk = flat.slice(s![offset..offset + n]).to_vec();
            let m = Array2::from_shape_vec((rows, cols), chunk)
                .expect("chunk length equals rows * cols");
            matrices.push(m);
            offset += n;
        }
        Ok(Self { matrices })
    }
}

/// Concatenate matrices into the flat layout.
///
/// Shared by `WeightSet::flatten` and the gradient assembly in the cost
/// function so both sides of the optimizer agree on the ordering.
pub(crate) fn flatten_matrices(matrices: &[Array2<f64>]) -> Array1<f64> {
    let total: usize = matrices.iter().map(|m| m.len()).sum();
    let mut flat = Vec::with_capacity(total);
    for m in matrices {
        flat.extend(m.iter().copied());
    }
    Array1::from_vec(flat)
}
