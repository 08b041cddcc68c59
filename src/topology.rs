//! Network shape.
//!
//! A [`Topology`] is an ordered sequence of layer sizes: element 0 is the input
//! dimension, the last element is the output dimension, and everything in
//! between is a hidden layer. It is validated once at construction and never
//! changes afterwards; every shape in the crate (weight matrices, the flat
//! parameter vector) is derived from it.

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    sizes: Vec<usize>,
}

impl Topology {
    /// Build a topology from layer sizes.
    ///
    /// `sizes` must include input and output dimensions (length >= 2) and every
    /// entry must be > 0.
    pub fn new(sizes: Vec<usize>) -> Result<Self> {
        if sizes.len() < 2 {
            return Err(Error::InvalidConfig(
                "topology must include input and output dims".to_owned(),
            ));
        }
        if sizes.contains(&0) {
            return Err(Error::InvalidConfig(
                "all layer sizes must be > 0".to_owned(),
            ));
        }
        Ok(Self { sizes })
    }

    #[inline]
    pub fn layer_sizes(&self) -> &[usize] {
        &self.sizes
    }

    #[inline]
    pub fn num_layers(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.sizes[0]
    }

    #[inline]
    pub fn output_dim(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    /// Shape `(rows, cols)` of each weight matrix, one per layer transition.
    ///
    /// Matrix `k` maps layer `k` to layer `k + 1` and has shape
    /// `(sizes[k + 1], sizes[k] + 1)`; the extra column holds the bias weights.
    pub fn weight_shapes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.sizes.windows(2).map(|w| (w[1], w[0] + 1))
    }

    /// Total element count of the flat parameter vector.
    #[inline]
    pub fn num_params(&self) -> usize {
        self.weight_shapes().map(|(r, c)| r * c).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_or_zero_topologies() {
        assert!(Topology::new(vec![3]).is_err());
        assert!(Topology::new(vec![]).is_err());
        assert!(Topology::new(vec![3, 0, 2]).is_err());
        assert!(Topology::new(vec![3, 2]).is_ok());
    }

    #[test]
    fn weight_shapes_include_bias_column() {
        let topo = Topology::new(vec![20, 12, 8, 9]).unwrap();
        let shapes: Vec<_> = topo.weight_shapes().collect();
        assert_eq!(shapes, vec![(12, 21), (8, 13), (9, 9)]);
        assert_eq!(topo.num_params(), 12 * 21 + 8 * 13 + 9 * 9);
    }

    #[test]
    fn dims_come_from_the_ends() {
        let topo = Topology::new(vec![4, 7, 3]).unwrap();
        assert_eq!(topo.input_dim(), 4);
        assert_eq!(topo.output_dim(), 3);
        assert_eq!(topo.num_layers(), 3);
    }
}
