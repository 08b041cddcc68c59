//! A small backpropagation network crate.
//!
//! `cgnet` trains fully-connected feedforward networks with the classic
//! backpropagation cost (binary cross-entropy plus L2 regularization on
//! non-bias weights) and minimizes that cost with `fmincg`, a nonlinear
//! conjugate-gradient optimizer with a Wolfe-Powell line search.
//!
//! # Design goals
//!
//! - Clear contracts: shapes are explicit and validated at the API boundary.
//! - A delicate optimizer kept faithful: the line search's bracketing,
//!   interpolation, and extrapolation heuristics follow Rasmussen's `fmincg`
//!   exactly, so its well-known convergence behavior carries over.
//! - The optimizer is generic over a [`CostFunction`]; swapping in a different
//!   loss never touches `fmincg`.
//!
//! # Panics vs `Result`
//!
//! This crate intentionally exposes two layers of API:
//!
//! - High-level, shape-checked (returns [`Result`]): [`Network`] construction
//!   and its [`train`](Network::train) / [`predict`](Network::predict) /
//!   [`hypothesis`](Network::hypothesis) methods, [`TrainingSet`],
//!   [`WeightSet::from_matrices`], [`WeightSet::unflatten`].
//! - Low-level hot path (panics on misuse): [`forward::activations`],
//!   [`CostFunction::evaluate_cost`]. Shape mismatches there are programmer
//!   error and assert.
//!
//! # Data layout and shapes
//!
//! - Scalars are `f64`.
//! - Input matrices are `(examples, features)`; label matrices are
//!   `(examples, classes)` with entries in {0, 1}.
//! - Weight matrix `k` has shape `(topology[k+1], topology[k]+1)`; column 0 is
//!   the bias column.
//! - The flat parameter vector concatenates the weight matrices in order,
//!   each row-major; see [`WeightSet::flatten`] / [`WeightSet::unflatten`].
//!
//! # Quick start
//!
//! ```rust
//! use cgnet::{Network, Topology, TrainConfig, TrainingSet};
//!
//! # fn main() -> cgnet::Result<()> {
//! let xs = vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![1.0, 0.0],
//!     vec![1.0, 1.0],
//! ];
//! // Two classes, one-hot: class 1 means "both inputs on".
//! let ys = vec![
//!     vec![1.0, 0.0],
//!     vec![1.0, 0.0],
//!     vec![1.0, 0.0],
//!     vec![0.0, 1.0],
//! ];
//! let data = TrainingSet::from_rows(&xs, &ys)?;
//!
//! let mut net = Network::with_seed(Topology::new(vec![2, 3, 2])?, 0);
//! let report = net.train(
//!     &data,
//!     &TrainConfig {
//!         lambda: 0.0,
//!         max_iter: 25,
//!         verbose: false,
//!     },
//! )?;
//!
//! let predictions = net.predict(data.x())?;
//! assert_eq!(predictions.nrows(), 4);
//! # let _ = report;
//! # Ok(())
//! # }
//! ```

pub mod cost;
pub mod data;
pub mod error;
pub mod fmincg;
pub mod forward;
pub mod metrics;
pub mod network;
pub mod params;
pub mod topology;
pub mod train;

pub use cost::{BackpropCost, CostFunction};
pub use data::TrainingSet;
pub use error::{Error, Result};
pub use fmincg::{fmincg, Minimization};
pub use forward::{hypothesis, predict, sigmoid, sigmoid_gradient};
pub use metrics::accuracy;
pub use network::Network;
pub use params::WeightSet;
pub use topology::Topology;
pub use train::{train_weights, TrainConfig, TrainReport};
