//! Training data container.
//!
//! [`TrainingSet`] pairs an input matrix X (rows = examples, columns =
//! features) with a label matrix Y (rows = examples, columns = classes) and
//! validates the pairing once at the API boundary, so the numeric code can
//! assume consistent shapes.
//!
//! Label values are expected to come from {0, 1} (one-hot or multi-hot rows).
//! That is a documented precondition of the cost function, not something
//! enforced here: training still runs on other values, it just no longer
//! corresponds to a valid probabilistic model.

use ndarray::Array2;

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct TrainingSet {
    x: Array2<f64>,
    y: Array2<f64>,
}

impl TrainingSet {
    /// Pair an input matrix with a label matrix.
    ///
    /// Returns `InvalidData` if the row counts differ or either matrix is
    /// empty.
    pub fn new(x: Array2<f64>, y: Array2<f64>) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(Error::InvalidData(
                "training set must not be empty".to_owned(),
            ));
        }
        if x.ncols() == 0 || y.ncols() == 0 {
            return Err(Error::InvalidData(
                "feature and label dims must be > 0".to_owned(),
            ));
        }
        if x.nrows() != y.nrows() {
            return Err(Error::InvalidData(format!(
                "x has {} rows, y has {} rows",
                x.nrows(),
                y.nrows()
            )));
        }
        Ok(Self { x, y })
    }

    /// Build a training set from per-example rows.
    ///
    /// This is a convenience constructor (it copies into matrix storage).
    pub fn from_rows(inputs: &[Vec<f64>], labels: &[Vec<f64>]) -> Result<Self> {
        let x = matrix_from_rows(inputs, "input")?;
        let y = matrix_from_rows(labels, "label")?;
        Self::new(x, y)
    }

    #[inline]
    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    #[inline]
    pub fn y(&self) -> &Array2<f64> {
        &self.y
    }

    #[inline]
    pub fn num_examples(&self) -> usize {
        self.x.nrows()
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.x.ncols()
    }

    #[inline]
    pub fn output_dim(&self) -> usize {
        self.y.ncols()
    }
}

fn matrix_from_rows(rows: &[Vec<f64>], what: &str) -> Result<Array2<f64>> {
    if rows.is_empty() {
        return Err(Error::InvalidData(format!("{what} rows must not be empty")));
    }
    let dim = rows[0].len();
    if dim == 0 {
        return Err(Error::InvalidData(format!("{what} dim must be > 0")));
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() != dim {
            return Err(Error::InvalidData(format!(
                "{what} row {i} has len {}, expected {dim}",
                row.len()
            )));
        }
    }

    let mut flat = Vec::with_capacity(rows.len() * dim);
    for row in rows {
        flat.extend_from_slice(row);
    }
    let m = Array2::from_shape_vec((rows.len(), dim), flat)
        .expect("flat length equals rows * dim");
    Ok(m)
}
