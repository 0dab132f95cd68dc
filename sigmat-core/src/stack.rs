//! Configuration stacks for vectorized parameter sweeps.
//!
//! A `ConfigStack` is a `[K x (T or 1) x (N or 1)]` float array: one matrix of
//! parameter values per configuration. Each configuration broadcasts against
//! the `(T, N)` shape of the operand it parameterizes and yields its own block
//! of output columns.

use ndarray::{Array2, Array3, Axis};

use crate::broadcast::broadcast_array;
use crate::error::{Result, SignalError};
use crate::matrix::Shape;

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigStack {
    data: Array3<f64>,
}

impl ConfigStack {
    /// Wrap a full 3-D stack. Every axis must be non-empty.
    pub fn new(data: Array3<f64>) -> Result<Self> {
        let (k, t, n) = data.dim();
        if k == 0 || t == 0 || n == 0 {
            return Err(SignalError::InvalidConfigStack(format!(
                "every axis must be non-empty, got {k}x{t}x{n}"
            )));
        }
        Ok(Self { data })
    }

    /// One configuration per scalar, applied to every cell.
    pub fn from_scalars(values: &[f64]) -> Result<Self> {
        let data = Array3::from_shape_fn((values.len(), 1, 1), |(k, _, _)| values[k]);
        Self::new(data)
    }

    /// One configuration per row, with one value per column.
    pub fn from_column_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != n) {
            return Err(SignalError::InvalidConfigStack(
                "per-column rows differ in length".into(),
            ));
        }
        let data = Array3::from_shape_fn((rows.len(), 1, n), |(k, _, j)| rows[k][j]);
        Self::new(data)
    }

    /// One configuration per matrix; all matrices must share a shape.
    pub fn from_matrices(matrices: &[Array2<f64>]) -> Result<Self> {
        let dim = matrices.first().map_or((0, 0), Array2::dim);
        if matrices.iter().any(|m| m.dim() != dim) {
            return Err(SignalError::InvalidConfigStack(
                "configuration matrices differ in shape".into(),
            ));
        }
        let data = Array3::from_shape_fn((matrices.len(), dim.0, dim.1), |(k, i, j)| {
            matrices[k][[i, j]]
        });
        Self::new(data)
    }

    pub fn n_configs(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn as_array(&self) -> &Array3<f64> {
        &self.data
    }

    /// Owned `(T, N)` buffer per configuration.
    ///
    /// Fails if any configuration cannot broadcast to `shape`.
    pub fn broadcast_to(&self, shape: Shape) -> Result<Vec<Array2<f64>>> {
        self.data
            .axis_iter(Axis(0))
            .map(|config| broadcast_array(&config.to_owned(), shape))
            .collect()
    }

    /// Display label per configuration: `{name}_{value}` when the configuration
    /// is a single constant, `{name}_{k}` otherwise.
    pub fn labels(&self, name: &str) -> Vec<String> {
        self.data
            .axis_iter(Axis(0))
            .enumerate()
            .map(|(k, config)| {
                let first = config.iter().next().copied().unwrap_or(f64::NAN);
                if config.iter().all(|&v| v == first) {
                    format!("{name}_{first}")
                } else {
                    format!("{name}_{k}")
                }
            })
            .collect()
    }
}
