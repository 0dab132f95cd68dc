//! Column-parallel execution.
//!
//! Columns never share state, so each column is computed by its own closure
//! call on the rayon pool and the owned per-column buffers are stitched into a
//! new matrix afterwards. Results come back in column order regardless of
//! scheduling.

use ndarray::Array2;
use rayon::prelude::*;

use crate::error::Result;

/// Run `f` for every column index in parallel, preserving order.
pub(crate) fn par_columns<T, F>(n_cols: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..n_cols).into_par_iter().map(f).collect()
}

/// Fallible variant: the first error aborts the call and no output is built.
pub(crate) fn try_par_columns<T, F>(n_cols: usize, f: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> Result<T> + Sync + Send,
{
    (0..n_cols).into_par_iter().map(f).collect()
}

/// Stitch per-column buffers (each `n_rows` long) into a `n_rows x cols.len()` array.
pub(crate) fn assemble<T: Copy>(n_rows: usize, cols: &[Vec<T>]) -> Array2<T> {
    debug_assert!(cols.iter().all(|c| c.len() == n_rows));
    Array2::from_shape_fn((n_rows, cols.len()), |(i, j)| cols[j][i])
}
