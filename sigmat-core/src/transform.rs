//! Small whole-matrix helpers: counting, shifting and shuffling signals.

use ndarray::{s, Array2, Axis};
use rand::seq::SliceRandom;
use tracing::debug;

use crate::columns::{assemble, par_columns};
use crate::matrix::EventMatrix;
use crate::rng::{SeedHierarchy, STREAM_SHUFFLE};

/// Number of True cells per column.
pub fn num_signals(matrix: &EventMatrix) -> Vec<usize> {
    matrix
        .as_array()
        .axis_iter(Axis(1))
        .map(|col| col.iter().filter(|&&v| v).count())
        .collect()
}

/// Move every signal `n` rows later. Vacated leading rows are False and
/// signals pushed past the last row are dropped.
pub fn fshift(matrix: &EventMatrix, n: usize) -> EventMatrix {
    let (n_rows, n_cols) = matrix.shape();
    let mut out = Array2::from_elem((n_rows, n_cols), false);
    if n < n_rows {
        out.slice_mut(s![n.., ..])
            .assign(&matrix.as_array().slice(s![..n_rows - n, ..]));
    }
    EventMatrix::new(out)
}

/// Randomly permute the rows of each column independently.
///
/// Signal counts per column are preserved. `None` seeds from OS entropy.
pub fn shuffle(matrix: &EventMatrix, seed: Option<u64>) -> EventMatrix {
    let seeds = SeedHierarchy::from_option(seed);
    debug!(shape = ?matrix.shape(), seed = seeds.master_seed(), "shuffling signals");
    let cols = par_columns(matrix.n_cols(), |col| {
        let mut rng = seeds.rng_for(STREAM_SHUFFLE, col);
        let mut values = matrix.column_vec(col);
        values.shuffle(&mut rng);
        values
    });
    EventMatrix::new(assemble(matrix.n_rows(), &cols))
}
