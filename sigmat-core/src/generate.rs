//! Signal generation from caller-supplied choice functions.
//!
//! A choice function receives `(col, from_i, to_i)` and returns the rows in
//! `[from_i, to_i)` to mark True. Rows outside the range or returned twice are
//! caller bugs and fail the whole call; nothing is clipped.

use tracing::debug;

use crate::columns::{assemble, try_par_columns};
use crate::error::{Result, SignalError};
use crate::matrix::{EventMatrix, Shape};
use crate::reduce::after_spans;

/// Generate a matrix by calling `choice_fn(col, 0, T)` once per column.
pub fn generate<F>(shape: Shape, choice_fn: F) -> Result<EventMatrix>
where
    F: Fn(usize, usize, usize) -> Vec<usize> + Sync + Send,
{
    let (n_rows, n_cols) = shape;
    debug!(?shape, "generating signals");
    let cols = try_par_columns(n_cols, |col| {
        fill_column(col, n_rows, &[(0, n_rows)], |from_i, to_i| {
            choice_fn(col, from_i, to_i)
        })
    })?;
    Ok(EventMatrix::new(assemble(n_rows, &cols)))
}

/// Generate signals in the gaps after each existing signal of `matrix`.
///
/// For an occurrence at row `i` the range is `[i + 1, next occurrence)`, or
/// `[i + 1, T)` for the last one. The input is not copied into the output.
pub fn generate_after<F>(matrix: &EventMatrix, choice_fn: F) -> Result<EventMatrix>
where
    F: Fn(usize, usize, usize) -> Vec<usize> + Sync + Send,
{
    let n_rows = matrix.n_rows();
    debug!(shape = ?matrix.shape(), "generating signals after existing signals");
    let cols = try_par_columns(matrix.n_cols(), |col| {
        let spans = after_spans(matrix.column(col));
        fill_column(col, n_rows, &spans, |from_i, to_i| choice_fn(col, from_i, to_i))
    })?;
    Ok(EventMatrix::new(assemble(n_rows, &cols)))
}

/// Generate alternating entries and exits.
///
/// Per column, starting at row 0: `entry_fn(col, pos, T)` marks entries and
/// moves `pos` past its last pick, then `exit_fn(col, pos, T)` does the same
/// for exits, until `pos` reaches the end. An empty pick ends the column.
pub fn generate_iteratively<F1, F2>(
    shape: Shape,
    entry_fn: F1,
    exit_fn: F2,
) -> Result<(EventMatrix, EventMatrix)>
where
    F1: Fn(usize, usize, usize) -> Vec<usize> + Sync + Send,
    F2: Fn(usize, usize, usize) -> Vec<usize> + Sync + Send,
{
    let (n_rows, n_cols) = shape;
    debug!(?shape, "generating entries and exits iteratively");
    let cols = try_par_columns(n_cols, |col| {
        let mut entries = vec![false; n_rows];
        let mut exits = vec![false; n_rows];
        let mut pos = 0;
        let mut want_entry = true;
        while pos < n_rows {
            let (picks, out) = if want_entry {
                (entry_fn(col, pos, n_rows), &mut entries)
            } else {
                (exit_fn(col, pos, n_rows), &mut exits)
            };
            mark(col, out, &picks, pos, n_rows)?;
            match picks.iter().max() {
                Some(&last) => pos = last + 1,
                None => break,
            }
            want_entry = !want_entry;
        }
        Ok((entries, exits))
    })?;

    let (entries, exits): (Vec<_>, Vec<_>) = cols.into_iter().unzip();
    Ok((
        EventMatrix::new(assemble(n_rows, &entries)),
        EventMatrix::new(assemble(n_rows, &exits)),
    ))
}

/// Build one column by asking `choose` for picks inside each span.
pub(crate) fn fill_column<F>(
    col: usize,
    n_rows: usize,
    spans: &[(usize, usize)],
    mut choose: F,
) -> Result<Vec<bool>>
where
    F: FnMut(usize, usize) -> Vec<usize>,
{
    let mut out = vec![false; n_rows];
    for &(from_i, to_i) in spans {
        let picks = choose(from_i, to_i);
        mark(col, &mut out, &picks, from_i, to_i)?;
    }
    Ok(out)
}

fn mark(col: usize, out: &mut [bool], picks: &[usize], from: usize, to: usize) -> Result<()> {
    for &index in picks {
        if index < from || index >= to {
            return Err(SignalError::IndexOutOfBounds {
                col,
                index,
                from,
                to,
            });
        }
        if out[index] {
            return Err(SignalError::DuplicateIndex { col, index });
        }
        out[index] = true;
    }
    Ok(())
}
