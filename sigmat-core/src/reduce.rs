//! Map/reduce over spans delimited by occurrences.
//!
//! A span is a half-open row range `[from_i, to_i)`. Three span sources:
//! - between: each True paired with the next True in the same column
//! - between two: each True in `a` paired with the nearest later True in `b`
//! - partitions: each run of True cells, `(first row, one past last row)`
//!
//! `map_fn(col, from_i, to_i)` turns a span into a value; `reduce_fn(col, values)`
//! folds a column's values into one result. Columns with no spans hand the
//! reducer an empty slice; deciding what that means is the reducer's job.

use ndarray::ArrayView1;
use tracing::debug;

use crate::broadcast::{broadcast_events, common_shape};
use crate::columns::par_columns;
use crate::error::Result;
use crate::matrix::EventMatrix;

/// Span length in rows.
pub fn distance_map(_col: usize, from_i: usize, to_i: usize) -> f64 {
    (to_i - from_i) as f64
}

/// Mean of the non-NaN values; NaN when nothing is left.
pub fn mean_reduce(_col: usize, values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Map every span between consecutive occurrences.
pub fn map_between<M, F>(matrix: &EventMatrix, map_fn: F) -> Vec<Vec<M>>
where
    M: Send,
    F: Fn(usize, usize, usize) -> M + Sync + Send,
{
    debug!(shape = ?matrix.shape(), "mapping spans between signals");
    par_columns(matrix.n_cols(), |col| {
        map_spans(col, &between_spans(matrix.column(col)), &map_fn)
    })
}

/// Map and reduce spans between consecutive occurrences; one result per column.
pub fn map_reduce_between<M, R, F, G>(matrix: &EventMatrix, map_fn: F, reduce_fn: G) -> Vec<R>
where
    M: Send,
    R: Send,
    F: Fn(usize, usize, usize) -> M + Sync + Send,
    G: Fn(usize, &[M]) -> R + Sync + Send,
{
    debug!(shape = ?matrix.shape(), "reducing spans between signals");
    par_columns(matrix.n_cols(), |col| {
        let mapped = map_spans(col, &between_spans(matrix.column(col)), &map_fn);
        reduce_fn(col, &mapped)
    })
}

/// Map spans from each occurrence in `a` to the nearest later occurrence in `b`.
///
/// Both operands are broadcast to a common shape first.
pub fn map_between_two<M, F>(a: &EventMatrix, b: &EventMatrix, map_fn: F) -> Result<Vec<Vec<M>>>
where
    M: Send,
    F: Fn(usize, usize, usize) -> M + Sync + Send,
{
    let (a, b) = align_pair(a, b)?;
    debug!(shape = ?a.shape(), "mapping spans between two matrices");
    Ok(par_columns(a.n_cols(), |col| {
        map_spans(col, &between_two_spans(a.column(col), b.column(col)), &map_fn)
    }))
}

/// Map and reduce spans matched across two matrices; one result per column.
pub fn map_reduce_between_two<M, R, F, G>(
    a: &EventMatrix,
    b: &EventMatrix,
    map_fn: F,
    reduce_fn: G,
) -> Result<Vec<R>>
where
    M: Send,
    R: Send,
    F: Fn(usize, usize, usize) -> M + Sync + Send,
    G: Fn(usize, &[M]) -> R + Sync + Send,
{
    let (a, b) = align_pair(a, b)?;
    debug!(shape = ?a.shape(), "reducing spans between two matrices");
    Ok(par_columns(a.n_cols(), |col| {
        let spans = between_two_spans(a.column(col), b.column(col));
        reduce_fn(col, &map_spans(col, &spans, &map_fn))
    }))
}

/// Map every partition (run of True cells).
pub fn map_partitions<M, F>(matrix: &EventMatrix, map_fn: F) -> Vec<Vec<M>>
where
    M: Send,
    F: Fn(usize, usize, usize) -> M + Sync + Send,
{
    debug!(shape = ?matrix.shape(), "mapping partitions");
    par_columns(matrix.n_cols(), |col| {
        map_spans(col, &partition_spans(matrix.column(col)), &map_fn)
    })
}

/// Map and reduce partitions; one result per column.
pub fn map_reduce_partitions<M, R, F, G>(matrix: &EventMatrix, map_fn: F, reduce_fn: G) -> Vec<R>
where
    M: Send,
    R: Send,
    F: Fn(usize, usize, usize) -> M + Sync + Send,
    G: Fn(usize, &[M]) -> R + Sync + Send,
{
    debug!(shape = ?matrix.shape(), "reducing partitions");
    par_columns(matrix.n_cols(), |col| {
        let mapped = map_spans(col, &partition_spans(matrix.column(col)), &map_fn);
        reduce_fn(col, &mapped)
    })
}

/// Average distance between consecutive occurrences per column (NaN if < 2).
pub fn avg_distance(matrix: &EventMatrix) -> Vec<f64> {
    map_reduce_between(matrix, distance_map, mean_reduce)
}

/// Average distance from occurrences in `matrix` to the next occurrence in `other`.
pub fn avg_distance_to(matrix: &EventMatrix, other: &EventMatrix) -> Result<Vec<f64>> {
    map_reduce_between_two(matrix, other, distance_map, mean_reduce)
}

fn map_spans<M, F>(col: usize, spans: &[(usize, usize)], map_fn: &F) -> Vec<M>
where
    F: Fn(usize, usize, usize) -> M,
{
    spans.iter().map(|&(from_i, to_i)| map_fn(col, from_i, to_i)).collect()
}

fn align_pair(a: &EventMatrix, b: &EventMatrix) -> Result<(EventMatrix, EventMatrix)> {
    let shape = common_shape(&[a.shape(), b.shape()])?;
    Ok((broadcast_events(a, shape)?, broadcast_events(b, shape)?))
}

pub(crate) fn between_spans(values: ArrayView1<'_, bool>) -> Vec<(usize, usize)> {
    let idxs: Vec<usize> = true_rows(values);
    idxs.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Bounds after each occurrence: `(i + 1, next occurrence or column end)`.
///
/// An occurrence on the last row yields the empty bound `(T, T)`.
pub(crate) fn after_spans(values: ArrayView1<'_, bool>) -> Vec<(usize, usize)> {
    let idxs = true_rows(values);
    idxs.iter()
        .enumerate()
        .map(|(k, &i)| (i + 1, idxs.get(k + 1).copied().unwrap_or(values.len())))
        .collect()
}

pub(crate) fn between_two_spans(
    a: ArrayView1<'_, bool>,
    b: ArrayView1<'_, bool>,
) -> Vec<(usize, usize)> {
    let b_idxs = true_rows(b);
    let mut spans = Vec::new();
    let mut j = 0;
    for from_i in true_rows(a) {
        while j < b_idxs.len() && b_idxs[j] <= from_i {
            j += 1;
        }
        match b_idxs.get(j) {
            Some(&to_i) => spans.push((from_i, to_i)),
            // Later `from_i` cannot match either.
            None => break,
        }
    }
    spans
}

pub(crate) fn partition_spans(values: ArrayView1<'_, bool>) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        match (v, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, values.len()));
    }
    spans
}

fn true_rows(values: ArrayView1<'_, bool>) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, &v)| v.then_some(i))
        .collect()
}
