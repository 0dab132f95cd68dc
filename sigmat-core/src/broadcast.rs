//! Two-dimensional broadcasting of operands to a common shape.
//!
//! Rules per axis: equal sizes match, a size of 1 stretches to the other size,
//! anything else is rejected. Broadcast results are owned copies so callers'
//! arrays are never aliased by an operation's output.

use ndarray::Array2;

use crate::error::{Result, SignalError};
use crate::matrix::{EventMatrix, Shape};

/// Broadcast two shapes together.
pub fn broadcast_shapes(left: Shape, right: Shape) -> Result<Shape> {
    let rows = broadcast_dim(left.0, right.0);
    let cols = broadcast_dim(left.1, right.1);
    match (rows, cols) {
        (Some(rows), Some(cols)) => Ok((rows, cols)),
        _ => Err(SignalError::NotBroadcastable { left, right }),
    }
}

/// Fold `broadcast_shapes` over every shape. An empty slice has no common shape.
pub fn common_shape(shapes: &[Shape]) -> Result<Shape> {
    let (first, rest) = shapes
        .split_first()
        .ok_or_else(|| SignalError::InvalidConfig("no operands to broadcast".into()))?;
    rest.iter()
        .try_fold(*first, |acc, &shape| broadcast_shapes(acc, shape))
}

/// Owned copy of `matrix` stretched to `shape`.
pub fn broadcast_events(matrix: &EventMatrix, shape: Shape) -> Result<EventMatrix> {
    broadcast_array(matrix.as_array(), shape).map(EventMatrix::new)
}

/// Owned copy of `array` stretched to `shape`.
pub fn broadcast_array<T: Clone>(array: &Array2<T>, shape: Shape) -> Result<Array2<T>> {
    if array.dim() == shape {
        return Ok(array.clone());
    }
    // `broadcast` only stretches toward the target, so check compatibility first.
    let target = broadcast_shapes(array.dim(), shape)?;
    if target != shape {
        return Err(SignalError::NotBroadcastable {
            left: array.dim(),
            right: shape,
        });
    }
    array
        .broadcast(shape)
        .map(|view| view.to_owned())
        .ok_or(SignalError::NotBroadcastable {
            left: array.dim(),
            right: shape,
        })
}

fn broadcast_dim(a: usize, b: usize) -> Option<usize> {
    if a == b {
        Some(a)
    } else if a == 1 {
        Some(b)
    } else if b == 1 {
        Some(a)
    } else {
        None
    }
}
