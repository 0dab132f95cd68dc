//! Elementwise boolean algebra across several matrices.
//!
//! All operands are broadcast to one common shape, then folded left to right
//! with the chosen operator. The concatenating variant keeps one result per
//! right-hand operand instead of folding them together.

use ndarray::{concatenate, ArrayView2, Axis, Zip};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::broadcast::{broadcast_events, common_shape};
use crate::error::{Result, SignalError};
use crate::matrix::{EventMatrix, Shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolOp {
    And,
    Or,
    Xor,
}

impl BoolOp {
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            Self::And => a && b,
            Self::Or => a || b,
            Self::Xor => a ^ b,
        }
    }
}

/// Fold `first op others[0] op others[1] ...`.
pub fn combine(first: &EventMatrix, others: &[&EventMatrix], op: BoolOp) -> Result<EventMatrix> {
    let shape = operand_shape(first, others)?;
    debug!(?shape, operands = others.len() + 1, ?op, "combining signals");
    let mut acc = broadcast_events(first, shape)?.into_inner();
    for other in others {
        let view = broadcast_view(other, shape)?;
        Zip::from(&mut acc)
            .and(&view)
            .for_each(|a, &b| *a = op.apply(*a, b));
    }
    Ok(EventMatrix::new(acc))
}

pub fn and(first: &EventMatrix, others: &[&EventMatrix]) -> Result<EventMatrix> {
    combine(first, others, BoolOp::And)
}

pub fn or(first: &EventMatrix, others: &[&EventMatrix]) -> Result<EventMatrix> {
    combine(first, others, BoolOp::Or)
}

pub fn xor(first: &EventMatrix, others: &[&EventMatrix]) -> Result<EventMatrix> {
    combine(first, others, BoolOp::Xor)
}

/// One labeled result layer per right-hand operand.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledStack {
    pub labels: Vec<String>,
    pub layers: Vec<EventMatrix>,
    shape: Shape,
}

impl LabeledStack {
    pub fn get(&self, label: &str) -> Option<&EventMatrix> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|k| &self.layers[k])
    }

    /// Layers side by side: `T x (K * N)`, layer-major.
    pub fn to_columns(&self) -> Result<EventMatrix> {
        if self.layers.is_empty() {
            return Ok(EventMatrix::empty((self.shape.0, 0)));
        }
        let views: Vec<ArrayView2<'_, bool>> = self.layers.iter().map(EventMatrix::view).collect();
        let joined = concatenate(Axis(1), &views)
            .map_err(|e| SignalError::InvalidConfig(format!("cannot join layers: {e}")))?;
        Ok(EventMatrix::new(joined))
    }
}

/// `first op others[k]` for every k, kept apart under `labels[k]`.
pub fn combine_concat(
    first: &EventMatrix,
    others: &[&EventMatrix],
    op: BoolOp,
    labels: &[String],
) -> Result<LabeledStack> {
    if labels.len() != others.len() {
        return Err(SignalError::LabelCount {
            axis: "layer",
            expected: others.len(),
            actual: labels.len(),
        });
    }
    let shape = operand_shape(first, others)?;
    debug!(?shape, layers = others.len(), ?op, "combining signals into layers");
    let base = broadcast_events(first, shape)?;
    let layers = others
        .iter()
        .map(|other| {
            let view = broadcast_view(other, shape)?;
            let mut layer = base.as_array().clone();
            Zip::from(&mut layer)
                .and(&view)
                .for_each(|a, &b| *a = op.apply(*a, b));
            Ok(EventMatrix::new(layer))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(LabeledStack {
        labels: labels.to_vec(),
        layers,
        shape,
    })
}

fn operand_shape(first: &EventMatrix, others: &[&EventMatrix]) -> Result<Shape> {
    let shapes: Vec<Shape> = std::iter::once(first.shape())
        .chain(others.iter().map(|m| m.shape()))
        .collect();
    common_shape(&shapes)
}

fn broadcast_view<'a>(matrix: &'a EventMatrix, shape: Shape) -> Result<ArrayView2<'a, bool>> {
    matrix
        .as_array()
        .broadcast(shape)
        .ok_or(SignalError::NotBroadcastable {
            left: matrix.shape(),
            right: shape,
        })
}
