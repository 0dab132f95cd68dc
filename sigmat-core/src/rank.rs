//! Per-column occurrence ranking.
//!
//! A partition is a maximal run of consecutive True cells. `rank` numbers the
//! True cells inside their partition (or, with `allow_gaps`, inside their
//! reset-delimited segment); `rank_partitions` numbers the partitions
//! themselves and gives every cell of a partition the same value.
//!
//! Both share one scan per column with three counters: signals since reset,
//! partitions since reset, and signals in the current partition.

use ndarray::ArrayView1;
use tracing::debug;

use crate::broadcast::broadcast_events;
use crate::columns::{assemble, par_columns};
use crate::error::Result;
use crate::matrix::{EventMatrix, RankMatrix};

/// Ranking options.
///
/// `reset_by` must broadcast to the ranked matrix's shape. Wherever it is
/// True, all counters restart at that row before the row's own cell is
/// evaluated.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankOptions<'a> {
    pub reset_by: Option<&'a EventMatrix>,
    /// Ignore True cells until the column has shown at least one False.
    pub after_false: bool,
    /// Keep counting across False cells (only resets restart the count).
    pub allow_gaps: bool,
}

impl<'a> RankOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_by(mut self, reset_by: &'a EventMatrix) -> Self {
        self.reset_by = Some(reset_by);
        self
    }

    pub fn after_false(mut self, after_false: bool) -> Self {
        self.after_false = after_false;
        self
    }

    pub fn allow_gaps(mut self, allow_gaps: bool) -> Self {
        self.allow_gaps = allow_gaps;
        self
    }
}

#[derive(Debug, Clone, Copy)]
enum RankMode {
    Signal { allow_gaps: bool },
    Partition,
}

/// Rank each True cell. False cells read 0.
pub fn rank(matrix: &EventMatrix, options: &RankOptions<'_>) -> Result<RankMatrix> {
    debug!(
        shape = ?matrix.shape(),
        reset = options.reset_by.is_some(),
        after_false = options.after_false,
        allow_gaps = options.allow_gaps,
        "ranking signals"
    );
    rank_with_mode(
        matrix,
        options,
        RankMode::Signal {
            allow_gaps: options.allow_gaps,
        },
    )
}

/// Rank each partition; every cell of a partition gets the partition's index.
///
/// `allow_gaps` has no effect here.
pub fn rank_partitions(matrix: &EventMatrix, options: &RankOptions<'_>) -> Result<RankMatrix> {
    debug!(
        shape = ?matrix.shape(),
        reset = options.reset_by.is_some(),
        after_false = options.after_false,
        "ranking partitions"
    );
    rank_with_mode(matrix, options, RankMode::Partition)
}

/// Cells with rank 1.
pub fn first(matrix: &EventMatrix, options: &RankOptions<'_>) -> Result<EventMatrix> {
    Ok(rank(matrix, options)?.eq_mask(1))
}

/// Cells with rank exactly `n`.
pub fn nst(matrix: &EventMatrix, n: u32, options: &RankOptions<'_>) -> Result<EventMatrix> {
    Ok(rank(matrix, options)?.eq_mask(n))
}

/// Cells with rank `n` or higher.
pub fn from_nst(matrix: &EventMatrix, n: u32, options: &RankOptions<'_>) -> Result<EventMatrix> {
    Ok(rank(matrix, options)?.ge_mask(n))
}

fn rank_with_mode(
    matrix: &EventMatrix,
    options: &RankOptions<'_>,
    mode: RankMode,
) -> Result<RankMatrix> {
    let reset_by = options
        .reset_by
        .map(|r| broadcast_events(r, matrix.shape()))
        .transpose()?;

    let cols = par_columns(matrix.n_cols(), |col| {
        rank_column(
            matrix.column(col),
            reset_by.as_ref().map(|r| r.column(col)),
            options.after_false,
            mode,
        )
    });
    Ok(RankMatrix::new(assemble(matrix.n_rows(), &cols)))
}

fn rank_column(
    values: ArrayView1<'_, bool>,
    reset_by: Option<ArrayView1<'_, bool>>,
    after_false: bool,
    mode: RankMode,
) -> Vec<u32> {
    let mut out = vec![0u32; values.len()];
    let mut false_seen = !after_false;
    let mut in_partition = false;
    let mut sig_cnt = 0u32;
    let mut part_cnt = 0u32;
    let mut sig_in_part_cnt = 0u32;

    for (i, &value) in values.iter().enumerate() {
        let reset = reset_by.as_ref().is_some_and(|r| r[i]);
        if reset {
            sig_cnt = 0;
            part_cnt = 0;
            sig_in_part_cnt = 0;
        }

        if !value {
            in_partition = false;
            sig_in_part_cnt = 0;
            false_seen = true;
            continue;
        }
        if !false_seen {
            continue;
        }

        sig_cnt += 1;
        // A reset inside a run opens a new partition at this row.
        if !in_partition || reset {
            part_cnt += 1;
            in_partition = true;
        }
        sig_in_part_cnt += 1;

        out[i] = match mode {
            RankMode::Signal { allow_gaps: true } => sig_cnt,
            RankMode::Signal { allow_gaps: false } => sig_in_part_cnt,
            RankMode::Partition => part_cnt,
        };
    }
    out
}
