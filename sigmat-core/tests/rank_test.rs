//! Integration tests for occurrence ranking.
//!
//! Tests:
//! 1. Basic, gap-tolerant and after-false ranking on single columns.
//! 2. Resets broadcast from a single column across a wider matrix.
//! 3. Partition ranking and the run-count law.
//! 4. first / nst / from_nst selections.

use sigmat_core::{first, from_nst, nst, rank, rank_partitions, EventMatrix, RankOptions, SignalError};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn col(values: &[u8]) -> EventMatrix {
    EventMatrix::from_column(&values.iter().map(|&v| v == 1).collect::<Vec<_>>())
}

/// Two-column matrix from per-column 0/1 slices of equal length.
fn cols2(a: &[u8], b: &[u8]) -> EventMatrix {
    let rows = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| vec![x == 1, y == 1])
        .collect::<Vec<_>>();
    EventMatrix::from_rows(&rows).unwrap()
}

// ──────────────────────────────────────────────
// 1. Signal ranking
// ──────────────────────────────────────────────

#[test]
fn rank_restarts_on_every_false() {
    let m = col(&[0, 1, 1, 0, 1]);
    let ranks = rank(&m, &RankOptions::new()).unwrap();
    assert_eq!(ranks.column_vec(0), vec![0, 1, 2, 0, 1]);
}

#[test]
fn allow_gaps_counts_across_false() {
    let m = col(&[0, 1, 1, 0, 1]);
    let ranks = rank(&m, &RankOptions::new().allow_gaps(true)).unwrap();
    assert_eq!(ranks.column_vec(0), vec![0, 1, 2, 0, 3]);
}

#[test]
fn after_false_skips_leading_run() {
    let m = col(&[1, 0, 1, 1, 0]);
    assert_eq!(
        rank(&m, &RankOptions::new()).unwrap().column_vec(0),
        vec![1, 0, 1, 2, 0]
    );
    assert_eq!(
        rank(&m, &RankOptions::new().after_false(true))
            .unwrap()
            .column_vec(0),
        vec![0, 0, 1, 2, 0]
    );
}

#[test]
fn all_false_column_has_no_ranks() {
    let m = EventMatrix::empty((6, 3));
    let ranks = rank(&m, &RankOptions::new()).unwrap();
    assert_eq!(ranks.max_per_column(), vec![0, 0, 0]);
    let parts = rank_partitions(&m, &RankOptions::new()).unwrap();
    assert_eq!(parts.max_per_column(), vec![0, 0, 0]);
}

// ──────────────────────────────────────────────
// 2. Resets
// ──────────────────────────────────────────────

#[test]
fn reset_column_broadcasts_across_matrix() {
    let m = cols2(&[1, 1, 0, 1, 1, 1], &[0, 1, 1, 1, 0, 1]);
    let reset = col(&[0, 0, 0, 1, 0, 0]);
    let options = RankOptions::new().reset_by(&reset);

    let ranks = rank(&m, &options).unwrap();
    assert_eq!(ranks.column_vec(0), vec![1, 2, 0, 1, 2, 3]);
    assert_eq!(ranks.column_vec(1), vec![0, 1, 2, 1, 0, 1]);

    let gaps = rank(&m, &options.allow_gaps(true)).unwrap();
    assert_eq!(gaps.column_vec(0), vec![1, 2, 0, 1, 2, 3]);
    assert_eq!(gaps.column_vec(1), vec![0, 1, 2, 1, 0, 2]);

    let parts = rank_partitions(&m, &options).unwrap();
    assert_eq!(parts.column_vec(0), vec![1, 1, 0, 1, 1, 1]);
    assert_eq!(parts.column_vec(1), vec![0, 1, 1, 1, 0, 2]);
}

#[test]
fn reset_shape_must_broadcast() {
    let m = EventMatrix::empty((5, 2));
    let reset = EventMatrix::empty((4, 1));
    let err = rank(&m, &RankOptions::new().reset_by(&reset)).unwrap_err();
    assert!(matches!(err, SignalError::NotBroadcastable { .. }));
}

// ──────────────────────────────────────────────
// 3. Partitions
// ──────────────────────────────────────────────

#[test]
fn partitions_share_one_rank() {
    let m = col(&[1, 1, 0, 1, 0, 0, 1, 1, 1]);
    let parts = rank_partitions(&m, &RankOptions::new()).unwrap();
    assert_eq!(parts.column_vec(0), vec![1, 1, 0, 2, 0, 0, 3, 3, 3]);
    assert_eq!(parts.max_per_column(), vec![3]);
}

#[test]
fn partition_ranking_ignores_allow_gaps() {
    let m = col(&[1, 0, 1, 1]);
    let plain = rank_partitions(&m, &RankOptions::new()).unwrap();
    let gaps = rank_partitions(&m, &RankOptions::new().allow_gaps(true)).unwrap();
    assert_eq!(plain, gaps);
}

#[test]
fn partitions_after_false() {
    let m = col(&[1, 1, 0, 1, 0, 1]);
    let parts = rank_partitions(&m, &RankOptions::new().after_false(true)).unwrap();
    assert_eq!(parts.column_vec(0), vec![0, 0, 0, 1, 0, 2]);
}

// ──────────────────────────────────────────────
// 4. Selections
// ──────────────────────────────────────────────

#[test]
fn first_nst_and_from_nst() {
    let m = col(&[1, 1, 0, 1, 1, 1]);
    let options = RankOptions::new();
    assert_eq!(first(&m, &options).unwrap().true_indices(0), vec![0, 3]);
    assert_eq!(nst(&m, 2, &options).unwrap().true_indices(0), vec![1, 4]);
    assert_eq!(from_nst(&m, 2, &options).unwrap().true_indices(0), vec![1, 4, 5]);
}

#[test]
fn first_with_gaps_is_first_per_reset_segment() {
    let m = col(&[1, 0, 1, 1, 0, 1]);
    let reset = col(&[0, 0, 0, 0, 1, 0]);
    let options = RankOptions::new().allow_gaps(true).reset_by(&reset);
    assert_eq!(first(&m, &options).unwrap().true_indices(0), vec![0, 5]);
}
