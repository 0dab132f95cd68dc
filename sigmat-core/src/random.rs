//! Randomized signal placement with count and spacing constraints.
//!
//! Per column (or per gap after an existing signal) a count `n` is drawn from
//! `n_range`, uniformly or weighted by `n_prob`, and `n` rows are placed
//! uniformly at random so that any two picks are at least `min_space + 1`
//! rows apart. When `n` picks do not fit, as many as fit are placed.
//!
//! Placement maps the problem onto choosing `n` distinct offsets from the
//! compressed range `L - (n - 1) * min_space` and spreading the sorted offsets
//! back out by `k * min_space`, which is uniform over all valid layouts.

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::columns::{assemble, try_par_columns};
use crate::error::{Result, SignalError};
use crate::generate::fill_column;
use crate::matrix::{EventMatrix, Shape};
use crate::reduce::after_spans;
use crate::rng::{SeedHierarchy, STREAM_RANDOM, STREAM_RANDOM_AFTER};

/// How many signals to draw and how far apart to keep them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomSpec {
    /// Candidate counts.
    pub n_range: Vec<usize>,
    /// Optional weight per candidate count; normalized internally.
    #[serde(default)]
    pub n_prob: Option<Vec<f64>>,
    /// Minimum number of free rows between two picks.
    #[serde(default)]
    pub min_space: usize,
}

impl RandomSpec {
    pub fn new(n_range: Vec<usize>) -> Self {
        Self {
            n_range,
            n_prob: None,
            min_space: 0,
        }
    }

    /// Always draw exactly `n`.
    pub fn exactly(n: usize) -> Self {
        Self::new(vec![n])
    }

    pub fn with_prob(mut self, n_prob: Vec<f64>) -> Self {
        self.n_prob = Some(n_prob);
        self
    }

    pub fn with_min_space(mut self, min_space: usize) -> Self {
        self.min_space = min_space;
        self
    }

    pub fn validate(&self) -> Result<()> {
        CountSampler::new(self).map(|_| ())
    }
}

/// Draws a signal count from a validated spec.
#[derive(Debug, Clone)]
enum CountSampler<'a> {
    Uniform(&'a [usize]),
    Weighted(&'a [usize], WeightedIndex<f64>),
}

impl<'a> CountSampler<'a> {
    fn new(spec: &'a RandomSpec) -> Result<Self> {
        if spec.n_range.is_empty() {
            return Err(SignalError::InvalidRandomSpec("n_range is empty".into()));
        }
        match &spec.n_prob {
            None => Ok(Self::Uniform(&spec.n_range)),
            Some(prob) => {
                if prob.len() != spec.n_range.len() {
                    return Err(SignalError::InvalidRandomSpec(format!(
                        "n_prob has {} weights for {} counts",
                        prob.len(),
                        spec.n_range.len()
                    )));
                }
                let weights = WeightedIndex::new(prob)
                    .map_err(|e| SignalError::InvalidRandomSpec(format!("n_prob: {e}")))?;
                Ok(Self::Weighted(&spec.n_range, weights))
            }
        }
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> usize {
        match self {
            Self::Uniform(range) => range.choose(rng).copied().unwrap_or(0),
            Self::Weighted(range, weights) => range[weights.sample(rng)],
        }
    }
}

/// Place random signals in every column of a fresh `shape` matrix.
///
/// The same `seed`, shape and spec always produce the same matrix. `None`
/// seeds this call from OS entropy.
pub fn generate_random(shape: Shape, spec: &RandomSpec, seed: Option<u64>) -> Result<EventMatrix> {
    let sampler = CountSampler::new(spec)?;
    let seeds = SeedHierarchy::from_option(seed);
    let (n_rows, n_cols) = shape;
    debug!(
        ?shape,
        seed = seeds.master_seed(),
        min_space = spec.min_space,
        "generating random signals"
    );

    let cols = try_par_columns(n_cols, |col| {
        let mut rng = seeds.rng_for(STREAM_RANDOM, col);
        fill_column(col, n_rows, &[(0, n_rows)], |from_i, to_i| {
            let n = sampler.draw(&mut rng);
            trace!(col, n, "drawn signal count");
            place_spaced(&mut rng, from_i, to_i, n, spec.min_space)
        })
    })?;
    Ok(EventMatrix::new(assemble(n_rows, &cols)))
}

/// Place random signals in the gap after each signal of `matrix`.
///
/// Gaps are `[i + 1, next signal)`; a count is drawn per gap.
pub fn generate_random_after(
    matrix: &EventMatrix,
    spec: &RandomSpec,
    seed: Option<u64>,
) -> Result<EventMatrix> {
    let sampler = CountSampler::new(spec)?;
    let seeds = SeedHierarchy::from_option(seed);
    let n_rows = matrix.n_rows();
    debug!(
        shape = ?matrix.shape(),
        seed = seeds.master_seed(),
        min_space = spec.min_space,
        "generating random signals after existing signals"
    );

    let cols = try_par_columns(matrix.n_cols(), |col| {
        let mut rng = seeds.rng_for(STREAM_RANDOM_AFTER, col);
        let spans = after_spans(matrix.column(col));
        fill_column(col, n_rows, &spans, |from_i, to_i| {
            let n = sampler.draw(&mut rng);
            place_spaced(&mut rng, from_i, to_i, n, spec.min_space)
        })
    })?;
    Ok(EventMatrix::new(assemble(n_rows, &cols)))
}

/// Up to `n` ascending rows in `[from_i, to_i)`, pairwise at least
/// `min_space + 1` apart.
pub(crate) fn place_spaced<R: Rng>(
    rng: &mut R,
    from_i: usize,
    to_i: usize,
    n: usize,
    min_space: usize,
) -> Vec<usize> {
    let len = to_i.saturating_sub(from_i);
    if len == 0 || n == 0 {
        return Vec::new();
    }
    let max_fit = (len - 1) / min_space.saturating_add(1) + 1;
    let n = n.min(max_fit);
    let compressed = len - (n - 1) * min_space;

    let mut offsets = index::sample(rng, compressed, n).into_vec();
    offsets.sort_unstable();
    offsets
        .into_iter()
        .enumerate()
        .map(|(k, offset)| from_i + offset + k * min_space)
        .collect()
}
