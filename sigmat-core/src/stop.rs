//! Exit signals derived from entries and a price path.
//!
//! Stop-loss exits fire when price falls to `ref * (1 - stop)` (relative) or
//! `ref - stop` (absolute); take-profit exits fire when price rises to
//! `ref * (1 + stop)` or `ref + stop`. `ref` is the price at the most recent
//! entry, or for a trailing stop-loss the highest price seen since that entry.
//! Take-profit never trails.
//!
//! Each configuration of the `ConfigStack` produces its own block of N output
//! columns, in stack order.

use ndarray::{s, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::columns::{assemble, par_columns};
use crate::error::Result;
use crate::matrix::{ensure_shape, EventMatrix, PriceMatrix};
use crate::stack::ConfigStack;

/// Which way the stop points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopSide {
    Loss,
    Profit,
}

/// Stop-loss options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopLossOptions {
    /// Measure from the running high since entry instead of the entry price.
    pub trailing: bool,
    /// Stops are fractions of the reference price rather than price distances.
    pub relative: bool,
    /// Only the first exit after each entry.
    pub first: bool,
}

impl Default for StopLossOptions {
    fn default() -> Self {
        Self {
            trailing: false,
            relative: true,
            first: true,
        }
    }
}

/// Take-profit options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TakeProfitOptions {
    pub relative: bool,
    pub first: bool,
}

impl Default for TakeProfitOptions {
    fn default() -> Self {
        Self {
            relative: true,
            first: true,
        }
    }
}

/// Exit matrix of shape `T x (K * N)` plus one label per configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StopExits {
    pub exits: EventMatrix,
    pub labels: Vec<String>,
    n_base_cols: usize,
}

impl StopExits {
    pub fn n_configs(&self) -> usize {
        self.labels.len()
    }

    /// The `T x N` block produced by configuration `k`, or `None` past the
    /// last configuration.
    pub fn config_block(&self, k: usize) -> Option<EventMatrix> {
        if k >= self.n_configs() {
            return None;
        }
        let n = self.n_base_cols;
        Some(EventMatrix::new(
            self.exits
                .as_array()
                .slice(s![.., k * n..(k + 1) * n])
                .to_owned(),
        ))
    }
}

#[derive(Debug, Clone, Copy)]
struct StopRule {
    side: StopSide,
    trailing: bool,
    relative: bool,
    first: bool,
}

impl StopRule {
    fn threshold(&self, reference: f64, stop: f64) -> f64 {
        match (self.side, self.relative) {
            (StopSide::Loss, true) => reference * (1.0 - stop),
            (StopSide::Loss, false) => reference - stop,
            (StopSide::Profit, true) => reference * (1.0 + stop),
            (StopSide::Profit, false) => reference + stop,
        }
    }

    fn hits(&self, price: f64, threshold: f64) -> bool {
        match self.side {
            StopSide::Loss => price <= threshold,
            StopSide::Profit => price >= threshold,
        }
    }
}

/// Stop-loss exits for every configuration in `stops`.
pub fn generate_stop_loss(
    entries: &EventMatrix,
    price: &PriceMatrix,
    stops: &ConfigStack,
    options: &StopLossOptions,
) -> Result<StopExits> {
    let rule = StopRule {
        side: StopSide::Loss,
        trailing: options.trailing,
        relative: options.relative,
        first: options.first,
    };
    let name = if options.trailing {
        "trail_stop"
    } else {
        "stop_loss"
    };
    generate_stops(entries, price, stops, rule, name)
}

/// Take-profit exits for every configuration in `stops`.
pub fn generate_take_profit(
    entries: &EventMatrix,
    price: &PriceMatrix,
    stops: &ConfigStack,
    options: &TakeProfitOptions,
) -> Result<StopExits> {
    let rule = StopRule {
        side: StopSide::Profit,
        trailing: false,
        relative: options.relative,
        first: options.first,
    };
    generate_stops(entries, price, stops, rule, "take_profit")
}

fn generate_stops(
    entries: &EventMatrix,
    price: &PriceMatrix,
    stops: &ConfigStack,
    rule: StopRule,
    name: &str,
) -> Result<StopExits> {
    ensure_shape("price", entries.shape(), price.dim())?;
    let configs = stops.broadcast_to(entries.shape())?;
    let (n_rows, n_cols) = entries.shape();
    debug!(
        shape = ?entries.shape(),
        configs = configs.len(),
        side = ?rule.side,
        trailing = rule.trailing,
        relative = rule.relative,
        first = rule.first,
        "generating stop exits"
    );

    let cols = par_columns(configs.len() * n_cols, |out_col| {
        let (k, col) = (out_col / n_cols, out_col % n_cols);
        let exits = stop_column(
            entries.column(col),
            price.index_axis(Axis(1), col),
            configs[k].index_axis(Axis(1), col),
            rule,
        );
        trace!(config = k, col, exits = exits.iter().filter(|&&e| e).count(), "stop column done");
        exits
    });

    Ok(StopExits {
        exits: EventMatrix::new(assemble(n_rows, &cols)),
        labels: stops.labels(name),
        n_base_cols: n_cols,
    })
}

fn stop_column(
    entries: ArrayView1<'_, bool>,
    price: ArrayView1<'_, f64>,
    stops: ArrayView1<'_, f64>,
    rule: StopRule,
) -> Vec<bool> {
    let mut out = vec![false; entries.len()];
    // None until the first entry: nothing can exit before it.
    let mut anchor: Option<f64> = None;
    let mut running_max = f64::NAN;
    let mut hit = false;

    for i in 0..entries.len() {
        if entries[i] {
            anchor = Some(price[i]);
            running_max = price[i];
            hit = false;
            continue;
        }
        let Some(anchor) = anchor else {
            continue;
        };
        if rule.first && hit {
            continue;
        }

        let p = price[i];
        if rule.trailing {
            running_max = running_max.max(p);
        }
        let reference = if rule.trailing { running_max } else { anchor };
        if rule.hits(p, rule.threshold(reference, stops[i])) {
            out[i] = true;
            hit = true;
        }
    }
    out
}
