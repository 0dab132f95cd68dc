//! sigmat core: vectorized operations over boolean event matrices.
//!
//! An event matrix is a T x N grid of booleans (time steps by independent
//! series). This crate provides:
//! - Occurrence ranking and partition ranking with resets
//! - Span mapping and per-column reductions between occurrences
//! - Signal generation from choice functions and seeded random placement
//! - Stop-loss, trailing-stop and take-profit exits over configuration stacks
//! - Broadcasting boolean combinators
//!
//! Every operation treats columns independently and runs them on the rayon
//! pool. Inputs are borrowed and never modified.

pub mod broadcast;
mod columns;
pub mod combine;
pub mod config;
pub mod error;
pub mod generate;
pub mod matrix;
pub mod random;
pub mod rank;
pub mod reduce;
pub mod rng;
pub mod stack;
pub mod stop;
pub mod transform;

pub use combine::{and, combine, combine_concat, or, xor, BoolOp, LabeledStack};
pub use config::{RankSettings, SignalConfig};
pub use error::{Result, SignalError};
pub use generate::{generate, generate_after, generate_iteratively};
pub use matrix::{EventMatrix, PriceMatrix, RankMatrix, Shape};
pub use random::{generate_random, generate_random_after, RandomSpec};
pub use rank::{first, from_nst, nst, rank, rank_partitions, RankOptions};
pub use stack::ConfigStack;
pub use stop::{
    generate_stop_loss, generate_take_profit, StopExits, StopLossOptions, TakeProfitOptions,
};
