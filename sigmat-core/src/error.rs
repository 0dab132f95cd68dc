//! Structured error types for matrix operations.
//!
//! Every variant is raised before a scan starts or aborts the whole call, so a
//! failed operation never hands back a partially computed matrix.

use thiserror::Error;

/// Errors produced by signal-matrix operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    #[error("shape mismatch for {what}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("shapes {left:?} and {right:?} cannot be broadcast together")]
    NotBroadcastable {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("invalid config stack: {0}")]
    InvalidConfigStack(String),

    #[error("{axis} label count {actual} does not match dimension {expected}")]
    LabelCount {
        axis: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("column {col}: index {index} outside range [{from}, {to})")]
    IndexOutOfBounds {
        col: usize,
        index: usize,
        from: usize,
        to: usize,
    },

    #[error("column {col}: index {index} returned more than once")]
    DuplicateIndex { col: usize, index: usize },

    #[error("invalid random spec: {0}")]
    InvalidRandomSpec(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SignalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let err = SignalError::IndexOutOfBounds {
            col: 2,
            index: 7,
            from: 0,
            to: 5,
        };
        assert_eq!(err.to_string(), "column 2: index 7 outside range [0, 5)");

        let err = SignalError::NotBroadcastable {
            left: (5, 3),
            right: (4, 3),
        };
        assert!(err.to_string().contains("(5, 3)"));
    }
}
