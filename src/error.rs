//! Error taxonomy shared by every calculator module.
//!
//! Operations whose "no result" is an ordinary outcome (an empty sample, a
//! proper fraction asked for its mixed form) return `Option` instead.

use thiserror::Error;

/// All errors returned by `u-calc`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// Non-finite or out-of-domain numeric input, including results that
    /// overflow the integer type they must be reported in.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Matrix operand shapes are incompatible.
    #[error("dimension mismatch: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        /// Shape the operation required, as `[rows, cols]`.
        expected: Vec<usize>,
        /// Shape that was supplied.
        got: Vec<usize>,
    },

    /// A pivot fell below the singularity threshold.
    #[error("singular matrix")]
    Singular,

    /// Zero denominator, or division by a zero fraction.
    #[error("division by zero")]
    DivisionByZero,

    /// The unit id does not exist in the category.
    #[error("unit `{unit}` not found in category `{category}`")]
    UnitNotFound {
        /// Category that was searched.
        category: String,
        /// Unit id that was requested.
        unit: String,
    },

    /// The category id does not exist in the registry.
    #[error("category `{0}` not found")]
    CategoryNotFound(String),

    /// Infeasible Diophantine equation or impossible triangle.
    #[error("no solution: {0}")]
    NoSolution(String),

    /// A configured caller-side bound was exceeded.
    #[error("{what} = {value} exceeds configured maximum {max}")]
    LimitExceeded {
        /// Name of the bounded quantity.
        what: &'static str,
        /// Requested value.
        value: u64,
        /// Configured maximum.
        max: u64,
    },

    /// Malformed configuration or unit-table document.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout `u-calc`.
pub type Result<T> = std::result::Result<T, CalcError>;
