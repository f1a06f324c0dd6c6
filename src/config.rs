//! Caller-side resource bounds.
//!
//! The computational modules accept any input size; their cost grows with
//! the sieve limit, matrix dimension or sample length they are handed.
//! [`EngineLimits`] is the explicit policy a caller applies before invoking
//! them. Nothing in the core enforces it on its own.

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, Result};
use crate::matrix::Matrix;

/// Upper bounds on user-supplied sizes.
///
/// Missing fields take their [`Default`] values when deserialized.
///
/// # Examples
/// ```
/// use u_calc::config::EngineLimits;
/// let limits = EngineLimits::from_json(r#"{ "max_matrix_dim": 8 }"#).unwrap();
/// assert_eq!(limits.max_matrix_dim, 8);
/// assert_eq!(limits.max_sieve_limit, EngineLimits::default().max_sieve_limit);
/// assert!(limits.check_sieve(1_000).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineLimits {
    /// Largest limit accepted by the sieve and the sieve-derived utilities.
    pub max_sieve_limit: u64,

    /// Largest `n` accepted by `nth_prime`.
    pub max_nth_prime: u64,

    /// Largest row or column count of a matrix operand.
    pub max_matrix_dim: usize,

    /// Largest sample handed to the statistics functions.
    pub max_sample_size: usize,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_sieve_limit: 10_000_000,
            max_nth_prime: 1_000_000,
            max_matrix_dim: 5,
            max_sample_size: 100_000,
        }
    }
}

impl EngineLimits {
    /// Parses limits from a JSON document.
    ///
    /// # Errors
    /// [`CalcError::Config`] if the document is malformed or a limit is zero.
    pub fn from_json(json: &str) -> Result<Self> {
        let limits: EngineLimits = serde_json::from_str(json).map_err(|e| {
            tracing::warn!(error = %e, "rejected engine limits document");
            CalcError::Config(e.to_string())
        })?;
        limits.validate()?;
        tracing::debug!(?limits, "loaded engine limits");
        Ok(limits)
    }

    /// Checks that every bound is non-zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_sieve_limit == 0
            || self.max_nth_prime == 0
            || self.max_matrix_dim == 0
            || self.max_sample_size == 0
        {
            return Err(CalcError::Config("limits must be positive".into()));
        }
        Ok(())
    }

    /// Rejects sieve limits above `max_sieve_limit`.
    pub fn check_sieve(&self, limit: u64) -> Result<()> {
        check("sieve limit", limit, self.max_sieve_limit)
    }

    /// Rejects `nth_prime` arguments above `max_nth_prime`.
    pub fn check_nth_prime(&self, n: u64) -> Result<()> {
        check("nth prime", n, self.max_nth_prime)
    }

    /// Rejects matrices with more than `max_matrix_dim` rows or columns.
    pub fn check_matrix(&self, m: &Matrix) -> Result<()> {
        let max = self.max_matrix_dim as u64;
        check("matrix rows", m.rows() as u64, max)?;
        check("matrix cols", m.cols() as u64, max)
    }

    /// Rejects samples longer than `max_sample_size`.
    pub fn check_sample(&self, data: &[f64]) -> Result<()> {
        check("sample size", data.len() as u64, self.max_sample_size as u64)
    }
}

fn check(what: &'static str, value: u64, max: u64) -> Result<()> {
    if value > max {
        return Err(CalcError::LimitExceeded { what, value, max });
    }
    Ok(())
}
