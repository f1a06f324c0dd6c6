//! # u-calc
//!
//! Computational core of a multi-purpose calculator suite.
//!
//! This crate provides pure, stateless calculation engines for unit
//! conversion, matrix algebra, number theory, descriptive statistics,
//! triangle solving and exact fraction arithmetic. It knows nothing about
//! input forms, rendering, or any presentation layer.
//!
//! ## Modules
//!
//! - [`units`]: Unit conversion through a per-category base unit
//! - [`matrix`]: Dense matrices, determinant and inverse with partial pivoting
//! - [`number_theory`]: GCD/LCM, Bézout, Miller-Rabin, factorization, sieves
//! - [`stats`]: Descriptive statistics, confidence intervals, regression
//! - [`triangle`]: SSS/SAS/ASA/right-triangle solving and classification
//! - [`fraction`]: Canonical `i64` fractions with overflow-checked arithmetic
//! - [`config`]: Caller-side resource limits loaded from JSON
//! - [`error`]: The shared [`CalcError`] taxonomy
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: no caching, no shared state, every type `Send + Sync`
//! - **Numerical stability first**: partial pivoting with an explicit
//!   singularity threshold, Neumaier summation for accumulation
//! - **Errors are values**: invalid input yields [`CalcError`] or `None`,
//!   never a panic or a silently degenerate result
//! - **Property-based testing**: mathematical invariants verified via proptest

pub mod config;
pub mod error;
pub mod fraction;
pub mod matrix;
pub mod number_theory;
pub mod stats;
pub mod triangle;
pub mod units;

pub use error::{CalcError, Result};
