//! Core traits and types for chemeng.
//!
//! This crate defines the shared abstractions that the solvers and the
//! relation catalog build on:
//!
//! - [`Model`]: a callable that maps a typed input to a typed output, such as
//!   a physical relation evaluated at a trial value of its unknown
//! - [`Snapshot`]: a captured input/output pair from a model call
//! - [`Observer`]: receives solver events and optionally returns control actions
//! - [`EquationProblem`], [`OdeProblem`]: problem traits that adapt solver
//!   variables to model inputs and extract residuals or rates

mod model;
mod observer;
mod problems;

pub use observer::Observer;
pub use problems::{EquationProblem, OdeProblem};
pub use {model::Model, model::Snapshot};
