//! Solvers for equation problems: finding roots of a residual.
//!
//! An [`EquationProblem`] maps solver variables `x: [f64; N]` to model inputs,
//! calls the model, and computes residuals. Solvers in this module drive those
//! residuals toward zero.
//!
//! # Solvers
//!
//! - [`scan`]: evaluates a fixed grid and reports every sign change
//! - [`bisection`]: guaranteed convergence on a bracketed interval
//! - [`secant`]: derivative-free iteration from a single seed
//!
//! [`EquationProblem`]: chemeng_core::EquationProblem

mod best;
mod evaluate;
mod solution;

pub use evaluate::{BoxError, EvalError, EvaluateResult, Evaluation, evaluate};
pub use solution::{Solution, Status};

pub mod bisection;
pub mod scan;
pub mod secant;
