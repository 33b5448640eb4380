use std::error::Error as StdError;

use thiserror::Error;

use crate::equation::{BoxError, EvalError};

/// Why a secant solve stopped without a result.
#[derive(Debug, Error)]
pub enum Error {
    #[error("seed must be finite, got {seed}")]
    NonFiniteSeed { seed: f64 },

    #[error("no convergence after {iters} iterations: r({x}) = {residual}")]
    MaxIters { x: f64, residual: f64, iters: usize },

    #[error("residual is not finite at x = {x}: {residual}")]
    NonFiniteResidual { x: f64, residual: f64 },

    #[error("steps stalled at x = {x} after {iters} iterations with r = {residual} above tolerance")]
    Stalled { x: f64, residual: f64, iters: usize },

    #[error("residual is flat near x = {x} (r = {residual}); secant step undefined")]
    FlatResidual { x: f64, residual: f64 },

    #[error("problem error")]
    Problem(#[source] BoxError),

    #[error("model call failed")]
    Model(#[source] BoxError),
}

impl<ME, PE> From<EvalError<ME, PE>> for Error
where
    ME: StdError + Send + Sync + 'static,
    PE: StdError + Send + Sync + 'static,
{
    fn from(err: EvalError<ME, PE>) -> Self {
        match err.erase() {
            EvalError::Model(e) => Self::Model(e),
            EvalError::Problem(e) => Self::Problem(e),
        }
    }
}
