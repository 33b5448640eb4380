use std::error::Error as StdError;

use thiserror::Error;

use crate::equation::{BoxError, EvalError};

use super::bracket::BracketError;

/// Why a bisection solve stopped without a result.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid bracket: {0}")]
    InvalidBracket(#[from] BracketError),

    #[error("residual is not finite at x = {x}: {residual}")]
    NonFiniteResidual { x: f64, residual: f64 },

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
