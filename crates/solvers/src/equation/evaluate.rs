use std::error::Error as StdError;

use thiserror::Error;

use chemeng_core::{EquationProblem, Model, Snapshot};

/// A type-erased error from a model or problem.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// One trial point: where the solver looked and what it found there.
#[derive(Debug, Clone)]
pub struct Evaluation<I, O, const N: usize> {
    pub x: [f64; N],
    pub residuals: [f64; N],
    pub snapshot: Snapshot<I, O>,
}

impl<I, O, const N: usize> Evaluation<I, O, N> {
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.residuals.iter().all(|r| r.is_finite())
    }
}

impl<I, O> Evaluation<I, O, 1> {
    /// The trial value of a scalar problem.
    #[must_use]
    pub fn point(&self) -> f64 {
        self.x[0]
    }

    /// The residual of a scalar problem.
    #[must_use]
    pub fn residual(&self) -> f64 {
        self.residuals[0]
    }
}

/// Which side of an evaluation failed.
#[derive(Debug, Error)]
pub enum EvalError<ME, PE> {
    #[error("model call failed")]
    Model(#[source] ME),

    /// Mapping `x` to an input, or an input and output to residuals, failed.
    #[error("problem error")]
    Problem(#[source] PE),
}

impl<ME, PE> EvalError<ME, PE>
where
    ME: StdError + Send + Sync + 'static,
    PE: StdError + Send + Sync + 'static,
{
    /// Boxes the source so solver error types need not carry its type.
    pub fn erase(self) -> EvalError<BoxError, BoxError> {
        match self {
            Self::Model(e) => EvalError::Model(Box::new(e)),
            Self::Problem(e) => EvalError::Problem(Box::new(e)),
        }
    }
}

pub type EvaluateResult<M, P, const N: usize> = Result<
    Evaluation<<M as Model>::Input, <M as Model>::Output, N>,
    EvalError<<M as Model>::Error, <P as EquationProblem<N>>::Error>,
>;

/// Builds the model input for `x`, calls the model, and computes residuals.
///
/// # Errors
///
/// Returns [`EvalError::Model`] if the call fails and [`EvalError::Problem`]
/// if building the input or the residuals fails.
pub fn evaluate<M, P, const N: usize>(
    model: &M,
    problem: &P,
    x: [f64; N],
) -> EvaluateResult<M, P, N>
where
    M: Model,
    P: EquationProblem<N, Input = M::Input, Output = M::Output>,
{
    let input = problem.input(&x).map_err(EvalError::Problem)?;
    let output = model.call(&input).map_err(EvalError::Model)?;
    let residuals = problem
        .residuals(&input, &output)
        .map_err(EvalError::Problem)?;

    Ok(Evaluation {
        x,
        residuals,
        snapshot: Snapshot::new(input, output),
    })
}
