use std::error::Error as StdError;

use thiserror::Error;

/// Why a list of sample times was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TimesError {
    #[error("no sample times given")]
    Empty,

    #[error("sample times must be finite")]
    NonFinite,

    #[error("sample times must be strictly increasing or strictly decreasing")]
    NotMonotonic,
}

/// Errors that can occur during RK4 integration.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid sample times: {0}")]
    InvalidTimes(#[from] TimesError),

    #[error("initial state is not finite")]
    NonFiniteInitialState,

    #[error("state became non-finite at t = {t}")]
    NonFiniteState { t: f64 },

    #[error("problem error: {0}")]
    Problem(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn problem<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Problem(Box::new(err))
    }
}
