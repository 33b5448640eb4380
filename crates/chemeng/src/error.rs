use std::error::Error as StdError;

use thiserror::Error;

use chemeng_units::{IncompatibleUnits, ParseError};

use crate::{context::Point, formulate::FormulationError};

/// A context that cannot be solved as given.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("no variable is marked unknown")]
    NoUnknown,

    #[error("exactly one unknown is allowed, found {}", slots.join(", "))]
    MultipleUnknowns { slots: Vec<String> },

    #[error("{point} `{name}` is listed twice")]
    DuplicateVariable { name: String, point: Point },

    #[error("invalid value for {point} `{name}`")]
    InvalidValue {
        name: String,
        point: Point,
        #[source]
        source: ParseError,
    },

    #[error("invalid output unit `{unit}`")]
    InvalidOutputUnit {
        unit: String,
        #[source]
        source: ParseError,
    },

    #[error("{relation} needs {point} `{name}`")]
    MissingVariable {
        name: String,
        point: Point,
        relation: &'static str,
    },

    #[error("{relation} has no {point} variable `{name}` to solve for")]
    UndeclaredUnknown {
        name: String,
        point: Point,
        relation: &'static str,
    },

    #[error("no relation named `{name}`")]
    UnknownRelation { name: String },
}

/// Errors produced while solving a relation.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("{point} `{name}` has the wrong units")]
    UnitConversion {
        name: String,
        point: Point,
        #[source]
        source: IncompatibleUnits,
    },

    #[error(
        "{point} `{name}` did not converge after {iters} iterations (x = {x}, residual = {residual})"
    )]
    Convergence {
        name: String,
        point: Point,
        x: f64,
        residual: f64,
        iters: usize,
    },

    #[error("{point} `{name}` stalled on a flat residual (x = {x}, residual = {residual})")]
    Stalled {
        name: String,
        point: Point,
        x: f64,
        residual: f64,
    },

    #[error("residual is not finite at {point} `{name}` = {x} (residual = {residual})")]
    Domain {
        name: String,
        point: Point,
        x: f64,
        residual: f64,
    },

    #[error(transparent)]
    Formulation(#[from] FormulationError),

    #[error("solver failed")]
    Solver(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    /// Unwraps a model error boxed by a solver, keeping its concrete type when
    /// it came from a relation's balance.
    pub(crate) fn from_model(err: Box<dyn StdError + Send + Sync>) -> Self {
        match err.downcast::<FormulationError>() {
            Ok(err) => Self::Formulation(*err),
            Err(err) => Self::Solver(err),
        }
    }
}
