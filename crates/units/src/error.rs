use thiserror::Error;

use crate::Dimension;

/// Errors raised while parsing a quantity or unit string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty quantity string")]
    Empty,

    #[error("invalid number `{number}` in `{input}`")]
    InvalidNumber { input: String, number: String },

    #[error("unknown unit `{token}` in `{input}`")]
    UnknownUnit { input: String, token: String },

    #[error("unexpected character `{found}` at offset {offset} in `{input}`")]
    UnexpectedChar {
        input: String,
        found: char,
        offset: usize,
    },

    #[error("expected {expected} at offset {offset} in `{input}`")]
    UnexpectedToken {
        input: String,
        expected: &'static str,
        offset: usize,
    },

    #[error("exponent out of range in `{input}`")]
    InvalidExponent { input: String },
}

/// A conversion between units of different dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert `{from_unit}` ({from}) to `{to_unit}` ({to})")]
pub struct IncompatibleUnits {
    pub from: Dimension,
    pub to: Dimension,
    pub from_unit: String,
    pub to_unit: String,
}

/// Any error produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Incompatible(#[from] IncompatibleUnits),
}
