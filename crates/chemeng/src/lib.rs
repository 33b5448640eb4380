//! Unit-aware solving of small engineering relations.
//!
//! A [`Context`] holds the variables of a process at its initial and final
//! points. Every value is a quantity string with units, except one marked
//! `"unknown"`. Solving a named relation normalizes the known values to SI,
//! finds every root of the relation's residual in the unknown, and renders
//! the result in the requested unit.
//!
//! ```
//! use chemeng::Context;
//!
//! let context = Context::new(
//!     [
//!         ("v", "0 ft/s"),
//!         ("h", "10 yard"),
//!         ("P", "14.6959 psi"),
//!         ("rho", "998.87 kg/m**3"),
//!     ],
//!     [
//!         ("v", "unknown"),
//!         ("h", "3.00123 m"),
//!         ("P", "101325 pascal"),
//!         ("rho", "62.423 lb/ft^3"),
//!     ],
//!     "m/s",
//! )?;
//!
//! let solution = chemeng::bernoulli(&context)?;
//! assert_eq!(solution.display, "v = -10.97 m/s or 10.97 m/s");
//! # Ok::<(), chemeng::Error>(())
//! ```
//!
//! Relations live in a [`Catalog`]; see [`relations`] for the built-in ones
//! and [`Relation`] for adding more. Chemical equations are balanced by
//! [`stoichiometry::Reaction`].

pub mod catalog;
pub mod context;
pub mod error;
pub mod format;
pub mod formulate;
pub mod relation;
pub mod relations;
pub mod solve;
pub mod stoichiometry;

use std::sync::LazyLock;

pub use catalog::Catalog;
pub use context::{Context, Point, Slot};
pub use error::{ConfigurationError, Error};
pub use format::Precision;
pub use relation::{Relation, Strategy, Variable};
pub use solve::{SolveConfig, Solution, solve_with};

static STANDARD: LazyLock<Catalog> = LazyLock::new(Catalog::standard);

/// The catalog of built-in relations.
#[must_use]
pub fn catalog() -> &'static Catalog {
    &STANDARD
}

/// Solves the catalog relation `name` with default settings.
///
/// # Errors
///
/// Returns an error if no relation has that name or the solve fails.
pub fn solve(name: &str, context: &Context) -> Result<Solution, Error> {
    solve_with(catalog().get(name)?, context, &SolveConfig::default())
}

/// Solves Bernoulli's equation for the unknown in `context`.
///
/// # Errors
///
/// Returns an error if the context does not fit the relation or no root can be
/// found.
pub fn bernoulli(context: &Context) -> Result<Solution, Error> {
    solve("bernoulli", context)
}
