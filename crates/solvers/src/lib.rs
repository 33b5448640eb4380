//! Numerical solvers for chemeng relations.
//!
//! - [`equation`] finds roots of residual functions built from a
//!   [`Model`](chemeng_core::Model) and an
//!   [`EquationProblem`](chemeng_core::EquationProblem).
//! - [`ode`] integrates an [`OdeProblem`](chemeng_core::OdeProblem) forward
//!   (or backward) in its independent variable.
//!
//! Every solver accepts an [`Observer`](chemeng_core::Observer) that sees one
//! event per iteration and may stop the solver early. Pass `()` to run
//! without observation.

pub mod equation;
pub mod ode;
