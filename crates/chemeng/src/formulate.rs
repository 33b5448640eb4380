//! Residual functions built from a relation and a context.
//!
//! A [`Formulation`] closes over a relation and a read-only context and maps a
//! trial SI value of the unknown to the relation's two sides. It implements
//! the core [`Model`] and [`EquationProblem`] traits so any root finder in
//! `chemeng-solvers` can drive it.

use std::convert::Infallible;

use thiserror::Error;

use chemeng_core::{EquationProblem, Model};
use chemeng_solvers::ode::rk4;

use crate::{
    context::{Context, Point},
    relation::Relation,
};

/// Errors raised while evaluating a relation's balance.
#[derive(Debug, Error)]
pub enum FormulationError {
    #[error("no value bound for {point} `{name}`")]
    Unbound { name: &'static str, point: Point },

    #[error("integration failed")]
    Integration(#[from] rk4::Error),
}

/// Resolves variables for one evaluation of a balance.
///
/// The unknown slot reads as the trial value and every other slot as its
/// known SI value, so a relation is written once for every choice of unknown.
#[derive(Debug, Clone, Copy)]
pub struct Bindings<'a> {
    context: &'a Context,
    trial: f64,
}

impl<'a> Bindings<'a> {
    #[must_use]
    pub fn new(context: &'a Context, trial: f64) -> Self {
        Self { context, trial }
    }

    /// Returns the SI value of `name` at `point`.
    ///
    /// # Errors
    ///
    /// Returns [`FormulationError::Unbound`] if the context has no such slot.
    pub fn get(&self, name: &'static str, point: Point) -> Result<f64, FormulationError> {
        if self.context.is_unknown(name, point) {
            return Ok(self.trial);
        }
        self.context
            .known(name, point)
            .ok_or(FormulationError::Unbound { name, point })
    }

    /// Shorthand for [`get`](Self::get) at [`Point::Initial`].
    ///
    /// # Errors
    ///
    /// Returns [`FormulationError::Unbound`] if the context has no such slot.
    pub fn initial(&self, name: &'static str) -> Result<f64, FormulationError> {
        self.get(name, Point::Initial)
    }

    /// Shorthand for [`get`](Self::get) at [`Point::Final`].
    ///
    /// # Errors
    ///
    /// Returns [`FormulationError::Unbound`] if the context has no such slot.
    pub fn final_(&self, name: &'static str) -> Result<f64, FormulationError> {
        self.get(name, Point::Final)
    }

    #[must_use]
    pub fn trial(&self) -> f64 {
        self.trial
    }

    /// True if `(name, point)` is the unknown being solved for.
    #[must_use]
    pub fn is_trial(&self, name: &str, point: Point) -> bool {
        self.context.is_unknown(name, point)
    }
}

/// The two sides of a relation evaluated at a trial value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Balance {
    pub lhs: f64,
    pub rhs: f64,
}

impl Balance {
    #[must_use]
    pub fn new(lhs: f64, rhs: f64) -> Self {
        Self { lhs, rhs }
    }

    /// `lhs - rhs`, zero when the relation holds.
    #[must_use]
    pub fn residual(&self) -> f64 {
        self.lhs - self.rhs
    }
}

/// A relation bound to a context, ready to hand to a root finder.
pub struct Formulation<'a> {
    relation: &'a dyn Relation,
    context: &'a Context,
}

impl<'a> Formulation<'a> {
    #[must_use]
    pub fn new(relation: &'a dyn Relation, context: &'a Context) -> Self {
        Self { relation, context }
    }

    /// Evaluates the residual at a trial SI value of the unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the relation cannot evaluate its balance.
    pub fn residual(&self, x: f64) -> Result<f64, FormulationError> {
        self.call(&x).map(|balance| balance.residual())
    }

    #[must_use]
    pub fn relation(&self) -> &'a dyn Relation {
        self.relation
    }

    #[must_use]
    pub fn context(&self) -> &'a Context {
        self.context
    }
}

impl Model for Formulation<'_> {
    type Input = f64;
    type Output = Balance;
    type Error = FormulationError;

    fn call(&self, trial: &f64) -> Result<Balance, FormulationError> {
        self.relation.balance(&Bindings::new(self.context, *trial))
    }
}

impl EquationProblem<1> for Formulation<'_> {
    type Input = f64;
    type Output = Balance;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<f64, Infallible> {
        Ok(x[0])
    }

    fn residuals(&self, _input: &f64, output: &Balance) -> Result<[f64; 1], Infallible> {
        Ok([output.residual()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::relations::Bernoulli;

    fn context(unknown: &str) -> Context {
        let mut initial = vec![
            ("v", "2 m/s"),
            ("h", "1 m"),
            ("P", "1000 Pa"),
            ("rho", "1000 kg/m^3"),
        ];
        for entry in &mut initial {
            if entry.0 == unknown {
                entry.1 = "unknown";
            }
        }
        let final_ = [
            ("v", "2 m/s"),
            ("h", "1 m"),
            ("P", "1000 Pa"),
            ("rho", "1000 kg/m^3"),
        ];
        Context::new(initial, final_, "").unwrap()
    }

    #[test]
    fn bindings_read_the_trial_for_the_unknown_only() {
        let context = context("h");
        let bindings = Bindings::new(&context, 7.5);

        assert_eq!(bindings.initial("h").unwrap(), 7.5);
        assert_eq!(bindings.final_("h").unwrap(), 1.0);
        assert_eq!(bindings.initial("rho").unwrap(), 1000.0);
        assert!(matches!(
            bindings.initial("T"),
            Err(FormulationError::Unbound { name: "T", point: Point::Initial })
        ));
    }

    #[test]
    fn residual_vanishes_at_the_consistent_value() {
        for unknown in ["v", "h", "P", "rho"] {
            let context = context(unknown);
            let formulation = Formulation::new(&Bernoulli, &context);
            let consistent = match unknown {
                "v" => 2.0,
                "h" => 1.0,
                _ => 1000.0,
            };
            assert_relative_eq!(formulation.residual(consistent).unwrap(), 0.0);
            assert!(formulation.residual(consistent * 2.0).unwrap().abs() > 0.0);
        }
    }

    #[test]
    fn residual_is_pure() {
        let context = context("P");
        let formulation = Formulation::new(&Bernoulli, &context);
        let first = formulation.residual(1234.5).unwrap();
        let second = formulation.residual(1234.5).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
        assert_relative_eq!(first, 234.5, epsilon = 1e-9);
    }
}
