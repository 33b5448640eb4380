//! The interface every catalog relation implements.

use chemeng_units::{Dimension, IncompatibleUnits, Unit};

use crate::{
    context::{Context, Point, Slot},
    error::{ConfigurationError, Error},
    formulate::{Balance, Bindings, FormulationError},
};

/// A variable a relation reads at one or both points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variable {
    pub symbol: &'static str,
    pub description: &'static str,
    pub dimension: Dimension,
    /// The points at which the relation reads this variable.
    pub points: &'static [Point],
    /// True if only the magnitude is physically determined, as for a speed
    /// that enters the relation squared.
    pub sign_ambiguous: bool,
}

impl Variable {
    /// The SI unit results for this variable are reported in by default.
    #[must_use]
    pub fn si_unit(&self) -> Unit {
        Unit::si(self.dimension)
    }
}

/// How the pipeline searches for roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Scan a grid for sign changes and bisect each bracket, falling back to
    /// the seeded secant when the scan finds none. Finds every root the grid
    /// separates.
    Roots,
    /// Run the secant method from [`Relation::seed`].
    Seeded,
}

/// A named physical law with a fixed set of variables.
///
/// Implementors only describe their variables and evaluate both sides of the
/// law; context checks, root finding, and formatting are shared.
pub trait Relation: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn variables(&self) -> &'static [Variable];

    fn strategy(&self) -> Strategy {
        Strategy::Roots
    }

    /// Starting point, in SI, for the secant method.
    fn seed(&self, _context: &Context) -> f64 {
        1.0
    }

    /// Evaluates both sides of the law for one trial value of the unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is unbound or an inner computation
    /// fails.
    fn balance(&self, bindings: &Bindings<'_>) -> Result<Balance, FormulationError>;

    /// Looks up a declared variable by symbol.
    fn variable(&self, symbol: &str) -> Option<&'static Variable> {
        self.variables().iter().find(|v| v.symbol == symbol)
    }

    /// Checks that `context` supplies what this relation needs.
    ///
    /// # Errors
    ///
    /// Returns an error if a declared variable is missing, the unknown is not
    /// declared, or a quantity or the output unit has the wrong dimension.
    fn validate(&self, context: &Context) -> Result<(), Error> {
        let name = context.unknown_name();
        let point = context.unknown_point();
        let unknown = self
            .variable(name)
            .filter(|variable| variable.points.contains(&point))
            .ok_or_else(|| ConfigurationError::UndeclaredUnknown {
                name: name.to_string(),
                point,
                relation: self.name(),
            })?;

        for variable in self.variables() {
            for &point in variable.points {
                match context.slot(variable.symbol, point) {
                    None => {
                        return Err(ConfigurationError::MissingVariable {
                            name: variable.symbol.to_string(),
                            point,
                            relation: self.name(),
                        }
                        .into());
                    }
                    Some(Slot::Known { quantity, .. })
                        if quantity.dimension() != variable.dimension =>
                    {
                        return Err(Error::UnitConversion {
                            name: variable.symbol.to_string(),
                            point,
                            source: IncompatibleUnits {
                                from: quantity.dimension(),
                                to: variable.dimension,
                                from_unit: quantity.unit().to_string(),
                                to_unit: variable.si_unit().to_string(),
                            },
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        if let Some(unit) = context.output_unit()
            && unit.dimension() != unknown.dimension
        {
            return Err(Error::UnitConversion {
                name: name.to_string(),
                point,
                source: IncompatibleUnits {
                    from: unknown.dimension,
                    to: unit.dimension(),
                    from_unit: unknown.si_unit().to_string(),
                    to_unit: unit.to_string(),
                },
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::relations::{Bernoulli, TankDrain};

    fn bernoulli_context(final_h: &str, output_unit: &str) -> Result<Context, ConfigurationError> {
        Context::new(
            [
                ("v", "0 m/s"),
                ("h", "10 m"),
                ("P", "101325 Pa"),
                ("rho", "1000 kg/m^3"),
            ],
            [
                ("v", "unknown"),
                ("h", final_h),
                ("P", "101325 Pa"),
                ("rho", "1000 kg/m^3"),
            ],
            output_unit,
        )
    }

    #[test]
    fn accepts_a_complete_context() {
        let context = bernoulli_context("3 m", "ft/s").unwrap();
        assert!(Bernoulli.validate(&context).is_ok());
    }

    #[test]
    fn reports_missing_variables() {
        let context = Context::new(
            [("v", "0 m/s"), ("h", "10 m"), ("P", "1 atm")],
            [("v", "unknown"), ("h", "0 m"), ("P", "1 atm"), ("rho", "1000 kg/m^3")],
            "",
        )
        .unwrap();

        let err = Bernoulli.validate(&context).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::MissingVariable {
                ref name,
                point: Point::Initial,
                relation: "bernoulli",
            }) if name == "rho"
        ));
    }

    #[test]
    fn reports_an_undeclared_unknown() {
        let context = Context::new(
            [("h", "1 m"), ("A", "1 m^2"), ("a", "0.01 m^2")],
            [("h", "0.5 m"), ("t", "60 s"), ("A", "unknown")],
            "",
        )
        .unwrap();

        // `A` is only read at the initial point.
        let err = TankDrain.validate(&context).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::UndeclaredUnknown { .. })
        ));
    }

    #[test]
    fn reports_wrong_dimensions() {
        let context = bernoulli_context("3 psi", "").unwrap();
        let err = Bernoulli.validate(&context).unwrap_err();
        let Error::UnitConversion { name, point, source } = err else {
            panic!("expected a unit conversion error, got {err:?}");
        };
        assert_eq!(name, "h");
        assert_eq!(point, Point::Final);
        assert_eq!(source.from, Dimension::PRESSURE);
        assert_eq!(source.to, Dimension::LENGTH);

        let context = bernoulli_context("3 m", "kg").unwrap();
        let err = Bernoulli.validate(&context).unwrap_err();
        assert!(matches!(err, Error::UnitConversion { ref name, .. } if name == "v"));
    }

    #[test]
    fn variables_report_si_units() {
        let rho = Bernoulli.variable("rho").unwrap();
        assert_eq!(rho.si_unit().to_string(), "kg/m^3");
        assert!(Bernoulli.variable("v").unwrap().sign_ambiguous);
        assert!(Bernoulli.variable("T").is_none());
    }
}
