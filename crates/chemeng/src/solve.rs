//! The solve pipeline: validate, formulate, find roots, format.

use tracing::{debug, trace};

use chemeng_solvers::equation::{
    Status, bisection,
    scan::{self, Grid},
    secant,
};
use chemeng_units::Unit;

use crate::{
    context::{Context, Point},
    error::{ConfigurationError, Error},
    format::{Precision, format},
    formulate::{Balance, Formulation},
    relation::{Relation, Strategy},
};

/// Solver settings for one solve.
#[derive(Debug, Clone, Default)]
pub struct SolveConfig {
    pub bisection: bisection::Config,
    pub secant: secant::Config,
    /// Trial values scanned for sign changes under [`Strategy::Roots`].
    pub grid: Grid,
    /// Overrides [`Relation::seed`] for the secant method.
    pub seed: Option<f64>,
    pub precision: Precision,
}

/// The value of the unknown that satisfies a relation.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub symbol: String,
    pub point: Point,
    /// The smallest root, in SI.
    pub value_si: f64,
    /// The smallest root, in [`unit`](Self::unit).
    pub value: f64,
    pub unit: Unit,
    /// Every root found, ascending, in SI.
    pub roots_si: Vec<f64>,
    /// Every root found, ascending, in [`unit`](Self::unit).
    pub roots: Vec<f64>,
    /// Residual at the smallest root.
    pub residual: f64,
    /// Solver iterations summed over all roots.
    pub iters: usize,
    /// Human-readable result, such as `v = -10.97 m/s or 10.97 m/s`.
    pub display: String,
}

/// A converged root in SI.
#[derive(Debug, Clone, Copy)]
struct Root {
    x: f64,
    residual: f64,
    iters: usize,
}

/// Solves `relation` for the unknown in `context`.
///
/// # Errors
///
/// Returns an error if the context does not fit the relation, no root can be
/// found, or the residual leaves its domain during the search.
pub fn solve_with(
    relation: &dyn Relation,
    context: &Context,
    config: &SolveConfig,
) -> Result<Solution, Error> {
    relation.validate(context)?;

    let symbol = context.unknown_name();
    let point = context.unknown_point();
    let variable =
        relation
            .variable(symbol)
            .ok_or_else(|| ConfigurationError::UndeclaredUnknown {
                name: symbol.to_string(),
                point,
                relation: relation.name(),
            })?;

    debug!(
        relation = relation.name(),
        unknown = symbol,
        %point,
        strategy = ?relation.strategy(),
        "solving"
    );

    let search = Search {
        formulation: Formulation::new(relation, context),
        config,
        symbol,
        point,
    };

    let mut found = match relation.strategy() {
        Strategy::Roots => search.roots()?,
        Strategy::Seeded => vec![search.seeded()?],
    };
    found.sort_by(|a, b| a.x.total_cmp(&b.x));
    found.dedup_by(|a, b| (a.x - b.x).abs() <= 1e-12 * a.x.abs().max(b.x.abs()));

    let Some(primary) = found.first().copied() else {
        // Both strategies either return a root or fail.
        return Err(Error::Stalled {
            name: symbol.to_string(),
            point,
            x: f64::NAN,
            residual: f64::NAN,
        });
    };

    let unit = context
        .output_unit()
        .cloned()
        .unwrap_or_else(|| variable.si_unit());
    let roots_si: Vec<f64> = found.iter().map(|root| root.x).collect();
    let roots: Vec<f64> = roots_si.iter().map(|&x| unit.from_si(x)).collect();
    let digits = config.precision.digits(context.input_sigfigs());
    let rendered = format(symbol, &roots_si, &unit, variable.sign_ambiguous, digits);
    let iters: usize = found.iter().map(|root| root.iters).sum();

    debug!(display = %rendered, roots = roots_si.len(), iters, "solved");

    Ok(Solution {
        symbol: symbol.to_string(),
        point,
        value_si: primary.x,
        value: unit.from_si(primary.x),
        unit,
        roots_si,
        roots,
        residual: primary.residual,
        iters,
        display: rendered,
    })
}

/// A formulation plus what the root finders need to label their errors.
struct Search<'a> {
    formulation: Formulation<'a>,
    config: &'a SolveConfig,
    symbol: &'a str,
    point: Point,
}

impl Search<'_> {
    /// Scans the grid and bisects every bracket.
    fn roots(&self) -> Result<Vec<Root>, Error> {
        let f = &self.formulation;
        let scan = scan::scan(f, f, &self.config.grid).map_err(|err| match err {
            scan::Error::Model(err) => Error::from_model(err),
            scan::Error::Problem(err) => Error::Solver(err),
        })?;

        trace!(
            brackets = ?scan.brackets,
            exact = ?scan.roots,
            skipped = scan.skipped.len(),
            "scanned grid"
        );

        if scan.is_empty() {
            debug!("no sign change on the grid, trying the secant method");
            return Ok(vec![self.seeded()?]);
        }

        let mut found: Vec<Root> = scan
            .roots
            .iter()
            .map(|&x| Root {
                x,
                residual: 0.0,
                iters: 0,
            })
            .collect();

        for bracket in scan.brackets {
            let observer = |event: &bisection::Event<'_, f64, Balance>| {
                trace!(
                    iter = event.iter,
                    x = event.eval.point(),
                    residual = event.eval.residual(),
                    "bisection"
                );
                None::<bisection::Action>
            };

            let solution = bisection::solve(f, f, bracket, &self.config.bisection, observer)
                .map_err(|err| self.bisection_error(err))?;

            if solution.status == Status::MaxIters {
                return Err(self.convergence(solution.x, solution.residual, solution.iters));
            }

            found.push(Root {
                x: solution.x,
                residual: solution.residual,
                iters: solution.iters,
            });
        }

        Ok(found)
    }

    /// Runs the secant method from the configured or relation's seed.
    fn seeded(&self) -> Result<Root, Error> {
        let f = &self.formulation;
        let seed = self
            .config
            .seed
            .unwrap_or_else(|| f.relation().seed(f.context()));

        debug!(seed, "secant");

        let observer = |event: &secant::Event<'_, f64, Balance>| {
            trace!(
                iter = event.iter,
                x = event.eval.point(),
                residual = event.eval.residual(),
                "secant"
            );
            None::<secant::Action>
        };

        let solution = secant::solve(f, f, seed, &self.config.secant, observer)
            .map_err(|err| self.secant_error(err))?;

        Ok(Root {
            x: solution.x,
            residual: solution.residual,
            iters: solution.iters,
        })
    }

    fn bisection_error(&self, err: bisection::Error) -> Error {
        match err {
            bisection::Error::NonFiniteResidual { x, residual } => self.domain(x, residual),
            bisection::Error::Model(err) => Error::from_model(err),
            other => Error::Solver(Box::new(other)),
        }
    }

    fn secant_error(&self, err: secant::Error) -> Error {
        match err {
            secant::Error::MaxIters { x, residual, iters } => self.convergence(x, residual, iters),
            secant::Error::NonFiniteResidual { x, residual } => self.domain(x, residual),
            secant::Error::FlatResidual { x, residual }
            | secant::Error::Stalled { x, residual, .. } => Error::Stalled {
                name: self.symbol.to_string(),
                point: self.point,
                x,
                residual,
            },
            secant::Error::Model(err) => Error::from_model(err),
            other => Error::Solver(Box::new(other)),
        }
    }

    fn convergence(&self, x: f64, residual: f64, iters: usize) -> Error {
        Error::Convergence {
            name: self.symbol.to_string(),
            point: self.point,
            x,
            residual,
            iters,
        }
    }

    fn domain(&self, x: f64, residual: f64) -> Error {
        Error::Domain {
            name: self.symbol.to_string(),
            point: self.point,
            x,
            residual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use chemeng_units::Dimension;

    use crate::{
        formulate::{Bindings, FormulationError},
        relation::Variable,
        relations::{Bernoulli, TankDrain},
    };

    /// `x² = c` for a known `c`.
    struct Square;

    const SQUARE: &[Variable] = &[
        Variable {
            symbol: "x",
            description: "the root",
            dimension: Dimension::NONE,
            points: &[Point::Final],
            sign_ambiguous: false,
        },
        Variable {
            symbol: "c",
            description: "the square",
            dimension: Dimension::NONE,
            points: &[Point::Initial],
            sign_ambiguous: false,
        },
    ];

    impl Relation for Square {
        fn name(&self) -> &'static str {
            "square"
        }

        fn description(&self) -> &'static str {
            "x² = c"
        }

        fn variables(&self) -> &'static [Variable] {
            SQUARE
        }

        fn balance(&self, b: &Bindings<'_>) -> Result<Balance, FormulationError> {
            let x = b.final_("x")?;
            Ok(Balance::new(x * x, b.initial("c")?))
        }
    }

    fn square(c: &str) -> Context {
        Context::new([("c", c)], [("x", "unknown")], "").unwrap()
    }

    #[test]
    fn roots_strategy_finds_every_bracketed_root() {
        let solution = solve_with(&Square, &square("120"), &SolveConfig::default()).unwrap();

        assert_eq!(solution.roots_si.len(), 2);
        assert_relative_eq!(solution.roots_si[0], -(120f64.sqrt()), epsilon = 1e-9);
        assert_relative_eq!(solution.roots_si[1], 120f64.sqrt(), epsilon = 1e-9);
        assert_eq!(solution.value_si, solution.roots_si[0]);
        assert_eq!(solution.display, "x = -10.95 or 10.95");
        assert!(solution.unit.is_dimensionless());
    }

    #[test]
    fn exact_grid_roots_are_reported() {
        let solution = solve_with(&Square, &square("100"), &SolveConfig::default()).unwrap();
        assert_eq!(solution.roots_si, vec![-10.0, 10.0]);
        assert_eq!(solution.iters, 0);
    }

    #[test]
    fn falls_back_to_the_secant_method_without_a_sign_change() {
        // x² = 0 touches zero without changing sign, and this grid skips 0.
        let config = SolveConfig {
            grid: Grid::from_points([-3.0, -1.0, 2.0, 5.0]),
            seed: Some(0.5),
            ..SolveConfig::default()
        };
        let solution = solve_with(&Square, &square("0"), &config).unwrap();
        assert!(solution.value_si.abs() < 1e-5);
    }

    #[test]
    fn secant_failures_are_typed() {
        let config = SolveConfig {
            seed: Some(3.0),
            secant: secant::Config::new(10, 1e-12, 1e-12, 1e-12, 1e-4).unwrap(),
            ..SolveConfig::default()
        };
        // x² = -1 has no real root.
        let err = solve_with(&Square, &square("-1"), &config).unwrap_err();
        assert!(
            matches!(
                err,
                Error::Convergence { iters: 10, .. } | Error::Stalled { .. } | Error::Domain { .. }
            ),
            "unexpected {err:?}"
        );
    }

    #[test]
    fn seeded_strategy_uses_the_relation_seed() {
        let context = Context::new(
            [("h", "4 m"), ("A", "1 m^2"), ("a", "0.01 m^2")],
            [("h", "unknown"), ("t", "1 min")],
            "cm",
        )
        .unwrap();

        let solution = solve_with(&TankDrain, &context, &SolveConfig::default()).unwrap();
        assert_eq!(solution.roots_si.len(), 1);
        assert_relative_eq!(solution.value_si, 0.45077, max_relative = 1e-4);
        assert_relative_eq!(solution.value, 45.077, max_relative = 1e-4);
        assert_eq!(solution.display, "h = 45.08 cm");
    }

    #[test]
    fn validation_runs_first() {
        let context = Context::new([("v", "unknown")], [("v", "1 m/s")], "").unwrap();
        let err = solve_with(&Bernoulli, &context, &SolveConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::MissingVariable { .. })
        ));
    }

    #[test]
    fn precision_only_changes_the_display() {
        let full = SolveConfig {
            precision: Precision::Full,
            ..SolveConfig::default()
        };
        let rounded = solve_with(&Square, &square("2"), &SolveConfig::default()).unwrap();
        let exact = solve_with(&Square, &square("2"), &full).unwrap();

        assert_eq!(rounded.roots_si, exact.roots_si);
        assert_eq!(rounded.display, "x = -1.414 or 1.414");
        assert_ne!(exact.display, rounded.display);
    }
}
