use std::convert::Infallible;

use chemeng_core::OdeProblem;
use chemeng_solvers::ode::rk4;
use chemeng_units::Dimension;

use crate::{
    context::{Context, Point},
    formulate::{Balance, Bindings, FormulationError},
    relation::{Relation, Strategy, Variable},
};

use super::{BOTH, gravity};

const INITIAL: &[Point] = &[Point::Initial];
const FINAL: &[Point] = &[Point::Final];

const VARIABLES: &[Variable] = &[
    Variable {
        symbol: "h",
        description: "liquid level above the outlet",
        dimension: Dimension::LENGTH,
        points: BOTH,
        sign_ambiguous: false,
    },
    Variable {
        symbol: "A",
        description: "tank cross-section area",
        dimension: Dimension::AREA,
        points: INITIAL,
        sign_ambiguous: false,
    },
    Variable {
        symbol: "a",
        description: "outlet area",
        dimension: Dimension::AREA,
        points: INITIAL,
        sign_ambiguous: false,
    },
    Variable {
        symbol: "t",
        description: "elapsed time",
        dimension: Dimension::TIME,
        points: FINAL,
        sign_ambiguous: false,
    },
];

/// A tank draining through a small outlet under gravity (Torricelli's law):
///
/// ```text
/// dh/dt = -(a/A)·√(2gh)
/// ```
///
/// The balance integrates the level from `h₀` over `t` and compares it with
/// the final level. A final level of exactly zero means the moment the tank
/// empties: the level stays at zero afterwards, so that case compares `t` with
/// the drain time `√h₀ / ((a/A)·√(2g)/2)` instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct TankDrain;

/// The level equation with fixed areas.
struct Torricelli {
    area_ratio: f64,
    g: f64,
}

impl OdeProblem<1> for Torricelli {
    type Error = Infallible;

    fn rate(&self, _t: f64, y: &[f64; 1]) -> Result<[f64; 1], Infallible> {
        // An empty tank stays empty.
        Ok([-self.area_ratio * (2.0 * self.g * y[0].max(0.0)).sqrt()])
    }
}

impl Relation for TankDrain {
    fn name(&self) -> &'static str {
        "tank_drain"
    }

    fn description(&self) -> &'static str {
        "gravity-driven tank draining through an outlet (Torricelli)"
    }

    fn variables(&self) -> &'static [Variable] {
        VARIABLES
    }

    fn strategy(&self) -> Strategy {
        Strategy::Seeded
    }

    /// Seeds the secant method with the closed-form level
    /// `√h = √h₀ - (a/A)·√(2g)/2 · t`, solved for the unknown.
    fn seed(&self, context: &Context) -> f64 {
        closed_form(context)
            .filter(|seed| seed.is_finite())
            .unwrap_or(1.0)
    }

    fn balance(&self, b: &Bindings<'_>) -> Result<Balance, FormulationError> {
        let h0 = b.initial("h")?;
        let area = b.initial("A")?;
        let outlet = b.initial("a")?;
        let hf = b.final_("h")?;
        let t = b.final_("t")?;

        if hf == 0.0 && !b.is_trial("h", Point::Final) {
            return Ok(Balance::new(t, h0.sqrt() / fall_rate(outlet / area)));
        }

        let level = if t == 0.0 {
            h0
        } else {
            let problem = Torricelli {
                area_ratio: outlet / area,
                g: gravity(),
            };
            match rk4::integrate_unobserved(&problem, [h0], &[0.0, t], &rk4::Config::default()) {
                Ok(solution) => solution.states.last().map_or(h0, |state| state[0]),
                // Left as NaN so the solver reports the trial as out of domain.
                Err(rk4::Error::NonFiniteInitialState | rk4::Error::NonFiniteState { .. }) => {
                    f64::NAN
                }
                Err(err) => return Err(err.into()),
            }
        };

        Ok(Balance::new(level, hf))
    }
}

/// How fast `√h` falls for an outlet-to-tank area ratio.
fn fall_rate(area_ratio: f64) -> f64 {
    area_ratio * (2.0 * gravity()).sqrt() / 2.0
}

fn closed_form(context: &Context) -> Option<f64> {
    let known = |name: &str, point: Point| context.known(name, point);
    let root2g = (2.0 * gravity()).sqrt();

    // The drop in √h over the whole interval, when both levels are known.
    let fall = || Some(known("h", Point::Initial)?.sqrt() - known("h", Point::Final)?.sqrt());
    // The rate at which √h falls.
    let rate = || Some(fall_rate(known("a", Point::Initial)? / known("A", Point::Initial)?));

    match (context.unknown_name(), context.unknown_point()) {
        ("t", Point::Final) => Some(fall()? / rate()?),
        ("h", Point::Final) => {
            let t = known("t", Point::Final)?;
            Some((known("h", Point::Initial)?.sqrt() - rate()? * t).max(0.0).powi(2))
        }
        ("h", Point::Initial) => {
            let t = known("t", Point::Final)?;
            Some((known("h", Point::Final)?.sqrt() + rate()? * t).powi(2))
        }
        ("A", Point::Initial) => {
            let t = known("t", Point::Final)?;
            Some(known("a", Point::Initial)? * root2g * t / (2.0 * fall()?))
        }
        ("a", Point::Initial) => {
            let t = known("t", Point::Final)?;
            Some(2.0 * known("A", Point::Initial)? * fall()? / (root2g * t))
        }
        _ => None,
    }
}
