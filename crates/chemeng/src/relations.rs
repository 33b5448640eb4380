//! The relations shipped in the standard catalog.

mod bernoulli;
mod bernoulli_head;
mod tank_drain;

pub use bernoulli::Bernoulli;
pub use bernoulli_head::BernoulliHead;
pub use tank_drain::TankDrain;

use uom::si::{acceleration::standard_gravity, f64::Acceleration};

use chemeng_units::Dimension;

use crate::{context::Point, relation::Variable};

const BOTH: &[Point] = &[Point::Initial, Point::Final];

/// Standard gravity in m/s².
pub(crate) fn gravity() -> f64 {
    Acceleration::new::<standard_gravity>(1.0).value
}

/// Velocity, height, pressure, and density at both points of a streamline.
pub(crate) const STREAMLINE: &[Variable] = &[
    Variable {
        symbol: "v",
        description: "flow velocity",
        dimension: Dimension::VELOCITY,
        points: BOTH,
        sign_ambiguous: true,
    },
    Variable {
        symbol: "h",
        description: "elevation",
        dimension: Dimension::LENGTH,
        points: BOTH,
        sign_ambiguous: false,
    },
    Variable {
        symbol: "P",
        description: "static pressure",
        dimension: Dimension::PRESSURE,
        points: BOTH,
        sign_ambiguous: false,
    },
    Variable {
        symbol: "rho",
        description: "fluid density",
        dimension: Dimension::MASS_DENSITY,
        points: BOTH,
        sign_ambiguous: false,
    },
];
