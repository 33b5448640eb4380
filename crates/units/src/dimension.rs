use std::{
    fmt,
    ops::{Div, Mul},
};

/// SI base unit symbols, in the same order as `uom`'s `ISQ` dimension list.
const BASE_SYMBOLS: [&str; 7] = ["m", "kg", "s", "A", "K", "mol", "cd"];

/// A physical dimension as exponents of the seven SI base dimensions.
///
/// Exponents are ordered like `uom::si::ISQ`: length, mass, time, electric
/// current, thermodynamic temperature, amount of substance, luminous
/// intensity. Velocity is `[1, 0, -1, 0, 0, 0, 0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension([i32; 7]);

impl Dimension {
    pub const NONE: Self = Self([0, 0, 0, 0, 0, 0, 0]);
    pub const LENGTH: Self = Self([1, 0, 0, 0, 0, 0, 0]);
    pub const MASS: Self = Self([0, 1, 0, 0, 0, 0, 0]);
    pub const TIME: Self = Self([0, 0, 1, 0, 0, 0, 0]);
    pub const CURRENT: Self = Self([0, 0, 0, 1, 0, 0, 0]);
    pub const TEMPERATURE: Self = Self([0, 0, 0, 0, 1, 0, 0]);
    pub const AMOUNT: Self = Self([0, 0, 0, 0, 0, 1, 0]);
    pub const LUMINOUS_INTENSITY: Self = Self([0, 0, 0, 0, 0, 0, 1]);

    pub const AREA: Self = Self([2, 0, 0, 0, 0, 0, 0]);
    pub const VOLUME: Self = Self([3, 0, 0, 0, 0, 0, 0]);
    pub const VELOCITY: Self = Self([1, 0, -1, 0, 0, 0, 0]);
    pub const ACCELERATION: Self = Self([1, 0, -2, 0, 0, 0, 0]);
    pub const FORCE: Self = Self([1, 1, -2, 0, 0, 0, 0]);
    pub const PRESSURE: Self = Self([-1, 1, -2, 0, 0, 0, 0]);
    pub const ENERGY: Self = Self([2, 1, -2, 0, 0, 0, 0]);
    pub const POWER: Self = Self([2, 1, -3, 0, 0, 0, 0]);
    pub const MASS_DENSITY: Self = Self([-3, 1, 0, 0, 0, 0, 0]);

    /// Creates a dimension from base exponents in `ISQ` order.
    #[must_use]
    pub const fn from_exponents(exponents: [i32; 7]) -> Self {
        Self(exponents)
    }

    /// Returns the base exponents in `ISQ` order.
    #[must_use]
    pub const fn exponents(&self) -> [i32; 7] {
        self.0
    }

    /// Returns true if every exponent is zero.
    #[must_use]
    pub fn is_dimensionless(&self) -> bool {
        self.0.iter().all(|&e| e == 0)
    }

    /// Raises the dimension to an integer power.
    #[must_use]
    pub fn powi(self, n: i32) -> Self {
        Self(self.0.map(|e| e * n))
    }

    /// Returns the conventional name of the dimension, if it has one.
    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        NAMED.iter().find(|(dim, _)| dim == self).map(|(_, name)| *name)
    }

    /// Formats the dimension as a product of SI base units, such as `m·kg·s^-2`.
    #[must_use]
    pub fn base_units(&self) -> String {
        if self.is_dimensionless() {
            return String::new();
        }

        self.0
            .iter()
            .zip(BASE_SYMBOLS)
            .filter(|(exp, _)| **exp != 0)
            .map(|(exp, symbol)| {
                if *exp == 1 {
                    symbol.to_string()
                } else {
                    format!("{symbol}^{exp}")
                }
            })
            .collect::<Vec<_>>()
            .join("·")
    }
}

const NAMED: [(Dimension, &str); 17] = [
    (Dimension::NONE, "dimensionless"),
    (Dimension::LENGTH, "length"),
    (Dimension::MASS, "mass"),
    (Dimension::TIME, "time"),
    (Dimension::CURRENT, "electric current"),
    (Dimension::TEMPERATURE, "temperature"),
    (Dimension::AMOUNT, "amount of substance"),
    (Dimension::LUMINOUS_INTENSITY, "luminous intensity"),
    (Dimension::AREA, "area"),
    (Dimension::VOLUME, "volume"),
    (Dimension::VELOCITY, "velocity"),
    (Dimension::ACCELERATION, "acceleration"),
    (Dimension::FORCE, "force"),
    (Dimension::PRESSURE, "pressure"),
    (Dimension::ENERGY, "energy"),
    (Dimension::POWER, "power"),
    (Dimension::MASS_DENSITY, "mass density"),
];

impl Mul for Dimension {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut exponents = self.0;
        for (e, r) in exponents.iter_mut().zip(rhs.0) {
            *e += r;
        }
        Self(exponents)
    }
}

impl Div for Dimension {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        self * rhs.powi(-1)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self.is_dimensionless()) {
            (_, true) => f.write_str("dimensionless"),
            (Some(name), false) => write!(f, "{name} [{}]", self.base_units()),
            (None, false) => write!(f, "[{}]", self.base_units()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_dimensions_compose() {
        assert_eq!(Dimension::LENGTH / Dimension::TIME, Dimension::VELOCITY);
        assert_eq!(Dimension::FORCE / Dimension::AREA, Dimension::PRESSURE);
        assert_eq!(Dimension::MASS / Dimension::VOLUME, Dimension::MASS_DENSITY);
        assert_eq!(
            Dimension::MASS_DENSITY * Dimension::VELOCITY.powi(2),
            Dimension::PRESSURE
        );
        assert_eq!(Dimension::LENGTH.powi(3), Dimension::VOLUME);
    }

    #[test]
    fn names_and_base_units() {
        assert_eq!(Dimension::PRESSURE.name(), Some("pressure"));
        assert_eq!(Dimension::PRESSURE.base_units(), "m^-1·kg·s^-2");
        assert_eq!(Dimension::PRESSURE.to_string(), "pressure [m^-1·kg·s^-2]");
        assert_eq!(Dimension::NONE.to_string(), "dimensionless");

        let odd = Dimension::LENGTH * Dimension::CURRENT;
        assert_eq!(odd.name(), None);
        assert_eq!(odd.to_string(), "[m·A]");
    }
}
