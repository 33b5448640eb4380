//! The static table of recognized unit tokens.
//!
//! Each entry maps a case-sensitive token to its [`Dimension`] and the affine
//! map `si = value · scale + offset`. Scale and offset are read from `uom`'s
//! unit definitions by evaluating the unit at 0 and 1, which also captures the
//! offsets of the Celsius and Fahrenheit scales.

use std::sync::LazyLock;

use uom::si::{
    amount_of_substance::{kilomole, mole},
    electric_current::ampere,
    energy::{calorie, joule, kilojoule},
    f64::{
        AmountOfSubstance, ElectricCurrent, Energy, Force, Length, LuminousIntensity, Mass, Power,
        Pressure, ThermodynamicTemperature, Time, Volume,
    },
    force::{kilonewton, newton, pound_force},
    length::{centimeter, foot, inch, kilometer, meter, micrometer, mile, millimeter, yard},
    luminous_intensity::candela,
    mass::{gram, kilogram, milligram, ounce, pound},
    power::{kilowatt, watt},
    pressure::{
        atmosphere, bar, kilopascal, megapascal, millimeter_of_mercury, pascal,
        pound_force_per_square_inch, torr,
    },
    thermodynamic_temperature::{degree_celsius, degree_fahrenheit, degree_rankine, kelvin},
    time::{day, hour, millisecond, minute, second},
    volume::{gallon, liter},
};

use crate::Dimension;

/// A recognized unit token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDef {
    pub symbol: &'static str,
    pub dimension: Dimension,
    pub scale: f64,
    pub offset: f64,
}

impl UnitDef {
    /// Builds a definition from the SI values of `0 unit` and `1 unit`.
    fn from_si_points(symbol: &'static str, dimension: Dimension, zero: f64, one: f64) -> Self {
        Self {
            symbol,
            dimension,
            scale: one - zero,
            offset: zero,
        }
    }

    /// Returns true if the unit is an affine scale with a shifted zero.
    #[must_use]
    pub fn is_affine(&self) -> bool {
        self.offset != 0.0
    }
}

macro_rules! unit_def {
    ($symbol:literal, $quantity:ident, $unit:ty, $dimension:expr) => {
        UnitDef::from_si_points(
            $symbol,
            $dimension,
            $quantity::new::<$unit>(0.0).value,
            $quantity::new::<$unit>(1.0).value,
        )
    };
}

static UNITS: LazyLock<Vec<UnitDef>> = LazyLock::new(|| {
    use Dimension as D;

    vec![
        // Length
        unit_def!("m", Length, meter, D::LENGTH),
        unit_def!("meter", Length, meter, D::LENGTH),
        unit_def!("cm", Length, centimeter, D::LENGTH),
        unit_def!("mm", Length, millimeter, D::LENGTH),
        unit_def!("um", Length, micrometer, D::LENGTH),
        unit_def!("km", Length, kilometer, D::LENGTH),
        unit_def!("in", Length, inch, D::LENGTH),
        unit_def!("inch", Length, inch, D::LENGTH),
        unit_def!("ft", Length, foot, D::LENGTH),
        unit_def!("foot", Length, foot, D::LENGTH),
        unit_def!("yd", Length, yard, D::LENGTH),
        unit_def!("yard", Length, yard, D::LENGTH),
        unit_def!("mi", Length, mile, D::LENGTH),
        unit_def!("mile", Length, mile, D::LENGTH),
        // Mass
        unit_def!("kg", Mass, kilogram, D::MASS),
        unit_def!("g", Mass, gram, D::MASS),
        unit_def!("mg", Mass, milligram, D::MASS),
        unit_def!("lb", Mass, pound, D::MASS),
        unit_def!("lbm", Mass, pound, D::MASS),
        unit_def!("oz", Mass, ounce, D::MASS),
        // Time
        unit_def!("s", Time, second, D::TIME),
        unit_def!("ms", Time, millisecond, D::TIME),
        unit_def!("min", Time, minute, D::TIME),
        unit_def!("h", Time, hour, D::TIME),
        unit_def!("hr", Time, hour, D::TIME),
        unit_def!("day", Time, day, D::TIME),
        // Force
        unit_def!("N", Force, newton, D::FORCE),
        unit_def!("kN", Force, kilonewton, D::FORCE),
        unit_def!("lbf", Force, pound_force, D::FORCE),
        // Pressure
        unit_def!("Pa", Pressure, pascal, D::PRESSURE),
        unit_def!("pascal", Pressure, pascal, D::PRESSURE),
        unit_def!("kPa", Pressure, kilopascal, D::PRESSURE),
        unit_def!("MPa", Pressure, megapascal, D::PRESSURE),
        unit_def!("bar", Pressure, bar, D::PRESSURE),
        unit_def!("atm", Pressure, atmosphere, D::PRESSURE),
        unit_def!("psi", Pressure, pound_force_per_square_inch, D::PRESSURE),
        unit_def!("torr", Pressure, torr, D::PRESSURE),
        unit_def!("mmHg", Pressure, millimeter_of_mercury, D::PRESSURE),
        // Energy and power
        unit_def!("J", Energy, joule, D::ENERGY),
        unit_def!("kJ", Energy, kilojoule, D::ENERGY),
        unit_def!("cal", Energy, calorie, D::ENERGY),
        UnitDef::from_si_points(
            "kcal",
            D::ENERGY,
            0.0,
            1e3 * Energy::new::<calorie>(1.0).value,
        ),
        unit_def!("W", Power, watt, D::POWER),
        unit_def!("kW", Power, kilowatt, D::POWER),
        // Temperature
        unit_def!("K", ThermodynamicTemperature, kelvin, D::TEMPERATURE),
        unit_def!("degC", ThermodynamicTemperature, degree_celsius, D::TEMPERATURE),
        unit_def!("degF", ThermodynamicTemperature, degree_fahrenheit, D::TEMPERATURE),
        unit_def!("R", ThermodynamicTemperature, degree_rankine, D::TEMPERATURE),
        // Amount of substance
        unit_def!("mol", AmountOfSubstance, mole, D::AMOUNT),
        unit_def!("kmol", AmountOfSubstance, kilomole, D::AMOUNT),
        // Volume
        unit_def!("L", Volume, liter, D::VOLUME),
        unit_def!("gal", Volume, gallon, D::VOLUME),
        // Electric current and luminous intensity
        unit_def!("A", ElectricCurrent, ampere, D::CURRENT),
        unit_def!("cd", LuminousIntensity, candela, D::LUMINOUS_INTENSITY),
    ]
});

/// Looks up a unit token.
#[must_use]
pub fn lookup(symbol: &str) -> Option<&'static UnitDef> {
    UNITS.iter().find(|def| def.symbol == symbol)
}

/// Returns every recognized unit token, in table order.
pub fn symbols() -> impl Iterator<Item = &'static str> {
    UNITS.iter().map(|def| def.symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn scales_come_from_uom() {
        assert_relative_eq!(lookup("ft").unwrap().scale, 0.3048, epsilon = 1e-12);
        assert_relative_eq!(lookup("yard").unwrap().scale, 0.9144, epsilon = 1e-12);
        assert_relative_eq!(
            lookup("lb").unwrap().scale,
            Mass::new::<pound>(1.0).value,
            epsilon = 1e-15
        );
        assert_relative_eq!(lookup("lb").unwrap().scale, 0.453_592_4, epsilon = 1e-9);
        assert_relative_eq!(lookup("psi").unwrap().scale, 6_894.757, max_relative = 1e-6);
        assert_relative_eq!(lookup("atm").unwrap().scale, 101_325.0, max_relative = 1e-12);
        assert_relative_eq!(lookup("L").unwrap().scale, 1e-3, max_relative = 1e-12);
        assert_relative_eq!(lookup("kcal").unwrap().scale, 4_184.0, max_relative = 1e-12);
    }

    #[test]
    fn temperature_scales_are_affine() {
        let celsius = lookup("degC").unwrap();
        assert!(celsius.is_affine());
        assert_relative_eq!(celsius.offset, 273.15, epsilon = 1e-9);
        assert_relative_eq!(celsius.scale, 1.0, epsilon = 1e-12);

        let fahrenheit = lookup("degF").unwrap();
        assert_relative_eq!(fahrenheit.scale, 5.0 / 9.0, epsilon = 1e-12);
        assert_relative_eq!(fahrenheit.offset, 255.372_222, epsilon = 1e-6);

        assert!(!lookup("K").unwrap().is_affine());
    }

    #[test]
    fn tokens_are_case_sensitive_and_unique() {
        assert!(lookup("pa").is_none());
        assert!(lookup("Pa").is_some());

        let mut seen: Vec<_> = symbols().collect();
        let total = seen.len();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), total);
    }
}
