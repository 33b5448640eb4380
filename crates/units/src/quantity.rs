use std::{
    fmt,
    ops::{Div, Mul, Neg},
    str::FromStr,
};

use crate::{Dimension, Error, IncompatibleUnits, ParseError, Unit};

/// A magnitude tagged with a unit.
///
/// Quantities are immutable. Conversion returns a new quantity with the same
/// physical value expressed in another unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    magnitude: f64,
    unit: Unit,
}

impl Quantity {
    /// Creates a quantity from a magnitude and a unit.
    #[must_use]
    pub fn new(magnitude: f64, unit: Unit) -> Self {
        Self { magnitude, unit }
    }

    /// Creates a pure number.
    #[must_use]
    pub fn dimensionless(value: f64) -> Self {
        Self::new(value, Unit::dimensionless())
    }

    /// Creates a quantity in the coherent SI unit of `dimension`.
    #[must_use]
    pub fn from_si(value: f64, dimension: Dimension) -> Self {
        Self::new(value, Unit::si(dimension))
    }

    /// Parses a quantity string such as `"14.6959 psi"` or `"998.87 kg/m**3"`.
    ///
    /// The number and the unit must be separated by whitespace. A bare number
    /// parses as a dimensionless quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the string is empty, the number is malformed
    /// or not finite, or the unit expression is invalid.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }

        let (number, rest) = trimmed
            .split_once(char::is_whitespace)
            .unwrap_or((trimmed, ""));
        let rest = rest.trim_start();
        let unit = rest.trim_end();
        let unit_offset = input.len() - input.trim_start().len() + trimmed.len() - rest.len();

        let magnitude = number
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| ParseError::InvalidNumber {
                input: input.to_string(),
                number: number.to_string(),
            })?;

        let unit = if unit.is_empty() {
            Unit::dimensionless()
        } else {
            Unit::parse(unit).map_err(|err| with_input(err, input, unit_offset))?
        };

        Ok(Self { magnitude, unit })
    }

    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    #[must_use]
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.unit.dimension()
    }

    /// Returns the value in coherent SI units.
    #[must_use]
    pub fn si_value(&self) -> f64 {
        self.unit.to_si(self.magnitude)
    }

    /// Expresses this quantity in `target`.
    ///
    /// # Errors
    ///
    /// Returns [`IncompatibleUnits`] if the dimensions differ.
    pub fn convert(&self, target: &Unit) -> Result<Self, IncompatibleUnits> {
        if !self.unit.is_compatible(target) {
            return Err(self.incompatible(target));
        }
        Ok(Self::new(target.from_si(self.si_value()), target.clone()))
    }

    /// Parses `target` and expresses this quantity in it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if `target` is not a valid unit expression and
    /// [`Error::Incompatible`] if the dimensions differ.
    pub fn convert_to(&self, target: &str) -> Result<Self, Error> {
        let target = Unit::parse(target)?;
        Ok(self.convert(&target)?)
    }

    /// Adds `rhs`, expressed in this quantity's unit.
    ///
    /// # Errors
    ///
    /// Returns [`IncompatibleUnits`] if the dimensions differ.
    pub fn try_add(&self, rhs: &Quantity) -> Result<Self, IncompatibleUnits> {
        let rhs = rhs.convert(&self.unit)?;
        Ok(Self::new(self.magnitude + rhs.magnitude, self.unit.clone()))
    }

    /// Subtracts `rhs`, expressed in this quantity's unit.
    ///
    /// # Errors
    ///
    /// Returns [`IncompatibleUnits`] if the dimensions differ.
    pub fn try_sub(&self, rhs: &Quantity) -> Result<Self, IncompatibleUnits> {
        self.try_add(&-rhs)
    }

    fn incompatible(&self, target: &Unit) -> IncompatibleUnits {
        IncompatibleUnits {
            from: self.dimension(),
            to: target.dimension(),
            from_unit: self.unit.to_string(),
            to_unit: target.to_string(),
        }
    }
}

/// Reports a unit error against the full quantity string, with offsets
/// shifted by the position of the unit expression.
fn with_input(err: ParseError, input: &str, shift: usize) -> ParseError {
    let input = input.to_string();
    match err {
        ParseError::InvalidNumber { number, .. } => ParseError::InvalidNumber { input, number },
        ParseError::UnknownUnit { token, .. } => ParseError::UnknownUnit { input, token },
        ParseError::UnexpectedChar { found, offset, .. } => ParseError::UnexpectedChar {
            input,
            found,
            offset: offset + shift,
        },
        ParseError::UnexpectedToken {
            expected, offset, ..
        } => ParseError::UnexpectedToken {
            input,
            expected,
            offset: offset + shift,
        },
        ParseError::InvalidExponent { .. } => ParseError::InvalidExponent { input },
        ParseError::Empty => ParseError::Empty,
    }
}

impl FromStr for Quantity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Neg for &Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        Quantity::new(-self.magnitude, self.unit.clone())
    }
}

impl Mul for &Quantity {
    type Output = Quantity;

    fn mul(self, rhs: &Quantity) -> Quantity {
        Quantity::new(self.magnitude * rhs.magnitude, &self.unit * &rhs.unit)
    }
}

impl Div for &Quantity {
    type Output = Quantity;

    fn div(self, rhs: &Quantity) -> Quantity {
        Quantity::new(self.magnitude / rhs.magnitude, &self.unit / &rhs.unit)
    }
}

impl Mul<f64> for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        Quantity::new(self.magnitude * rhs, self.unit)
    }
}

impl Div<f64> for Quantity {
    type Output = Quantity;

    fn div(self, rhs: f64) -> Quantity {
        Quantity::new(self.magnitude / rhs, self.unit)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_dimensionless() {
            write!(f, "{}", self.magnitude)
        } else {
            write!(f, "{} {}", self.magnitude, self.unit)
        }
    }
}
