use std::{
    fmt,
    ops::{Div, Mul},
    str::FromStr,
};

use crate::{
    Dimension, ParseError,
    lexer::{Lexer, Token, TokenKind},
    table,
};

/// Largest exponent magnitude accepted on a single unit factor.
const MAX_EXPONENT: u32 = 64;

/// A unit of measure resolved at runtime.
///
/// A unit maps a magnitude to SI with `si = magnitude · scale + offset`.
/// The offset is non-zero only for an affine temperature scale (`degC`,
/// `degF`) written on its own; inside a compound expression such as
/// `J/degC` or `degC^2` the temperature scale is treated as an interval and
/// only its scale applies.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    factors: Vec<(String, i32)>,
    dimension: Dimension,
    scale: f64,
    offset: f64,
}

impl Unit {
    /// Parses a unit expression such as `kg/m^3`, `kg*m**-3`, or `/s`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the expression is empty, contains a
    /// character outside the unit grammar, is malformed, or names an unknown
    /// unit token.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        if tokens.is_empty() {
            return Err(ParseError::Empty);
        }
        Parser {
            input,
            tokens: &tokens,
            pos: 0,
        }
        .parse()
    }

    /// The unit of a pure number.
    #[must_use]
    pub fn dimensionless() -> Self {
        Self {
            factors: Vec::new(),
            dimension: Dimension::NONE,
            scale: 1.0,
            offset: 0.0,
        }
    }

    /// The coherent SI unit of a dimension.
    ///
    /// Named derived units are used where they exist (`Pa`, `N`, `J`, `W`),
    /// otherwise the unit is written in SI base units.
    #[must_use]
    pub fn si(dimension: Dimension) -> Self {
        let factors = if let Some(symbol) = si_symbol(dimension) {
            vec![(symbol.to_string(), 1)]
        } else {
            dimension
                .exponents()
                .into_iter()
                .zip(["m", "kg", "s", "A", "K", "mol", "cd"])
                .filter(|(exp, _)| *exp != 0)
                .map(|(exp, symbol)| (symbol.to_string(), exp))
                .collect()
        };

        Self {
            factors,
            dimension,
            scale: 1.0,
            offset: 0.0,
        }
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Multiplier from this unit to SI.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// SI value of a zero magnitude in this unit.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Returns true if this unit has no dimension.
    #[must_use]
    pub fn is_dimensionless(&self) -> bool {
        self.dimension.is_dimensionless()
    }

    /// Returns true if quantities in `other` can be converted to this unit.
    #[must_use]
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    /// Converts a magnitude in this unit to SI.
    #[must_use]
    pub fn to_si(&self, magnitude: f64) -> f64 {
        magnitude * self.scale + self.offset
    }

    /// Converts an SI value to a magnitude in this unit.
    #[must_use]
    pub fn from_si(&self, si: f64) -> f64 {
        (si - self.offset) / self.scale
    }

    /// Raises the unit to an integer power.
    #[must_use]
    pub fn powi(&self, n: i32) -> Self {
        Self {
            factors: self
                .factors
                .iter()
                .map(|(symbol, exp)| (symbol.clone(), exp * n))
                .filter(|(_, exp)| *exp != 0)
                .collect(),
            dimension: self.dimension.powi(n),
            scale: self.scale.powi(n),
            offset: 0.0,
        }
    }
}

fn si_symbol(dimension: Dimension) -> Option<&'static str> {
    const SYMBOLS: [(Dimension, &str); 4] = [
        (Dimension::FORCE, "N"),
        (Dimension::PRESSURE, "Pa"),
        (Dimension::ENERGY, "J"),
        (Dimension::POWER, "W"),
    ];
    SYMBOLS
        .iter()
        .find(|(dim, _)| *dim == dimension)
        .map(|(_, symbol)| *symbol)
}

impl FromStr for Unit {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Mul for &Unit {
    type Output = Unit;

    fn mul(self, rhs: &Unit) -> Unit {
        Unit {
            factors: self.factors.iter().chain(&rhs.factors).cloned().collect(),
            dimension: self.dimension * rhs.dimension,
            scale: self.scale * rhs.scale,
            offset: 0.0,
        }
    }
}

impl Div for &Unit {
    type Output = Unit;

    fn div(self, rhs: &Unit) -> Unit {
        self * &rhs.powi(-1)
    }
}

/// Writes the unit as `num*num/den/den`, with a leading `/` when nothing is
/// in the numerator. The output parses back to the same unit.
impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_factor = |f: &mut fmt::Formatter<'_>, symbol: &str, exp: i32| {
            if exp == 1 {
                f.write_str(symbol)
            } else {
                write!(f, "{symbol}^{exp}")
            }
        };

        let mut first = true;
        for (symbol, exp) in self.factors.iter().filter(|(_, exp)| *exp > 0) {
            if !first {
                f.write_str("*")?;
            }
            write_factor(f, symbol, *exp)?;
            first = false;
        }
        for (symbol, exp) in self.factors.iter().filter(|(_, exp)| *exp < 0) {
            f.write_str("/")?;
            write_factor(f, symbol, -exp)?;
        }
        Ok(())
    }
}

/// Recursive-descent parser over the lexer's tokens.
///
/// ```text
/// unit   := [ "/" ] factor { ( "*" | "/" ) factor }
/// factor := ident [ power [ "-" ] integer ]
/// ```
struct Parser<'a, 't> {
    input: &'a str,
    tokens: &'t [Token<'a>],
    pos: usize,
}

impl<'a> Parser<'a, '_> {
    fn parse(mut self) -> Result<Unit, ParseError> {
        let mut unit = Unit::dimensionless();
        let mut count = 0;

        let mut sign = if self.eat(TokenKind::Slash) { -1 } else { 1 };
        loop {
            let (def, exp) = self.factor()?;
            let exp = exp * sign;

            unit.factors.push((def.symbol.to_string(), exp));
            unit.dimension = unit.dimension * def.dimension.powi(exp);
            unit.scale *= def.scale.powi(exp);
            count += 1;

            if count == 1 && exp == 1 {
                unit.offset = def.offset;
            } else {
                unit.offset = 0.0;
            }

            sign = match self.tokens.get(self.pos).map(|t| t.kind) {
                None => break,
                Some(TokenKind::Star) => 1,
                Some(TokenKind::Slash) => -1,
                Some(_) => return Err(self.expected("`*` or `/`")),
            };
            self.pos += 1;
        }

        // A zero exponent such as `m^0` leaves no factor behind.
        unit.factors.retain(|(_, exp)| *exp != 0);
        Ok(unit)
    }

    fn factor(&mut self) -> Result<(&'static table::UnitDef, i32), ParseError> {
        let Some(&Token {
            kind: TokenKind::Ident(symbol),
            ..
        }) = self.tokens.get(self.pos)
        else {
            return Err(self.expected("a unit"));
        };
        let def = table::lookup(symbol).ok_or_else(|| ParseError::UnknownUnit {
            input: self.input.to_string(),
            token: symbol.to_string(),
        })?;
        self.pos += 1;

        if !self.eat(TokenKind::Power) {
            return Ok((def, 1));
        }

        let negative = self.eat(TokenKind::Minus);
        let Some(&Token {
            kind: TokenKind::Integer(value),
            ..
        }) = self.tokens.get(self.pos)
        else {
            return Err(self.expected("an integer exponent"));
        };
        self.pos += 1;

        if value > MAX_EXPONENT {
            return Err(ParseError::InvalidExponent {
                input: self.input.to_string(),
            });
        }
        let exp = value as i32;
        Ok((def, if negative { -exp } else { exp }))
    }

    fn eat(&mut self, kind: TokenKind<'a>) -> bool {
        if self.tokens.get(self.pos).map(|t| t.kind) == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expected(&self, expected: &'static str) -> ParseError {
        let offset = self
            .tokens
            .get(self.pos)
            .map_or(self.input.len(), |t| t.offset);
        ParseError::UnexpectedToken {
            input: self.input.to_string(),
            expected,
            offset,
        }
    }
}
