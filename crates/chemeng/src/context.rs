//! Named state variables at the initial and final points of a process.

use std::{collections::BTreeMap, fmt};

use tracing::debug;

use chemeng_units::{Quantity, Unit, significant_figures};

use crate::error::ConfigurationError;

/// The value that marks a slot as the one to solve for.
pub const UNKNOWN: &str = "unknown";

/// One of the two reference points a relation connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Point {
    Initial,
    Final,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Initial => "initial",
            Self::Final => "final",
        })
    }
}

/// A single named variable at one point.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// A known quantity and its cached SI value.
    Known { quantity: Quantity, si: f64 },
    /// The variable being solved for.
    Unknown,
}

impl Slot {
    /// Returns the SI value of a known slot.
    #[must_use]
    pub fn si(&self) -> Option<f64> {
        match self {
            Self::Known { si, .. } => Some(*si),
            Self::Unknown => None,
        }
    }
}

/// Known quantities normalized to SI, plus the single unknown.
///
/// Slots are kept in an ordered map so iteration, and everything derived from
/// it, is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    slots: BTreeMap<(Point, String), Slot>,
    unknown: (Point, String),
    output_unit: Option<Unit>,
    input_sigfigs: Option<u32>,
}

impl Context {
    /// Builds a context from `(name, value)` pairs at each point.
    ///
    /// Each value is either a quantity string such as `"10 yard"` or the
    /// sentinel `"unknown"` (any case, surrounding whitespace ignored). An
    /// empty `output_unit` selects the SI unit of the unknown's dimension.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if a value or the output unit fails to
    /// parse, a name repeats within a point, or the number of unknowns is not
    /// exactly one.
    pub fn new<I, F, K, V>(
        initial: I,
        final_: F,
        output_unit: &str,
    ) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (K, V)>,
        F: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut slots = BTreeMap::new();
        let mut sigfigs: Option<u32> = None;

        let entries = initial
            .into_iter()
            .map(|entry| (Point::Initial, entry))
            .chain(final_.into_iter().map(|entry| (Point::Final, entry)));

        for (point, (name, value)) in entries {
            let name = name.as_ref().trim().to_string();
            let value = value.as_ref().trim();

            let slot = if value.eq_ignore_ascii_case(UNKNOWN) {
                Slot::Unknown
            } else {
                let quantity =
                    Quantity::parse(value).map_err(|source| ConfigurationError::InvalidValue {
                        name: name.clone(),
                        point,
                        source,
                    })?;

                if let Some(n) = value.split_whitespace().next().and_then(significant_figures) {
                    sigfigs = Some(sigfigs.map_or(n, |m| m.min(n)));
                }

                let si = quantity.si_value();
                Slot::Known { quantity, si }
            };

            if slots.insert((point, name.clone()), slot).is_some() {
                return Err(ConfigurationError::DuplicateVariable { name, point });
            }
        }

        let unknowns: Vec<&(Point, String)> = slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Unknown))
            .map(|(key, _)| key)
            .collect();

        let unknown = match unknowns.as_slice() {
            [] => return Err(ConfigurationError::NoUnknown),
            [only] => (*only).clone(),
            many => {
                return Err(ConfigurationError::MultipleUnknowns {
                    slots: many
                        .iter()
                        .map(|(point, name)| format!("{point} `{name}`"))
                        .collect(),
                });
            }
        };

        let output_unit = match output_unit.trim() {
            "" => None,
            unit => Some(Unit::parse(unit).map_err(|source| {
                ConfigurationError::InvalidOutputUnit {
                    unit: unit.to_string(),
                    source,
                }
            })?),
        };

        debug!(
            unknown = %unknown.1,
            point = %unknown.0,
            knowns = slots.len() - 1,
            input_sigfigs = ?sigfigs,
            "built context"
        );

        Ok(Self {
            slots,
            unknown,
            output_unit,
            input_sigfigs: sigfigs,
        })
    }

    /// Returns the slot for `name` at `point`, if present.
    #[must_use]
    pub fn slot(&self, name: &str, point: Point) -> Option<&Slot> {
        self.slots.get(&(point, name.to_string()))
    }

    /// Returns the SI value of a known slot.
    #[must_use]
    pub fn known(&self, name: &str, point: Point) -> Option<f64> {
        self.slot(name, point).and_then(Slot::si)
    }

    /// Returns the quantity as given for a known slot.
    #[must_use]
    pub fn quantity(&self, name: &str, point: Point) -> Option<&Quantity> {
        match self.slot(name, point) {
            Some(Slot::Known { quantity, .. }) => Some(quantity),
            _ => None,
        }
    }

    #[must_use]
    pub fn unknown_name(&self) -> &str {
        &self.unknown.1
    }

    #[must_use]
    pub fn unknown_point(&self) -> Point {
        self.unknown.0
    }

    /// Returns true if `name` at `point` is the unknown.
    #[must_use]
    pub fn is_unknown(&self, name: &str, point: Point) -> bool {
        self.unknown.0 == point && self.unknown.1 == name
    }

    /// The requested output unit, or `None` for the SI default.
    #[must_use]
    pub fn output_unit(&self) -> Option<&Unit> {
        self.output_unit.as_ref()
    }

    /// The fewest significant figures among the known inputs.
    #[must_use]
    pub fn input_sigfigs(&self) -> Option<u32> {
        self.input_sigfigs
    }

    /// Iterates over every slot in `(point, name)` order.
    pub fn slots(&self) -> impl Iterator<Item = (Point, &str, &Slot)> {
        self.slots
            .iter()
            .map(|((point, name), slot)| (*point, name.as_str(), slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn bernoulli_context() -> Result<Context, ConfigurationError> {
        Context::new(
            [
                ("v", "0 ft/s"),
                ("h", "10 yard"),
                ("P", "14.6959 psi"),
                ("rho", "998.87 kg/m**3"),
            ],
            [
                ("v", "unknown"),
                ("h", "3.00123 m"),
                ("P", "101325 pascal"),
                ("rho", "62.423 lb/ft^3"),
            ],
            "m/s",
        )
    }

    #[test]
    fn normalizes_known_values_to_si() {
        let context = bernoulli_context().unwrap();

        assert_relative_eq!(context.known("h", Point::Initial).unwrap(), 9.144);
        assert_relative_eq!(
            context.known("P", Point::Initial).unwrap(),
            101_325.0,
            max_relative = 1e-5
        );
        assert_relative_eq!(
            context.known("rho", Point::Final).unwrap(),
            999.92,
            max_relative = 1e-4
        );
        assert_eq!(context.known("v", Point::Final), None);
        assert_eq!(context.slot("v", Point::Final), Some(&Slot::Unknown));
        assert_eq!(context.slot("T", Point::Final), None);

        assert_eq!(context.unknown_name(), "v");
        assert_eq!(context.unknown_point(), Point::Final);
        assert!(context.is_unknown("v", Point::Final));
        assert!(!context.is_unknown("v", Point::Initial));
        assert_eq!(context.output_unit().unwrap().to_string(), "m/s");
    }

    #[test]
    fn tracks_the_fewest_significant_figures() {
        let context = bernoulli_context().unwrap();
        // "0" has none; "10" has one.
        assert_eq!(context.input_sigfigs(), Some(1));

        let context = Context::new(
            [("x", "1.50 m"), ("y", "2.000 m")],
            [("x", "Unknown")],
            "",
        )
        .unwrap();
        assert_eq!(context.input_sigfigs(), Some(3));
        assert!(context.output_unit().is_none());
    }

    #[test]
    fn sentinel_is_case_insensitive_and_trimmed() {
        let context = Context::new([("v", "  UNKNOWN ")], [("v", "1 m/s")], "").unwrap();
        assert_eq!(context.unknown_point(), Point::Initial);
    }

    #[test]
    fn requires_exactly_one_unknown() {
        let none = Context::new([("v", "1 m/s")], [("v", "2 m/s")], "");
        assert_eq!(none, Err(ConfigurationError::NoUnknown));

        let two = Context::new([("v", "unknown")], [("v", "unknown")], "");
        assert_eq!(
            two,
            Err(ConfigurationError::MultipleUnknowns {
                slots: vec!["initial `v`".to_string(), "final `v`".to_string()],
            })
        );
    }

    #[test]
    fn rejects_bad_values() {
        let err = Context::new([("h", "10yard")], [("h", "unknown")], "").unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvalidValue { ref name, point: Point::Initial, .. } if name == "h"
        ));

        let err = Context::new([("h", "1 m")], [("h", "unknown")], "furlong").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidOutputUnit { .. }));

        let err = Context::new([("h", "1 m"), ("h", "2 m")], [("h", "unknown")], "").unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateVariable { .. }));
    }

    #[test]
    fn identical_inputs_give_identical_contexts() {
        assert_eq!(bernoulli_context().unwrap(), bernoulli_context().unwrap());
    }

    #[test]
    fn slots_iterate_in_point_then_name_order() {
        let context = bernoulli_context().unwrap();
        let order: Vec<(Point, &str)> = context.slots().map(|(p, n, _)| (p, n)).collect();
        assert_eq!(
            order,
            vec![
                (Point::Initial, "P"),
                (Point::Initial, "h"),
                (Point::Initial, "rho"),
                (Point::Initial, "v"),
                (Point::Final, "P"),
                (Point::Final, "h"),
                (Point::Final, "rho"),
                (Point::Final, "v"),
            ]
        );
    }
}
