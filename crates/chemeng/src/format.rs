//! Rendering solutions for people.

use chemeng_units::{Unit, round_to_significant};

/// How many digits a rendered value keeps.
///
/// Precision only affects display; numeric results are never rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// A fixed number of significant figures.
    Significant(u32),
    /// As many significant figures as the least precise known input.
    FromInputs,
    /// Every digit of the `f64`.
    Full,
}

impl Precision {
    pub const DEFAULT_DIGITS: u32 = 4;

    /// Resolves to a digit count, or `None` for full precision.
    #[must_use]
    pub fn digits(self, input_sigfigs: Option<u32>) -> Option<u32> {
        match self {
            Self::Significant(n) => Some(n.max(1)),
            Self::FromInputs => Some(input_sigfigs.unwrap_or(Self::DEFAULT_DIGITS)),
            Self::Full => None,
        }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::Significant(Self::DEFAULT_DIGITS)
    }
}

/// Converts SI roots to `unit` and renders `"<symbol> = <value> <unit>"`,
/// joining several roots with `" or "` in ascending order.
///
/// For a sign-ambiguous variable the magnitude of every negative root is
/// listed as well.
#[must_use]
pub fn format(
    symbol: &str,
    roots_si: &[f64],
    unit: &Unit,
    sign_ambiguous: bool,
    digits: Option<u32>,
) -> String {
    let mut values: Vec<f64> = roots_si
        .iter()
        .map(|&si| unit.from_si(si))
        .map(|value| digits.map_or(value, |n| round_to_significant(value, n)))
        .collect();

    if sign_ambiguous {
        let magnitudes: Vec<f64> = values.iter().filter(|v| **v < 0.0).map(|v| -v).collect();
        values.extend(magnitudes);
    }

    // Adding zero turns -0.0 into 0.0.
    let mut values: Vec<f64> = values.into_iter().map(|v| v + 0.0).collect();
    values.sort_by(f64::total_cmp);
    values.dedup_by(|a, b| nearly_equal(*a, *b));

    if values.is_empty() {
        return format!("{symbol} has no solution");
    }

    let rendered: Vec<String> = values
        .iter()
        .map(|value| {
            if unit.is_dimensionless() {
                value.to_string()
            } else {
                format!("{value} {unit}")
            }
        })
        .collect();

    format!("{symbol} = {}", rendered.join(" or "))
}

fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 * a.abs().max(b.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn unit(s: &str) -> Unit {
        Unit::parse(s).unwrap()
    }

    #[test]
    fn default_precision_is_four_significant_figures() {
        assert_eq!(Precision::default(), Precision::Significant(4));
        assert_eq!(Precision::default().digits(Some(2)), Some(4));
        assert_eq!(Precision::FromInputs.digits(Some(2)), Some(2));
        assert_eq!(Precision::FromInputs.digits(None), Some(4));
        assert_eq!(Precision::Full.digits(Some(2)), None);
        assert_eq!(Precision::Significant(0).digits(None), Some(1));
    }

    #[test]
    fn joins_roots_in_ascending_order() {
        let display = format("v", &[10.9712, -10.9712], &unit("m/s"), true, Some(4));
        assert_eq!(display, "v = -10.97 m/s or 10.97 m/s");
    }

    #[test]
    fn appends_the_magnitude_of_a_lone_negative_root() {
        let display = format("v", &[-10.9712], &unit("m/s"), true, Some(4));
        assert_eq!(display, "v = -10.97 m/s or 10.97 m/s");

        let display = format("h", &[-2.5], &unit("m"), false, Some(4));
        assert_eq!(display, "h = -2.5 m");
    }

    #[test]
    fn converts_from_si() {
        let display = format("P", &[101_325.0], &unit("psi"), false, Some(6));
        assert_eq!(display, "P = 14.6959 psi");

        let display = format("T", &[373.15], &unit("degC"), false, Some(4));
        assert_eq!(display, "T = 100 degC");
    }

    #[test]
    fn full_precision_keeps_every_digit() {
        let display = format("x", &[1.0 / 3.0], &Unit::dimensionless(), false, None);
        assert_eq!(display, format!("x = {}", 1.0 / 3.0));
    }

    #[test]
    fn zero_is_not_duplicated() {
        let display = format("v", &[0.0, -0.0], &unit("m/s"), true, Some(4));
        assert_eq!(display, "v = 0 m/s");
    }

    #[test]
    fn no_roots() {
        assert_eq!(
            format("v", &[], &unit("m/s"), true, Some(4)),
            "v has no solution"
        );
    }

    proptest! {
        #[test]
        fn negative_speed_is_paired_with_its_magnitude(x in 1e-3f64..1e6) {
            let display = format("v", &[-x], &unit("m/s"), true, Some(4));
            let rounded = round_to_significant(-x, 4);
            prop_assert_eq!(display, format!("v = {rounded} m/s or {} m/s", -rounded));
        }
    }
}
