/// Counts the significant figures of a numeric literal.
///
/// The sign and any exponent are ignored, as are leading zeros. When the
/// literal has a decimal point every remaining digit counts, so `"001.00"`
/// has three and `".00000"` has five. Without a decimal point trailing zeros
/// are placeholders, so `"100"` has one.
///
/// Returns `None` if the literal is not a plain decimal number or has no
/// significant digits at all, as with `"0"`.
#[must_use]
pub fn significant_figures(literal: &str) -> Option<u32> {
    let literal = literal.trim();
    let unsigned = literal.strip_prefix(['-', '+']).unwrap_or(literal);
    let mantissa = unsigned
        .split_once(['e', 'E'])
        .map_or(unsigned, |(mantissa, _)| mantissa);

    if mantissa.is_empty()
        || mantissa.matches('.').count() > 1
        || !mantissa.chars().all(|c| c.is_ascii_digit() || c == '.')
    {
        return None;
    }

    let significant = mantissa.trim_start_matches('0');
    let digits = if significant.contains('.') {
        significant.chars().filter(char::is_ascii_digit).count()
    } else {
        significant.trim_end_matches('0').len()
    };

    u32::try_from(digits).ok().filter(|&n| n > 0)
}

/// Rounds `value` to `n` significant figures.
///
/// Zero and non-finite values are returned unchanged.
#[must_use]
pub fn round_to_significant(value: f64, n: u32) -> f64 {
    if value == 0.0 || !value.is_finite() || n == 0 {
        return value;
    }

    // An f64 carries at most 17 significant decimal digits.
    let n = n.min(17) as i32;
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = n - 1 - magnitude;

    // Dividing by an exact power of ten keeps results like 10.97 exact.
    if decimals >= 0 {
        let factor = 10f64.powi(decimals);
        if !factor.is_finite() {
            return value;
        }
        (value * factor).round() / factor
    } else {
        let factor = 10f64.powi(-decimals);
        (value / factor).round() * factor
    }
}
