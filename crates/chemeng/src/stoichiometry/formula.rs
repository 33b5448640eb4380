//! Chemical formulas such as `H2O`, `Ca(OH)2`, or `CH3(C(H2))4OH`.
//!
//! ```text
//! formula := group
//! group   := { element | "(" group ")" [count] }
//! element := uppercase [lowercase] [count]
//! ```

use std::collections::BTreeMap;

use super::StoichiometryError;

/// Counts the atoms of each element in `formula`.
pub(super) fn parse(formula: &str) -> Result<BTreeMap<String, u32>, StoichiometryError> {
    let mut parser = Parser {
        formula,
        chars: formula.char_indices().peekable(),
    };

    let atoms = parser.group()?;
    match parser.chars.next() {
        None => Ok(atoms),
        Some((offset, found)) => Err(parser.error(offset, found)),
    }
}

struct Parser<'a> {
    formula: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl Parser<'_> {
    /// Parses elements and parenthesized groups up to a `)` or the end.
    fn group(&mut self) -> Result<BTreeMap<String, u32>, StoichiometryError> {
        let mut atoms = BTreeMap::new();

        while let Some(&(offset, c)) = self.chars.peek() {
            match c {
                'A'..='Z' => {
                    self.chars.next();
                    let mut symbol = c.to_string();
                    if let Some(&(_, lower @ 'a'..='z')) = self.chars.peek() {
                        symbol.push(lower);
                        self.chars.next();
                    }
                    let count = self.count()?;
                    *atoms.entry(symbol).or_insert(0) += count;
                }
                '(' => {
                    self.chars.next();
                    let inner = self.group()?;
                    match self.chars.next() {
                        Some((_, ')')) => {}
                        Some((offset, found)) => return Err(self.error(offset, found)),
                        None => {
                            return Err(StoichiometryError::InvalidFormula {
                                formula: self.formula.to_string(),
                                reason: "unclosed `(`".to_string(),
                            });
                        }
                    }
                    let count = self.count()?;
                    for (symbol, n) in inner {
                        *atoms.entry(symbol).or_insert(0) += n * count;
                    }
                }
                ')' => break,
                _ => return Err(self.error(offset, c)),
            }
        }

        Ok(atoms)
    }

    /// Reads an optional count, defaulting to 1.
    fn count(&mut self) -> Result<u32, StoichiometryError> {
        let mut digits = String::new();
        while let Some(&(_, d @ '0'..='9')) = self.chars.peek() {
            digits.push(d);
            self.chars.next();
        }

        if digits.is_empty() {
            return Ok(1);
        }
        digits
            .parse()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| StoichiometryError::InvalidFormula {
                formula: self.formula.to_string(),
                reason: format!("invalid count `{digits}`"),
            })
    }

    fn error(&self, offset: usize, found: char) -> StoichiometryError {
        StoichiometryError::InvalidFormula {
            formula: self.formula.to_string(),
            reason: format!("unexpected `{found}` at offset {offset}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atoms(formula: &str) -> Vec<(String, u32)> {
        parse(formula).unwrap().into_iter().collect()
    }

    fn counts(pairs: &[(&str, u32)]) -> Vec<(String, u32)> {
        let mut pairs: Vec<(String, u32)> =
            pairs.iter().map(|(s, n)| ((*s).to_string(), *n)).collect();
        pairs.sort();
        pairs
    }

    #[test]
    fn counts_simple_formulas() {
        assert_eq!(atoms("H2O"), counts(&[("H", 2), ("O", 1)]));
        assert_eq!(atoms("NaCl"), counts(&[("Na", 1), ("Cl", 1)]));
        assert_eq!(atoms("CH3CH2OH"), counts(&[("C", 2), ("H", 6), ("O", 1)]));
        assert_eq!(atoms("C12H22O11"), counts(&[("C", 12), ("H", 22), ("O", 11)]));
    }

    #[test]
    fn expands_nested_groups() {
        assert_eq!(atoms("Ca(OH)2"), counts(&[("Ca", 1), ("O", 2), ("H", 2)]));
        assert_eq!(
            atoms("CH3(C(H2))4OH"),
            counts(&[("C", 5), ("H", 12), ("O", 1)])
        );
        assert_eq!(atoms("((CH2)2)3"), counts(&[("C", 6), ("H", 12)]));
    }

    #[test]
    fn rejects_malformed_formulas() {
        for bad in ["h2o", "H2O)", "Ca(OH2", "H0", "H-2", "2H2O"] {
            assert!(
                matches!(parse(bad), Err(StoichiometryError::InvalidFormula { .. })),
                "{bad} should be rejected"
            );
        }
    }
}
