//! Balancing chemical equations.
//!
//! A reaction such as `CH4 + O2 --> CO2 + H2O` is balanced by finding
//! coefficients that conserve every element. Each element gives one linear
//! equation over the coefficients (reactants counted positive, products
//! negative), and a balanced reaction is the one-dimensional null space of that
//! element matrix, scaled so the smallest coefficient is 1.
//!
//! ```
//! use chemeng::stoichiometry::Reaction;
//!
//! let balanced = Reaction::parse("CH4 + O2 --> CO2 + H2O")?.balance()?;
//! assert_eq!(balanced.coefficients(), &[1.0, 2.0, 1.0, 2.0]);
//! assert_eq!(balanced.to_string(), "CH4 + 2 O2 --> CO2 + 2 H2O");
//! # Ok::<(), chemeng::stoichiometry::StoichiometryError>(())
//! ```

mod formula;

use std::{collections::BTreeMap, fmt};

use thiserror::Error;
use tracing::debug;

/// Pivots smaller than this are treated as zero during elimination.
const PIVOT_TOL: f64 = 1e-9;

/// Errors raised while parsing or balancing a reaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoichiometryError {
    #[error("no `>` separates reactants from products in `{equation}`")]
    MissingArrow { equation: String },

    #[error("empty species in `{equation}`")]
    EmptySpecies { equation: String },

    #[error("invalid formula `{formula}`: {reason}")]
    InvalidFormula { formula: String, reason: String },

    #[error("{element} is not present on both sides of the equation")]
    OneSidedElement { element: String },

    #[error("could not find a unique balance for `{equation}`")]
    NoBalance { equation: String },
}

/// One species as written, with its atom counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Species {
    formula: String,
    atoms: BTreeMap<String, u32>,
}

impl Species {
    /// Parses a formula. A leading coefficient such as the `2` in `2 H2O` is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the formula is empty or malformed.
    pub fn parse(text: &str) -> Result<Self, StoichiometryError> {
        let formula = text
            .trim()
            .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.')
            .trim_start();

        if formula.is_empty() {
            return Err(StoichiometryError::InvalidFormula {
                formula: text.trim().to_string(),
                reason: "no elements".to_string(),
            });
        }

        Ok(Self {
            formula: formula.to_string(),
            atoms: formula::parse(formula)?,
        })
    }

    /// The formula as written.
    #[must_use]
    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// The number of atoms of `element` in one molecule.
    #[must_use]
    pub fn count(&self, element: &str) -> u32 {
        self.atoms.get(element).copied().unwrap_or(0)
    }

    /// Iterates over `(element, count)` in element order.
    pub fn atoms(&self) -> impl Iterator<Item = (&str, u32)> {
        self.atoms.iter().map(|(element, n)| (element.as_str(), *n))
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formula)
    }
}

/// An unbalanced reaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    equation: String,
    reactants: Vec<Species>,
    products: Vec<Species>,
    /// Elements in order of first appearance.
    elements: Vec<String>,
}

impl Reaction {
    /// Parses `reactants > products`, where each side is a `+`-separated list
    /// of formulas and the separator is any arrow ending in `>` (`->`, `-->`,
    /// `=>`).
    ///
    /// # Errors
    ///
    /// Returns an error if there is no `>`, a species is empty or malformed,
    /// or an element appears on only one side.
    pub fn parse(equation: &str) -> Result<Self, StoichiometryError> {
        let (lhs, rhs) =
            equation
                .split_once('>')
                .ok_or_else(|| StoichiometryError::MissingArrow {
                    equation: equation.to_string(),
                })?;
        let lhs = lhs.trim_end().trim_end_matches(['-', '=', '<']);

        let side = |text: &str| -> Result<Vec<Species>, StoichiometryError> {
            text.split('+')
                .map(|term| {
                    if term.trim().is_empty() {
                        Err(StoichiometryError::EmptySpecies {
                            equation: equation.to_string(),
                        })
                    } else {
                        Species::parse(term)
                    }
                })
                .collect()
        };

        let reactants = side(lhs)?;
        let products = side(rhs)?;

        let mut elements: Vec<String> = Vec::new();
        for species in reactants.iter().chain(&products) {
            // Keys come out sorted; keep the order species list them in.
            for element in formula_order(species) {
                if !elements.contains(&element) {
                    elements.push(element);
                }
            }
        }

        for element in &elements {
            let present = |list: &[Species]| list.iter().any(|s| s.count(element) > 0);
            if !present(&reactants) || !present(&products) {
                return Err(StoichiometryError::OneSidedElement {
                    element: element.clone(),
                });
            }
        }

        Ok(Self {
            equation: equation.trim().to_string(),
            reactants,
            products,
            elements,
        })
    }

    #[must_use]
    pub fn reactants(&self) -> &[Species] {
        &self.reactants
    }

    #[must_use]
    pub fn products(&self) -> &[Species] {
        &self.products
    }

    /// Elements in order of first appearance.
    #[must_use]
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// One row per element: atoms in each reactant, then the negated atoms in
    /// each product.
    #[must_use]
    pub fn element_balance(&self) -> Vec<(&str, Vec<i64>)> {
        self.elements
            .iter()
            .map(|element| {
                let row = self
                    .reactants
                    .iter()
                    .map(|s| i64::from(s.count(element)))
                    .chain(self.products.iter().map(|s| -i64::from(s.count(element))))
                    .collect();
                (element.as_str(), row)
            })
            .collect()
    }

    /// Finds the coefficients that conserve every element.
    ///
    /// The smallest coefficient is 1 and the rest are rounded to two decimal
    /// places.
    ///
    /// # Errors
    ///
    /// Returns [`StoichiometryError::NoBalance`] unless exactly one set of
    /// positive coefficients, up to scale, balances the reaction.
    pub fn balance(&self) -> Result<Balanced, StoichiometryError> {
        let no_balance = || StoichiometryError::NoBalance {
            equation: self.equation.clone(),
        };

        let mut matrix: Vec<Vec<f64>> = self
            .element_balance()
            .into_iter()
            .map(|(_, row)| row.into_iter().map(|n| n as f64).collect())
            .collect();

        let columns = self.reactants.len() + self.products.len();
        let pivots = row_reduce(&mut matrix, columns);

        let free: Vec<usize> = (0..columns).filter(|c| !pivots.contains(c)).collect();
        let [free] = free.as_slice() else {
            debug!(nullity = free.len(), "reaction has no unique balance");
            return Err(no_balance());
        };

        let mut null = vec![0.0; columns];
        null[*free] = 1.0;
        for (row, &pivot) in pivots.iter().enumerate() {
            null[pivot] = -matrix[row][*free];
        }

        if !(null.iter().all(|&c| c > PIVOT_TOL) || null.iter().all(|&c| c < -PIVOT_TOL)) {
            return Err(no_balance());
        }

        let smallest = null
            .iter()
            .map(|c| c.abs())
            .fold(f64::INFINITY, f64::min);
        let coefficients = null
            .iter()
            .map(|c| (c.abs() / smallest * 100.0).round() / 100.0)
            .collect();

        Ok(Balanced {
            reaction: self.clone(),
            coefficients,
        })
    }
}

/// The elements of a species in the order its formula names them.
fn formula_order(species: &Species) -> Vec<String> {
    let mut order: Vec<(usize, String)> = species
        .atoms
        .keys()
        .map(|element| {
            let pos = first_position(&species.formula, element).unwrap_or(usize::MAX);
            (pos, element.clone())
        })
        .collect();
    order.sort();
    order.into_iter().map(|(_, element)| element).collect()
}

/// Finds `element` as a whole symbol, so `C` does not match inside `Cl`.
fn first_position(formula: &str, element: &str) -> Option<usize> {
    formula.match_indices(element).map(|(pos, _)| pos).find(|&pos| {
        !formula[pos + element.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase())
    })
}

/// Reduces `matrix` to reduced row echelon form in place and returns the pivot
/// column of each leading row.
fn row_reduce(matrix: &mut [Vec<f64>], columns: usize) -> Vec<usize> {
    let mut pivots = Vec::new();
    let mut row = 0;

    for col in 0..columns {
        if row == matrix.len() {
            break;
        }

        let Some(best) = (row..matrix.len())
            .max_by(|&a, &b| matrix[a][col].abs().total_cmp(&matrix[b][col].abs()))
        else {
            break;
        };
        if matrix[best][col].abs() < PIVOT_TOL {
            continue;
        }
        matrix.swap(row, best);

        let pivot = matrix[row][col];
        for value in &mut matrix[row] {
            *value /= pivot;
        }

        let lead = matrix[row].clone();
        for (i, other) in matrix.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = other[col];
            if factor != 0.0 {
                for (value, l) in other.iter_mut().zip(&lead) {
                    *value -= factor * l;
                }
            }
        }

        pivots.push(col);
        row += 1;
    }

    pivots
}

/// A reaction with the coefficients that balance it.
#[derive(Debug, Clone, PartialEq)]
pub struct Balanced {
    reaction: Reaction,
    coefficients: Vec<f64>,
}

impl Balanced {
    #[must_use]
    pub fn reaction(&self) -> &Reaction {
        &self.reaction
    }

    /// Coefficients for the reactants followed by the products.
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Pairs each species with its coefficient, reactants first.
    pub fn terms(&self) -> impl Iterator<Item = (&Species, f64)> {
        self.reaction
            .reactants
            .iter()
            .chain(&self.reaction.products)
            .zip(self.coefficients.iter().copied())
    }
}

/// Writes `CH4 + 2 O2 --> CO2 + 2 H2O`, leaving out coefficients of 1.
impl fmt::Display for Balanced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let split = self.reaction.reactants.len();
        let write_side = |f: &mut fmt::Formatter<'_>, terms: &[(&Species, f64)]| -> fmt::Result {
            for (i, (species, coefficient)) in terms.iter().enumerate() {
                if i > 0 {
                    f.write_str(" + ")?;
                }
                if *coefficient != 1.0 {
                    write!(f, "{coefficient} ")?;
                }
                write!(f, "{species}")?;
            }
            Ok(())
        };

        let terms: Vec<(&Species, f64)> = self.terms().collect();
        write_side(f, &terms[..split])?;
        f.write_str(" --> ")?;
        write_side(f, &terms[split..])
    }
}
