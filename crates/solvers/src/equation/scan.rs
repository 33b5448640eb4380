//! Grid scan for sign changes.
//!
//! A scan evaluates the residual on a fixed grid of trial values and reports
//! every adjacent pair whose residuals differ in sign. Each bracket can then be
//! refined with [`bisection`](super::bisection), which is how a relation with
//! several roots (such as a velocity that enters squared) gets all of them.

use std::error::Error as StdError;

use thiserror::Error;

use chemeng_core::{EquationProblem, Model};

use crate::equation::{BoxError, EvalError, evaluate};

/// Number of decades on each side of zero in the default grid.
pub const DEFAULT_DECADES: u32 = 7;

/// Trial values for a scan, in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    points: Vec<f64>,
}

impl Grid {
    /// Builds the grid `-10^(decades-1), …, -10, -1, 0, 1, 10, …, 10^(decades-1)`.
    #[must_use]
    pub fn decades(decades: u32) -> Self {
        let positive: Vec<f64> = (0..decades).map(|k| 10f64.powi(k as i32)).collect();

        let points = positive
            .iter()
            .rev()
            .map(|x| -x)
            .chain(std::iter::once(0.0))
            .chain(positive.iter().copied())
            .collect();

        Self { points }
    }

    /// Builds a grid from arbitrary points.
    ///
    /// Non-finite points are dropped and the rest are sorted.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = f64>) -> Self {
        let mut points: Vec<f64> = points.into_iter().filter(|x| x.is_finite()).collect();
        points.sort_by(f64::total_cmp);
        points.dedup();
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[f64] {
        &self.points
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::decades(DEFAULT_DECADES)
    }
}

/// What a scan found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scan {
    /// Adjacent grid points whose residuals differ in sign, ascending.
    pub brackets: Vec<[f64; 2]>,
    /// Grid points where the residual is exactly zero.
    pub roots: Vec<f64>,
    /// Grid points skipped because the residual was not finite.
    pub skipped: Vec<f64>,
}

impl Scan {
    /// Returns true if the scan found neither a bracket nor an exact root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty() && self.roots.is_empty()
    }
}

/// Errors that can occur during a scan.
#[derive(Debug, Error)]
pub enum Error {
    #[error("problem error")]
    Problem(#[source] BoxError),

    #[error("model call failed")]
    Model(#[source] BoxError),
}

impl<ME, PE> From<EvalError<ME, PE>> for Error
where
    ME: StdError + Send + Sync + 'static,
    PE: StdError + Send + Sync + 'static,
{
    fn from(err: EvalError<ME, PE>) -> Self {
        match err.erase() {
            EvalError::Model(e) => Self::Model(e),
            EvalError::Problem(e) => Self::Problem(e),
        }
    }
}

/// Evaluates the residual at every grid point and collects sign changes.
///
/// A non-finite residual is skipped and breaks adjacency, so no bracket ever
/// spans a point where the residual is undefined. An exact zero is reported as
/// a root and likewise breaks adjacency.
///
/// # Errors
///
/// Returns an error if the model or problem fails at any grid point.
pub fn scan<M, P>(model: &M, problem: &P, grid: &Grid) -> Result<Scan, Error>
where
    M: Model,
    P: EquationProblem<1, Input = M::Input, Output = M::Output>,
{
    let mut found = Scan::default();
    let mut previous: Option<(f64, f64)> = None;

    for &x in grid.points() {
        let residual = evaluate(model, problem, [x])?.residual();

        if !residual.is_finite() {
            found.skipped.push(x);
            previous = None;
            continue;
        }

        if residual == 0.0 {
            found.roots.push(x);
            previous = None;
            continue;
        }

        if let Some((x_prev, r_prev)) = previous
            && r_prev.signum() != residual.signum()
        {
            found.brackets.push([x_prev, x]);
        }
        previous = Some((x, residual));
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    struct Function(fn(f64) -> f64);

    impl Model for Function {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
            Ok((self.0)(*input))
        }
    }

    struct Identity;

    impl EquationProblem<1> for Identity {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
            Ok(x[0])
        }

        fn residuals(
            &self,
            _input: &Self::Input,
            output: &Self::Output,
        ) -> Result<[f64; 1], Self::Error> {
            Ok([*output])
        }
    }

    #[test]
    fn default_grid_spans_seven_decades() {
        let grid = Grid::default();
        assert_eq!(grid.points().len(), 15);
        assert_eq!(grid.points()[0], -1e6);
        assert_eq!(grid.points()[7], 0.0);
        assert_eq!(grid.points()[14], 1e6);
        assert!(grid.points().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn brackets_a_single_root() {
        let found = scan(&Function(|x| x - 500.0), &Identity, &Grid::default()).unwrap();
        assert_eq!(found.brackets, vec![[100.0, 1000.0]]);
        assert!(found.roots.is_empty());
    }

    #[test]
    fn brackets_both_roots_of_a_quadratic() {
        let found = scan(&Function(|x| 120.0 - x * x), &Identity, &Grid::default()).unwrap();
        assert_eq!(found.brackets, vec![[-100.0, -10.0], [10.0, 100.0]]);
    }

    #[test]
    fn exact_zero_is_a_root() {
        let found = scan(&Function(|x| x * (x - 50.0)), &Identity, &Grid::default()).unwrap();
        assert_eq!(found.roots, vec![0.0]);
        assert_eq!(found.brackets, vec![[10.0, 100.0]]);
    }

    #[test]
    fn non_finite_points_are_skipped_and_never_bracketed() {
        // ln(x) - 1 is NaN for x < 0 and -inf at 0.
        let found = scan(&Function(|x| x.ln() - 1.0), &Identity, &Grid::default()).unwrap();
        assert_eq!(found.skipped.len(), 8);
        assert_eq!(found.brackets, vec![[1.0, 10.0]]);
    }

    #[test]
    fn no_sign_change_is_empty() {
        let found = scan(&Function(|x| x * x + 1.0), &Identity, &Grid::default()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn custom_grid_is_sorted() {
        let grid = Grid::from_points([3.0, f64::NAN, -1.0, 2.0, 2.0]);
        assert_eq!(grid.points(), &[-1.0, 2.0, 3.0]);
    }
}
