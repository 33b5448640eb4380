//! Secant iteration from a single seed.
//!
//! The secant method replaces the derivative in Newton's method with the
//! slope through the two most recent iterates:
//!
//! ```text
//! x_{n+1} = x_n - r(x_n) · (x_n - x_{n-1}) / (r(x_n) - r(x_{n-1}))
//! ```
//!
//! It needs no bracket and converges superlinearly near a simple root, but it
//! can wander for a poor seed. A root is only reported once its residual is
//! within tolerance; running out of iterations, or steps that stall above it,
//! is an error.

mod config;
mod error;

pub use config::{Config, ConfigError};
pub use error::Error;

use chemeng_core::{EquationProblem, Model, Observer};

use crate::equation::{Evaluation, Solution, Status, best::Best, evaluate};

/// Control actions supported by the secant solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver early and return the best solution found so far.
    StopEarly,
}

/// Iteration event emitted by the secant solver.
#[derive(Debug)]
pub struct Event<'a, I, O> {
    /// Iteration counter (1-based).
    pub iter: usize,
    /// The iterate the step was taken from.
    pub previous: f64,
    /// Evaluation at the new iterate.
    pub eval: &'a Evaluation<I, O, 1>,
}

/// Finds a root of the equation with the secant method, starting at `seed`.
///
/// # Errors
///
/// Returns an error if the seed is not finite, a residual is not finite, the
/// residual is flat so no secant step exists, steps fall below the x
/// tolerance without reducing the residual, the iteration budget runs out,
/// or the model or problem returns an error during evaluation.
pub fn solve<M, P, Obs>(
    model: &M,
    problem: &P,
    seed: f64,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    P: EquationProblem<1, Input = M::Input, Output = M::Output>,
    Obs: for<'a> Observer<Event<'a, M::Input, M::Output>, Action>,
{
    if !seed.is_finite() {
        return Err(Error::NonFiniteSeed { seed });
    }

    let first = checked(evaluate(model, problem, [seed])?)?;
    if first.residual().abs() <= config.residual_tol() {
        return Ok(Solution::from_eval(first, Status::Converged, 0));
    }

    let x1 = seed + config.perturbation() * seed.abs().max(1.0);
    let second = checked(evaluate(model, problem, [x1])?)?;
    if second.residual().abs() <= config.residual_tol() {
        return Ok(Solution::from_eval(second, Status::Converged, 0));
    }

    let (mut x_prev, mut r_prev) = (seed, first.residual());
    let (mut x, mut r) = (x1, second.residual());
    let mut best = Best::of(first, second);

    for iter in 1..=config.max_iters() {
        let slope = (r - r_prev) / (x - x_prev);
        let next = x - r / slope;
        if slope == 0.0 || !next.is_finite() {
            return Err(Error::FlatResidual { x, residual: r });
        }

        let eval = checked(evaluate(model, problem, [next])?)?;
        let r_next = eval.residual();

        let event = Event {
            iter,
            previous: x,
            eval: &eval,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            best.update(eval);
            return Ok(best.finish(Status::StoppedByObserver, iter));
        }

        if r_next.abs() <= config.residual_tol() {
            return Ok(Solution::from_eval(eval, Status::Converged, iter));
        }
        // Steps below the x tolerance that no longer shrink the residual.
        if config.is_step_converged(x, next) && r_next.abs() >= r.abs() {
            return Err(Error::Stalled {
                x: next,
                residual: r_next,
                iters: iter,
            });
        }

        best.update(eval);
        (x_prev, r_prev) = (x, r);
        (x, r) = (next, r_next);
    }

    Err(Error::MaxIters {
        x,
        residual: r,
        iters: config.max_iters(),
    })
}

/// Runs the secant solver without observation.
///
/// # Errors
///
/// Returns an error under the same conditions as [`solve`].
pub fn solve_unobserved<M, P>(
    model: &M,
    problem: &P,
    seed: f64,
    config: &Config,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    P: EquationProblem<1, Input = M::Input, Output = M::Output>,
{
    solve(model, problem, seed, config, ())
}

fn checked<I, O>(eval: Evaluation<I, O, 1>) -> Result<Evaluation<I, O, 1>, Error> {
    if eval.is_finite() {
        Ok(eval)
    } else {
        Err(Error::NonFiniteResidual {
            x: eval.point(),
            residual: eval.residual(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;

    /// Residual `r(x) = f(x)` for a plain function.
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
    fn linear_residual_converges_from_any_seed() {
        let model = Function(|x| 3.0 * x - 12.0);

        for seed in [-1e6, -250.0, -1.0, 0.0, 1e-3, 1.0, 42.0, 1e4, 1e6] {
            let solution = solve_unobserved(&model, &Identity, seed, &Config::default())
                .unwrap_or_else(|err| panic!("seed {seed}: {err}"));

            assert_eq!(solution.status, Status::Converged);
            assert!(solution.iters <= 50, "seed {seed}: {} iters", solution.iters);
            assert_relative_eq!(solution.x, 4.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn finds_the_root_nearest_the_seed() {
        let model = Function(|x| x * x - 2.0);

        let positive = solve_unobserved(&model, &Identity, 1.0, &Config::default()).unwrap();
        assert_relative_eq!(positive.x, 2f64.sqrt(), epsilon = 1e-10);

        let negative = solve_unobserved(&model, &Identity, -1.0, &Config::default()).unwrap();
        assert_relative_eq!(negative.x, -(2f64.sqrt()), epsilon = 1e-10);
    }

    #[test]
    fn flat_residual_is_an_error() {
        let model = Function(|_| 5.0);

        let result = solve_unobserved(&model, &Identity, 1.0, &Config::default());
        assert!(matches!(result, Err(Error::FlatResidual { .. })));
    }

    #[test]
    fn rootless_residual_exhausts_iterations() {
        let model = Function(|x| x * x + 1.0);
        let config = Config::new(20, 1e-12, 1e-12, 1e-12, 1e-4).unwrap();

        let result = solve_unobserved(&model, &Identity, 3.0, &config);
        assert!(matches!(
            result,
            Err(Error::MaxIters { iters: 20, .. }
                | Error::Stalled { .. }
                | Error::FlatResidual { .. }
                | Error::NonFiniteResidual { .. })
        ));
    }

    #[test]
    fn non_finite_residual_is_an_error() {
        let model = Function(|x| x.ln());

        let result = solve_unobserved(&model, &Identity, -2.0, &Config::default());
        let Err(Error::NonFiniteResidual { x, residual }) = result else {
            panic!("expected a non-finite residual error");
        };
        assert_relative_eq!(x, -2.0);
        assert!(residual.is_nan());

        let result = solve_unobserved(&model, &Identity, f64::NAN, &Config::default());
        assert!(matches!(result, Err(Error::NonFiniteSeed { .. })));
    }

    #[test]
    fn observer_sees_iterates_and_can_stop() {
        let model = Function(|x| x * x - 2.0);

        let mut seen = Vec::new();
        let observer = |event: &Event<'_, f64, f64>| {
            seen.push(event.eval.point());
            (event.iter == 2).then_some(Action::StopEarly)
        };

        let solution = solve(&model, &Identity, 1.0, &Config::default(), observer).unwrap();

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert_eq!(solution.iters, 2);
        assert_eq!(seen.len(), 2);
        assert!(solution.residual.abs() < 0.1);
    }

    #[test]
    fn small_steps_alone_are_not_convergence() {
        let model = Function(|x| 1e3 * (x * x - 2.0));
        let config = Config::new(100, 1e-3, 0.0, 1e-9, 1e-4).unwrap();

        let solution = solve_unobserved(&model, &Identity, 1.0, &config).unwrap();
        assert_eq!(solution.status, Status::Converged);
        assert!(solution.residual.abs() <= 1e-9, "r = {}", solution.residual);
        assert_relative_eq!(solution.x, 2f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn a_jump_is_never_reported_as_a_root() {
        let model = Function(|x| 1e-3 * (x - 2.0) + if x > 2.0 { 1e-6 } else { -1e-6 });

        let result = solve_unobserved(&model, &Identity, 1.0, &Config::default());
        assert!(
            matches!(
                result,
                Err(Error::Stalled { .. } | Error::FlatResidual { .. } | Error::MaxIters { .. })
            ),
            "{result:?}"
        );
    }
}
