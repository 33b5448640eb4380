//! Bisection on a bracketed interval.
//!
//! Given endpoints whose residuals differ in sign, bisection halves the
//! interval until its width meets the x tolerances or a midpoint residual
//! meets the residual tolerance. Convergence is guaranteed for a continuous
//! residual.

mod action;
mod bracket;
mod config;
mod error;
mod event;

pub use action::Action;
pub use bracket::{BracketError, Sign};
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;

use chemeng_core::{EquationProblem, Model, Observer};

use crate::equation::{Evaluation, Solution, Status, best::Best, evaluate};

use self::bracket::{Bounds, Bracket};

/// Finds a root of the equation using the bisection method.
///
/// Observers see each midpoint evaluation along with the current bracket and
/// may return [`Action::StopEarly`] to finish with the best evaluation found
/// so far.
///
/// # Errors
///
/// Returns an error if the bracket is invalid, a residual is not finite, or
/// the model or problem returns an error during evaluation.
pub fn solve<M, P, Obs>(
    model: &M,
    problem: &P,
    bracket: [f64; 2],
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    P: EquationProblem<1, Input = M::Input, Output = M::Output>,
    Obs: for<'a> Observer<Event<'a, M::Input, M::Output>, Action>,
{
    let bounds = Bounds::new(bracket)?;

    let left = checked(evaluate(model, problem, [bounds.left])?)?;
    if left.residual().abs() <= config.residual_tol() {
        return Ok(Solution::from_eval(left, Status::Converged, 0));
    }

    let right = checked(evaluate(model, problem, [bounds.right])?)?;
    if right.residual().abs() <= config.residual_tol() {
        return Ok(Solution::from_eval(right, Status::Converged, 0));
    }

    let mut bracket = Bracket::new(bounds, left.residual(), right.residual())?;
    let mut best = Best::of(left, right);

    for iter in 1..=config.max_iters() {
        let mid = bracket.midpoint();
        let eval = checked(evaluate(model, problem, [mid])?)?;
        let residual = eval.residual();

        let event = Event {
            iter,
            bracket: bracket.as_array(),
            eval: &eval,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            best.update(eval);
            return Ok(best.finish(Status::StoppedByObserver, iter));
        }

        bracket.shrink(mid, Sign::of(residual));

        if residual.abs() <= config.residual_tol()
            || bracket.is_x_converged(config.x_abs_tol(), config.x_rel_tol())
        {
            return Ok(Solution::from_eval(eval, Status::Converged, iter));
        }

        best.update(eval);
    }

    Ok(best.finish(Status::MaxIters, config.max_iters()))
}

/// Runs bisection without observation.
///
/// # Errors
///
/// Returns an error if the bracket is invalid, a residual is not finite, or
/// the model or problem returns an error during evaluation.
pub fn solve_unobserved<M, P>(
    model: &M,
    problem: &P,
    bracket: [f64; 2],
    config: &Config,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    P: EquationProblem<1, Input = M::Input, Output = M::Output>,
{
    solve(model, problem, bracket, config, ())
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

    /// Model that squares its input.
    struct SquareModel;

    impl Model for SquareModel {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
            Ok(input * input)
        }
    }

    /// Model that takes the square root of its input.
    struct SqrtModel;

    impl Model for SqrtModel {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
            Ok(input.sqrt())
        }
    }

    /// Drives the model output to a target value.
    struct TargetOutputProblem {
        target: f64,
    }

    impl EquationProblem<1> for TargetOutputProblem {
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
            Ok([output - self.target])
        }
    }

    #[test]
    fn finds_square_root() {
        let problem = TargetOutputProblem { target: 9.0 };

        let solution = solve_unobserved(&SquareModel, &problem, [0.0, 10.0], &Config::default())
            .expect("should solve");

        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.x, 3.0, epsilon = 1e-10);
        assert_relative_eq!(solution.snapshot.output, 9.0, epsilon = 1e-9);
    }

    #[test]
    fn finds_negative_root_with_reversed_bracket() {
        let problem = TargetOutputProblem { target: 36.0 };

        let solution = solve_unobserved(&SquareModel, &problem, [-1.0, -100.0], &Config::default())
            .expect("should solve with reversed bracket");

        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.x, -6.0, epsilon = 1e-10);
    }

    #[test]
    fn exact_endpoint_root_returns_immediately() {
        let problem = TargetOutputProblem { target: 4.0 };

        let solution = solve_unobserved(&SquareModel, &problem, [2.0, 10.0], &Config::default())
            .expect("should solve");

        assert_eq!(solution.iters, 0);
        assert_relative_eq!(solution.x, 2.0);
    }

    #[test]
    fn observer_can_stop_iteration() {
        let problem = TargetOutputProblem { target: 9.0 };

        let mut brackets = Vec::new();
        let observer = |event: &Event<'_, f64, f64>| {
            brackets.push(event.bracket);
            (event.iter >= 3).then_some(Action::StopEarly)
        };

        let solution = solve(&SquareModel, &problem, [0.0, 10.0], &Config::default(), observer)
            .expect("should stop cleanly");

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert_eq!(solution.iters, 3);
        assert_eq!(brackets, vec![[0.0, 10.0], [0.0, 5.0], [2.5, 5.0]]);
        // Midpoints were 5.0, 2.5, 3.75; 2.5 has the smallest residual.
        assert_relative_eq!(solution.x, 2.5);
    }

    #[test]
    fn errors_on_invalid_bracket() {
        let problem = TargetOutputProblem { target: 9.0 };
        let config = Config::default();

        let result = solve_unobserved(&SquareModel, &problem, [5.0, 5.0], &config);
        assert!(matches!(
            result,
            Err(Error::InvalidBracket(BracketError::ZeroWidth))
        ));

        let result = solve_unobserved(&SquareModel, &problem, [f64::NAN, 10.0], &config);
        assert!(matches!(
            result,
            Err(Error::InvalidBracket(BracketError::NonFinite))
        ));

        let result = solve_unobserved(&SquareModel, &problem, [5.0, 10.0], &config);
        assert!(matches!(
            result,
            Err(Error::InvalidBracket(BracketError::NoSignChange { .. }))
        ));
    }

    #[test]
    fn errors_on_non_finite_residual() {
        let problem = TargetOutputProblem { target: 1.0 };

        let result = solve_unobserved(&SqrtModel, &problem, [-4.0, 4.0], &Config::default());

        let Err(Error::NonFiniteResidual { x, residual }) = result else {
            panic!("expected a non-finite residual error");
        };
        assert_relative_eq!(x, -4.0);
        assert!(residual.is_nan());
    }

    #[test]
    fn zero_iters_returns_best_endpoint() {
        let problem = TargetOutputProblem { target: 9.0 };
        let config = Config::new(0, 1e-12, 1e-12, 1e-12).expect("valid config");

        let solution = solve_unobserved(&SquareModel, &problem, [2.0, 10.0], &config)
            .expect("should return best endpoint");

        assert_eq!(solution.status, Status::MaxIters);
        assert_eq!(solution.iters, 0);
        // x=2 gives |4-9| = 5, x=10 gives |100-9| = 91.
        assert_relative_eq!(solution.x, 2.0);
    }
}
