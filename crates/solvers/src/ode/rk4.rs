//! Classical fourth-order Runge–Kutta integration.
//!
//! Each interval between consecutive sample times is split into
//! `steps_per_interval` equal substeps, and each substep advances the state
//! with
//!
//! ```text
//! k1 = f(t,         y)
//! k2 = f(t + h/2,   y + h/2 · k1)
//! k3 = f(t + h/2,   y + h/2 · k2)
//! k4 = f(t + h,     y + h · k3)
//! y' = y + h/6 · (k1 + 2·k2 + 2·k3 + k4)
//! ```
//!
//! Sample times may run backward, in which case `h` is negative.
//!
//! # Example
//!
//! ```
//! use std::convert::Infallible;
//!
//! use chemeng_core::OdeProblem;
//! use chemeng_solvers::ode::rk4;
//!
//! struct Decay;
//!
//! impl OdeProblem<1> for Decay {
//!     type Error = Infallible;
//!
//!     fn rate(&self, _t: f64, y: &[f64; 1]) -> Result<[f64; 1], Infallible> {
//!         Ok([-y[0]])
//!     }
//! }
//!
//! let solution = rk4::integrate_unobserved(&Decay, [1.0], &[0.0, 1.0], &rk4::Config::default())?;
//! let (_, [y]) = solution.last().unwrap();
//! assert!((y - (-1f64).exp()).abs() < 1e-9);
//! # Ok::<(), rk4::Error>(())
//! ```

mod action;
mod config;
mod error;
mod event;
mod solution;

pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::{Error, TimesError};
pub use event::Event;
pub use solution::{Solution, Status};

use chemeng_core::{Observer, OdeProblem};

/// Integrates `problem` from `initial` at `times[0]` through every later
/// sample time.
///
/// The observer receives an [`Event`] for the initial state and after every
/// substep, and may return [`Action::StopEarly`] to end integration.
///
/// # Errors
///
/// Returns an error if the sample times are empty, non-finite, or not strictly
/// monotonic; if the initial state is not finite; if the state becomes
/// non-finite; or if the problem fails to compute a rate.
pub fn integrate<P, Obs, const N: usize>(
    problem: &P,
    initial: [f64; N],
    times: &[f64],
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<N>, Error>
where
    P: OdeProblem<N>,
    Obs: Observer<Event<N>, Action>,
{
    validate_times(times)?;
    if !is_finite(&initial) {
        return Err(Error::NonFiniteInitialState);
    }

    let t0 = times[0];
    let mut solution = Solution {
        status: Status::Complete,
        times: vec![t0],
        states: vec![initial],
        steps: 0,
    };

    let event = Event {
        step: 0,
        t: t0,
        state: initial,
    };
    if let Some(Action::StopEarly) = observer.observe(&event) {
        solution.status = Status::StoppedByObserver;
        return Ok(solution);
    }

    let n = config.steps_per_interval();
    let mut state = initial;

    for window in times.windows(2) {
        let [start, end] = [window[0], window[1]];
        let h = (end - start) / n as f64;

        for i in 0..n {
            let t = start + i as f64 * h;
            state = step(problem, t, &state, h)?;

            let t_next = if i + 1 == n {
                end
            } else {
                start + (i + 1) as f64 * h
            };
            if !is_finite(&state) {
                return Err(Error::NonFiniteState { t: t_next });
            }
            solution.steps += 1;

            let event = Event {
                step: solution.steps,
                t: t_next,
                state,
            };
            if let Some(Action::StopEarly) = observer.observe(&event) {
                solution.times.push(t_next);
                solution.states.push(state);
                solution.status = Status::StoppedByObserver;
                return Ok(solution);
            }
        }

        solution.times.push(end);
        solution.states.push(state);
    }

    Ok(solution)
}

/// Integrates without observation.
///
/// # Errors
///
/// Returns an error under the same conditions as [`integrate`].
pub fn integrate_unobserved<P, const N: usize>(
    problem: &P,
    initial: [f64; N],
    times: &[f64],
    config: &Config,
) -> Result<Solution<N>, Error>
where
    P: OdeProblem<N>,
{
    integrate(problem, initial, times, config, ())
}

/// Advances the state by one RK4 substep of size `h`.
fn step<P, const N: usize>(
    problem: &P,
    t: f64,
    y: &[f64; N],
    h: f64,
) -> Result<[f64; N], Error>
where
    P: OdeProblem<N>,
{
    let rate = |t: f64, y: &[f64; N]| problem.rate(t, y).map_err(Error::problem);

    let k1 = rate(t, y)?;
    let k2 = rate(t + 0.5 * h, &offset(y, &k1, 0.5 * h))?;
    let k3 = rate(t + 0.5 * h, &offset(y, &k2, 0.5 * h))?;
    let k4 = rate(t + h, &offset(y, &k3, h))?;

    Ok(std::array::from_fn(|i| {
        y[i] + h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i])
    }))
}

/// Returns `y + scale · k`.
fn offset<const N: usize>(y: &[f64; N], k: &[f64; N], scale: f64) -> [f64; N] {
    std::array::from_fn(|i| y[i] + scale * k[i])
}

fn is_finite<const N: usize>(state: &[f64; N]) -> bool {
    state.iter().all(|v| v.is_finite())
}

fn validate_times(times: &[f64]) -> Result<(), TimesError> {
    if times.is_empty() {
        return Err(TimesError::Empty);
    }
    if !times.iter().all(|t| t.is_finite()) {
        return Err(TimesError::NonFinite);
    }

    let increasing = times.windows(2).all(|w| w[0] < w[1]);
    let decreasing = times.windows(2).all(|w| w[0] > w[1]);
    if increasing || decreasing {
        Ok(())
    } else {
        Err(TimesError::NotMonotonic)
    }
}
