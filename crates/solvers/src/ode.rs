//! Integrators for ODE problems.
//!
//! An [`OdeProblem`] supplies `dy/dt = f(t, y)` for an `N`-component state.
//! Integrators here advance the state through a sequence of sample times and
//! return the state at each one.
//!
//! # Integrators
//!
//! - [`rk4`]: classical fourth-order Runge–Kutta with fixed substeps
//!
//! [`OdeProblem`]: chemeng_core::OdeProblem

pub mod rk4;
