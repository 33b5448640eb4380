/// Defines an ODE (ordinary differential equation) problem to be integrated.
///
/// An ODE problem supplies the rate of change `dy/dt = f(t, y)` of an
/// `N`-component state. Integrators step the state forward in the independent
/// variable, which is usually time but can be any scalar coordinate.
///
/// Rates must be pure functions of `t` and `state`; integrators evaluate them
/// several times per step at intermediate points.
pub trait OdeProblem<const N: usize> {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Computes the rate of change of the state at `t`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the rate cannot be computed at this point.
    fn rate(&self, t: f64, state: &[f64; N]) -> Result<[f64; N], Self::Error>;
}
