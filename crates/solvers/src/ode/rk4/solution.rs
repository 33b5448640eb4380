/// Indicates how the integrator terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Reached the last sample time.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of an RK4 integration.
///
/// `times[i]` pairs with `states[i]`. When integration completes, `times`
/// equals the requested sample times; when stopped early, it holds the samples
/// reached so far plus the last substep taken.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<const N: usize> {
    /// How the integrator terminated.
    pub status: Status,

    /// Sample times reached.
    pub times: Vec<f64>,

    /// State at each sample time.
    pub states: Vec<[f64; N]>,

    /// Total number of substeps taken.
    pub steps: usize,
}

impl<const N: usize> Solution<N> {
    /// Returns the last time and state reached.
    #[must_use]
    pub fn last(&self) -> Option<(f64, [f64; N])> {
        Some((*self.times.last()?, *self.states.last()?))
    }
}
