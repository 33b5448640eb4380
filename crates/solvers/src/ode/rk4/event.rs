/// Event emitted by the RK4 integrator after each substep.
///
/// Step 0 is the initial state before any integration.
#[derive(Debug, Clone, Copy)]
pub struct Event<const N: usize> {
    /// Substep counter across all intervals (0 for the initial state).
    pub step: usize,
    /// Independent variable after this substep.
    pub t: f64,
    /// State after this substep.
    pub state: [f64; N],
}
