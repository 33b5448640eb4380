pub mod equation;
pub mod ode;

pub use equation::EquationProblem;
pub use ode::OdeProblem;
