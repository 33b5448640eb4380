use crate::{
    formulate::{Balance, Bindings, FormulationError},
    relation::{Relation, Variable},
};

use super::{STREAMLINE, gravity};

/// Bernoulli's equation for steady, incompressible, inviscid flow along a
/// streamline, as a balance of energy densities in pascals:
///
/// ```text
/// ½ρ₁v₁² + ρ₁gh₁ + P₁ = ½ρ₂v₂² + ρ₂gh₂ + P₂
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Bernoulli;

impl Relation for Bernoulli {
    fn name(&self) -> &'static str {
        "bernoulli"
    }

    fn description(&self) -> &'static str {
        "energy balance along a streamline, in pascals"
    }

    fn variables(&self) -> &'static [Variable] {
        STREAMLINE
    }

    fn balance(&self, b: &Bindings<'_>) -> Result<Balance, FormulationError> {
        let g = gravity();
        let side = |v: f64, h: f64, p: f64, rho: f64| 0.5 * rho * v * v + rho * g * h + p;

        Ok(Balance::new(
            side(b.initial("v")?, b.initial("h")?, b.initial("P")?, b.initial("rho")?),
            side(b.final_("v")?, b.final_("h")?, b.final_("P")?, b.final_("rho")?),
        ))
    }
}
