use crate::{
    formulate::{Balance, Bindings, FormulationError},
    relation::{Relation, Variable},
};

use super::{STREAMLINE, gravity};

/// Bernoulli's equation written as total head in meters:
///
/// ```text
/// v₁²/2g + h₁ + P₁/(ρ₁g) = v₂²/2g + h₂ + P₂/(ρ₂g)
/// ```
///
/// Each side is divided by its own `ρg`, so this agrees with
/// [`Bernoulli`](super::Bernoulli) only when the density is the same at both
/// points. Pressure head divides by density, so a zero density has no finite
/// residual.
#[derive(Debug, Clone, Copy, Default)]
pub struct BernoulliHead;

impl Relation for BernoulliHead {
    fn name(&self) -> &'static str {
        "bernoulli_head"
    }

    fn description(&self) -> &'static str {
        "energy balance along a streamline, as head in meters"
    }

    fn variables(&self) -> &'static [Variable] {
        STREAMLINE
    }

    fn balance(&self, b: &Bindings<'_>) -> Result<Balance, FormulationError> {
        let g = gravity();
        let head = |v: f64, h: f64, p: f64, rho: f64| v * v / (2.0 * g) + h + p / (rho * g);

        Ok(Balance::new(
            head(b.initial("v")?, b.initial("h")?, b.initial("P")?, b.initial("rho")?),
            head(b.final_("v")?, b.final_("h")?, b.final_("P")?, b.final_("rho")?),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{context::Context, formulate::Formulation, relations::Bernoulli};

    #[test]
    fn head_is_energy_density_over_rho_g() {
        let context = Context::new(
            [
                ("v", "3 m/s"),
                ("h", "2 m"),
                ("P", "200 kPa"),
                ("rho", "1000 kg/m^3"),
            ],
            [
                ("v", "unknown"),
                ("h", "0 m"),
                ("P", "150 kPa"),
                ("rho", "1000 kg/m^3"),
            ],
            "",
        )
        .unwrap();

        let energy = Formulation::new(&Bernoulli, &context);
        let head = Formulation::new(&BernoulliHead, &context);
        let rho_g = 1000.0 * gravity();

        for x in [-4.0, 0.0, 2.5, 12.0] {
            assert_relative_eq!(
                head.residual(x).unwrap(),
                energy.residual(x).unwrap() / rho_g,
                epsilon = 1e-10
            );
        }
    }
}
