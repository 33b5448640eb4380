use thiserror::Error;

/// Configuration for the secant solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_iters: usize,
    x_abs_tol: f64,
    x_rel_tol: f64,
    residual_tol: f64,
    perturbation: f64,
}

/// Errors that can occur when validating a secant solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("x_abs_tol must be finite and non-negative")]
    XAbs,

    #[error("x_rel_tol must be finite and non-negative")]
    XRel,

    #[error("residual_tol must be finite and non-negative")]
    Residual,

    #[error("perturbation must be finite and positive")]
    Perturbation,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 100,
            x_abs_tol: 1e-12,
            x_rel_tol: 1e-12,
            residual_tol: 1e-12,
            perturbation: 1e-4,
        }
    }
}

impl Config {
    /// Creates a new config with validated tolerances.
    ///
    /// The second secant point is placed at
    /// `seed + perturbation · max(|seed|, 1)`.
    ///
    /// # Errors
    ///
    /// Returns an error if any tolerance is negative or non-finite, or if the
    /// perturbation is not strictly positive.
    pub fn new(
        max_iters: usize,
        x_abs_tol: f64,
        x_rel_tol: f64,
        residual_tol: f64,
        perturbation: f64,
    ) -> Result<Self, ConfigError> {
        if !x_abs_tol.is_finite() || x_abs_tol < 0.0 {
            return Err(ConfigError::XAbs);
        }
        if !x_rel_tol.is_finite() || x_rel_tol < 0.0 {
            return Err(ConfigError::XRel);
        }
        if !residual_tol.is_finite() || residual_tol < 0.0 {
            return Err(ConfigError::Residual);
        }
        if !perturbation.is_finite() || perturbation <= 0.0 {
            return Err(ConfigError::Perturbation);
        }

        Ok(Self {
            max_iters,
            x_abs_tol,
            x_rel_tol,
            residual_tol,
            perturbation,
        })
    }

    /// Returns the maximum number of secant iterations.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the absolute tolerance on the secant step.
    #[must_use]
    pub fn x_abs_tol(&self) -> f64 {
        self.x_abs_tol
    }

    /// Returns the relative tolerance on the secant step.
    #[must_use]
    pub fn x_rel_tol(&self) -> f64 {
        self.x_rel_tol
    }

    /// Returns the residual magnitude treated as a root.
    #[must_use]
    pub fn residual_tol(&self) -> f64 {
        self.residual_tol
    }

    /// Returns the relative offset of the second starting point.
    #[must_use]
    pub fn perturbation(&self) -> f64 {
        self.perturbation
    }

    /// Returns true if a step from `from` to `to` satisfies the x tolerances.
    pub(super) fn is_step_converged(&self, from: f64, to: f64) -> bool {
        (to - from).abs() <= self.x_abs_tol + self.x_rel_tol * to.abs()
    }
}
