use thiserror::Error;

/// Configuration for the RK4 integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    steps_per_interval: usize,
}

/// Errors that can occur when validating an RK4 config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("steps_per_interval must be at least 1")]
    ZeroSteps,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steps_per_interval: 100,
        }
    }
}

impl Config {
    /// Creates a config that splits each sample interval into equal substeps.
    ///
    /// # Errors
    ///
    /// Returns an error if `steps_per_interval` is zero.
    pub fn new(steps_per_interval: usize) -> Result<Self, ConfigError> {
        if steps_per_interval == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        Ok(Self { steps_per_interval })
    }

    /// Returns the number of substeps between consecutive sample times.
    #[must_use]
    pub fn steps_per_interval(&self) -> usize {
        self.steps_per_interval
    }
}
