//! Problem files: a relation and its context in TOML.
//!
//! ```toml
//! relation = "bernoulli"
//! output_unit = "m/s"
//! precision = 4            # or "inputs", or "full"
//!
//! [initial]
//! v = "0 ft/s"
//! h = "10 yard"
//!
//! [final]
//! v = "unknown"
//! h = "3.00123 m"
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use chemeng::{Context, Precision, SolveConfig};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Problem {
    pub relation: String,
    #[serde(default)]
    pub output_unit: String,
    #[serde(default)]
    pub precision: Option<PrecisionSetting>,
    #[serde(default)]
    pub seed: Option<f64>,
    #[serde(default)]
    pub initial: BTreeMap<String, String>,
    #[serde(default, rename = "final")]
    pub final_: BTreeMap<String, String>,
}

/// `precision` as written in a problem file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PrecisionSetting {
    Digits(u32),
    Named(NamedPrecision),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedPrecision {
    Inputs,
    Full,
}

impl From<PrecisionSetting> for Precision {
    fn from(setting: PrecisionSetting) -> Self {
        match setting {
            PrecisionSetting::Digits(n) => Precision::Significant(n),
            PrecisionSetting::Named(NamedPrecision::Inputs) => Precision::FromInputs,
            PrecisionSetting::Named(NamedPrecision::Full) => Precision::Full,
        }
    }
}

impl Problem {
    /// Parses a problem file.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for a problem.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Builds the context the problem describes.
    ///
    /// # Errors
    ///
    /// Returns an error if a value or the output unit is invalid, or the
    /// problem does not have exactly one unknown.
    pub fn context(&self) -> Result<Context, chemeng::ConfigurationError> {
        Context::new(&self.initial, &self.final_, &self.output_unit)
    }

    /// Solver settings, with the problem's precision and seed applied.
    #[must_use]
    pub fn config(&self) -> SolveConfig {
        SolveConfig {
            precision: self.precision.map(Precision::from).unwrap_or_default(),
            seed: self.seed,
            ..SolveConfig::default()
        }
    }
}
