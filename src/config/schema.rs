use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::portfolio::DEFAULT_VOLUME;
use crate::risk::WeightVector;

/// User configuration.
///
/// Example YAML:
/// ```yaml
/// catalogue: /data/countries.csv
/// weights: [20, 20, 5, 10, 10]
/// default_volume: 10
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the country catalogue CSV
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalogue: Option<PathBuf>,

    /// Indicator weights in column order (default: 20, 20, 5, 10, 10)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,

    /// Volume given to newly added portfolio countries (default: 10)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_volume: Option<f64>,
}

impl Config {
    /// Configured weights, or the canonical default.
    ///
    /// Callers run `validate_config` first; a wrong-length vector is an error here.
    pub fn effective_weights(&self) -> anyhow::Result<WeightVector> {
        match &self.weights {
            Some(values) => WeightVector::try_from(values.as_slice()),
            None => Ok(WeightVector::default()),
        }
    }

    pub fn effective_default_volume(&self) -> f64 {
        self.default_volume.unwrap_or(DEFAULT_VOLUME)
    }
}
