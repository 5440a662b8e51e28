use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::catalogue::Indicator;

/// Importance weights, positionally aligned with [`Indicator::ALL`].
///
/// No sum constraint: weights may be zero and may total more or less than 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector(pub [f64; 5]);

impl WeightVector {
    pub const DEFAULT: WeightVector = WeightVector([20.0, 20.0, 5.0, 10.0, 10.0]);

    pub fn weight(&self, indicator: Indicator) -> f64 {
        self.0[indicator.position()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Parse a comma-separated list like "20,20,5,10,10".
    ///
    /// Only checks shape and numeric syntax; range checks are left to
    /// [`crate::risk::weight_errors`].
    pub fn parse(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_from(values.as_slice())
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<&[f64]> for WeightVector {
    type Error = anyhow::Error;

    fn try_from(values: &[f64]) -> Result<Self> {
        match <[f64; 5]>::try_from(values) {
            Ok(arr) => Ok(WeightVector(arr)),
            Err(_) => bail!("expected 5 weights, got {}", values.len()),
        }
    }
}
