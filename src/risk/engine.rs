use std::collections::HashMap;

use super::bands::{BandInfo, BANDS};
use super::validation;
use super::weights::WeightVector;
use crate::catalogue::{Catalogue, CountryRecord, Indicator};
use crate::portfolio::PortfolioSelection;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorContribution {
    pub indicator: Indicator,
    pub value: f64,
    pub weight: f64,
    /// False when the value is zero (treated as missing data)
    pub included: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub score: f64,
    pub total_weight: f64,
    pub contributions: Vec<IndicatorContribution>,
}

/// Scoring, banding and portfolio aggregation.
///
/// Holds no state; every operation is a pure function of its arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskEngine;

impl RiskEngine {
    pub fn new() -> Self {
        Self
    }

    /// Weighted mean over the indicators that are present (> 0).
    ///
    /// Zero-valued indicators drop out of both numerator and denominator, so
    /// a country with one reported indicator scores exactly that value.
    /// Returns 0 when no weight applies.
    pub fn weighted_score(&self, record: &CountryRecord, weights: &WeightVector) -> f64 {
        let mut sum = 0.0_f64;
        let mut total_weight = 0.0_f64;

        for (&value, &weight) in record.indicators().iter().zip(weights.0.iter()) {
            if value > 0.0 {
                sum += value * weight;
                total_weight += weight;
            }
        }

        if total_weight > 0.0 {
            sum / total_weight
        } else {
            0.0
        }
    }

    /// Same score as [`weighted_score`](Self::weighted_score), with the
    /// per-indicator terms that produced it.
    pub fn score_breakdown(&self, record: &CountryRecord, weights: &WeightVector) -> ScoreBreakdown {
        let contributions: Vec<IndicatorContribution> = Indicator::ALL
            .iter()
            .map(|&indicator| {
                let value = record.indicator(indicator);
                IndicatorContribution {
                    indicator,
                    value,
                    weight: weights.weight(indicator),
                    included: value > 0.0,
                }
            })
            .collect();

        let total_weight: f64 = contributions
            .iter()
            .filter(|c| c.included)
            .map(|c| c.weight)
            .sum();

        ScoreBreakdown {
            score: self.weighted_score(record, weights),
            total_weight,
            contributions,
        }
    }

    /// First band whose closed interval contains the score, else Unknown.
    pub fn band(&self, score: f64) -> BandInfo {
        BANDS
            .iter()
            .find(|def| def.contains(score))
            .map(BandInfo::from)
            .unwrap_or(BandInfo::UNKNOWN)
    }

    pub fn color(&self, score: f64) -> &'static str {
        self.band(score).color
    }

    /// Score every country in the catalogue, keyed by ISO code.
    pub fn score_catalogue(
        &self,
        catalogue: &Catalogue,
        weights: &WeightVector,
    ) -> HashMap<String, f64> {
        catalogue
            .countries
            .iter()
            .map(|c| (c.iso_code.clone(), self.weighted_score(c, weights)))
            .collect()
    }

    /// Volume-weighted mean score across the selection.
    ///
    /// Unset volumes count as the default volume; codes with no score count
    /// as 0. An empty selection, or one with zero total volume, yields 0.
    pub fn baseline_risk(
        &self,
        selection: &PortfolioSelection,
        scores: &HashMap<String, f64>,
    ) -> f64 {
        let mut weighted = 0.0;
        let mut total_volume = 0.0;

        for iso_code in selection.iter() {
            let volume = selection.volume(iso_code);
            let score = scores.get(iso_code).copied().unwrap_or(0.0);
            weighted += volume * score;
            total_volume += volume;
        }

        if total_volume > 0.0 {
            weighted / total_volume
        } else {
            0.0
        }
    }

    pub fn validate_weights(&self, weights: &[f64]) -> bool {
        validation::validate_weights(weights)
    }
}
