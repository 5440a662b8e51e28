pub mod bands;
pub mod engine;
pub mod validation;
pub mod weights;

pub use bands::{BandDef, BandInfo, RiskLevel, BANDS, UNKNOWN_COLOR};
pub use engine::{IndicatorContribution, RiskEngine, ScoreBreakdown};
pub use validation::{validate_weights, weight_errors};
pub use weights::WeightVector;
