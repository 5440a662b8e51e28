use serde::Serialize;

/// Band identity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    MediumHigh,
    High,
    VeryHigh,
    Unknown,
}

impl RiskLevel {
    pub fn name(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::MediumHigh => "Medium High",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
            RiskLevel::Unknown => "Unknown",
        }
    }
}

/// One row of the static band table. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandDef {
    pub level: RiskLevel,
    pub min: f64,
    pub max: f64,
    pub color: &'static str,
}

impl BandDef {
    pub fn contains(&self, score: f64) -> bool {
        score >= self.min && score <= self.max
    }
}

/// Band table, tested in order. Max values sit just under the next band's
/// min so integer boundaries are unambiguous.
pub const BANDS: &[BandDef] = &[
    BandDef { level: RiskLevel::Low, min: 0.0, max: 19.99, color: "#22c55e" },
    BandDef { level: RiskLevel::Medium, min: 20.0, max: 39.99, color: "#eab308" },
    BandDef { level: RiskLevel::MediumHigh, min: 40.0, max: 59.99, color: "#f97316" },
    BandDef { level: RiskLevel::High, min: 60.0, max: 79.99, color: "#ef4444" },
    BandDef { level: RiskLevel::VeryHigh, min: 80.0, max: 100.0, color: "#991b1b" },
];

/// Neutral color for scores outside every band
pub const UNKNOWN_COLOR: &str = "#9ca3af";

/// Result of classifying a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandInfo {
    pub level: RiskLevel,
    pub name: &'static str,
    pub color: &'static str,
}

impl BandInfo {
    pub const UNKNOWN: BandInfo = BandInfo {
        level: RiskLevel::Unknown,
        name: "Unknown",
        color: UNKNOWN_COLOR,
    };

    /// Split the `#rrggbb` color into components for terminal rendering.
    pub fn rgb(&self) -> (u8, u8, u8) {
        hex_to_rgb(self.color).unwrap_or((0x9c, 0xa3, 0xaf))
    }
}

impl From<&BandDef> for BandInfo {
    fn from(def: &BandDef) -> Self {
        BandInfo {
            level: def.level,
            name: def.level.name(),
            color: def.color,
        }
    }
}

fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}
