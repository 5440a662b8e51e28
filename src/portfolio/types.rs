use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Volume assumed for a selected country with no explicit volume
pub const DEFAULT_VOLUME: f64 = 10.0;

/// Countries chosen for baseline aggregation, with optional volumes.
///
/// Codes are distinct and keep insertion order for display. A volume entry
/// only exists for a selected code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSelection {
    #[serde(default)]
    countries: Vec<String>,
    #[serde(default)]
    volumes: HashMap<String, f64>,
}

impl PortfolioSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a country. Returns false if it was already selected.
    pub fn add(&mut self, iso_code: impl Into<String>) -> bool {
        let iso_code = iso_code.into();
        if self.contains(&iso_code) {
            return false;
        }
        self.countries.push(iso_code);
        true
    }

    /// Deselect a country and drop its volume. Returns false if not selected.
    pub fn remove(&mut self, iso_code: &str) -> bool {
        let before = self.countries.len();
        self.countries.retain(|c| c != iso_code);
        self.volumes.remove(iso_code);
        self.countries.len() != before
    }

    /// Set the volume for a selected country.
    ///
    /// Rejected (returns false, nothing changes) when the code is not
    /// selected or the volume is negative or not finite.
    pub fn set_volume(&mut self, iso_code: &str, volume: f64) -> bool {
        if !self.contains(iso_code) || !volume.is_finite() || volume < 0.0 {
            return false;
        }
        self.volumes.insert(iso_code.to_string(), volume);
        true
    }

    /// Volume for a code, [`DEFAULT_VOLUME`] when unset.
    pub fn volume(&self, iso_code: &str) -> f64 {
        self.explicit_volume(iso_code).unwrap_or(DEFAULT_VOLUME)
    }

    pub fn explicit_volume(&self, iso_code: &str) -> Option<f64> {
        self.volumes.get(iso_code).copied()
    }

    pub fn contains(&self, iso_code: &str) -> bool {
        self.countries.iter().any(|c| c == iso_code)
    }

    /// Selected codes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.countries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn clear(&mut self) {
        self.countries.clear();
        self.volumes.clear();
    }

    /// Rebuild through the mutators, dropping repeated codes, orphan volumes
    /// and invalid volumes. Used on data read from disk.
    pub fn normalized(self) -> Self {
        let mut clean = Self::new();
        for iso_code in &self.countries {
            clean.add(iso_code.as_str());
        }
        for (iso_code, volume) in &self.volumes {
            clean.set_volume(iso_code, *volume);
        }
        clean
    }
}

/// On-disk form of the selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioState {
    pub version: u32,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub selection: PortfolioSelection,
}

impl Default for PortfolioState {
    fn default() -> Self {
        Self::new()
    }
}

impl PortfolioState {
    /// Create a new empty state with version 1
    pub fn new() -> Self {
        Self {
            version: 1,
            updated_at: None,
            selection: PortfolioSelection::new(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_selection_is_empty() {
        let selection = PortfolioSelection::new();
        assert!(selection.is_empty());
        assert_eq!(selection.iter().count(), 0);
    }

    #[test]
    fn test_add_keeps_insertion_order_and_dedupes() {
        let mut selection = PortfolioSelection::new();
        assert!(selection.add("DEU"));
        assert!(selection.add("BRA"));
        assert!(!selection.add("DEU"));
        assert!(selection.add("IND"));

        let codes: Vec<&str> = selection.iter().collect();
        assert_eq!(codes, vec!["DEU", "BRA", "IND"]);
    }

    #[test]
    fn test_volume_defaults_to_ten() {
        let mut selection = PortfolioSelection::new();
        selection.add("DEU");
        assert_eq!(selection.volume("DEU"), 10.0);
        assert_eq!(selection.explicit_volume("DEU"), None);
    }

    #[test]
    fn test_set_volume() {
        let mut selection = PortfolioSelection::new();
        selection.add("DEU");
        assert!(selection.set_volume("DEU", 42.5));
        assert_eq!(selection.volume("DEU"), 42.5);
        assert!(selection.set_volume("DEU", 0.0));
        assert_eq!(selection.volume("DEU"), 0.0);
    }

    #[test]
    fn test_set_volume_rejects_invalid() {
        let mut selection = PortfolioSelection::new();
        selection.add("DEU");
        assert!(!selection.set_volume("FRA", 5.0));
        assert!(!selection.set_volume("DEU", -1.0));
        assert!(!selection.set_volume("DEU", f64::NAN));
        assert!(!selection.set_volume("DEU", f64::INFINITY));
        assert_eq!(selection.explicit_volume("DEU"), None);
        assert_eq!(selection.explicit_volume("FRA"), None);
    }

    #[test]
    fn test_remove_drops_volume() {
        let mut selection = PortfolioSelection::new();
        selection.add("DEU");
        selection.set_volume("DEU", 25.0);
        assert!(selection.remove("DEU"));
        assert!(!selection.contains("DEU"));
        assert_eq!(selection.explicit_volume("DEU"), None);

        // Re-adding starts from the default volume again
        selection.add("DEU");
        assert_eq!(selection.volume("DEU"), 10.0);
    }

    #[test]
    fn test_remove_unselected() {
        let mut selection = PortfolioSelection::new();
        assert!(!selection.remove("DEU"));
    }

    #[test]
    fn test_clear() {
        let mut selection = PortfolioSelection::new();
        selection.add("DEU");
        selection.set_volume("DEU", 3.0);
        selection.clear();
        assert!(selection.is_empty());
        assert_eq!(selection.explicit_volume("DEU"), None);
    }

    #[test]
    fn test_normalized_drops_bad_entries() {
        let json = r#"{
            "countries": ["DEU", "BRA", "DEU"],
            "volumes": { "DEU": 5.0, "BRA": -3.0, "FRA": 7.0 }
        }"#;
        let selection: PortfolioSelection = serde_json::from_str(json).unwrap();
        let selection = selection.normalized();

        assert_eq!(selection.iter().collect::<Vec<_>>(), vec!["DEU", "BRA"]);
        assert_eq!(selection.volume("DEU"), 5.0);
        assert_eq!(selection.explicit_volume("BRA"), None);
        assert_eq!(selection.explicit_volume("FRA"), None);
    }

    #[test]
    fn test_state_defaults() {
        let state = PortfolioState::new();
        assert_eq!(state.version, 1);
        assert!(state.updated_at.is_none());
        assert!(state.selection.is_empty());
    }
}
