use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One of the five raw inputs to risk scoring, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    ItucRightsRating,
    CorruptionIndex,
    MigrantWorkerPrevalence,
    WjpIndex,
    WalkfreeSlaveryIndex,
}

impl Indicator {
    /// All indicators, positionally aligned with weight vectors.
    pub const ALL: [Indicator; 5] = [
        Indicator::ItucRightsRating,
        Indicator::CorruptionIndex,
        Indicator::MigrantWorkerPrevalence,
        Indicator::WjpIndex,
        Indicator::WalkfreeSlaveryIndex,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Indicator::ItucRightsRating => "ITUC Rights Rating",
            Indicator::CorruptionIndex => "Corruption Index",
            Indicator::MigrantWorkerPrevalence => "Migrant Worker Prevalence",
            Indicator::WjpIndex => "WJP Rule of Law Index",
            Indicator::WalkfreeSlaveryIndex => "Walk Free Slavery Index",
        }
    }

    pub fn position(&self) -> usize {
        match self {
            Indicator::ItucRightsRating => 0,
            Indicator::CorruptionIndex => 1,
            Indicator::MigrantWorkerPrevalence => 2,
            Indicator::WjpIndex => 3,
            Indicator::WalkfreeSlaveryIndex => 4,
        }
    }
}

/// One row of country reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    pub name: String,
    pub iso_code: String,
    pub ituc_rights_rating: f64,
    pub corruption_index: f64,
    pub migrant_worker_prevalence: f64,
    pub wjp_index: f64,
    pub walkfree_slavery_index: f64,
    /// Precomputed reference score, carried through untouched
    pub base_risk_score: f64,
}

impl CountryRecord {
    pub fn indicator(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::ItucRightsRating => self.ituc_rights_rating,
            Indicator::CorruptionIndex => self.corruption_index,
            Indicator::MigrantWorkerPrevalence => self.migrant_worker_prevalence,
            Indicator::WjpIndex => self.wjp_index,
            Indicator::WalkfreeSlaveryIndex => self.walkfree_slavery_index,
        }
    }

    /// Indicator values in column order
    pub fn indicators(&self) -> [f64; 5] {
        Indicator::ALL.map(|i| self.indicator(i))
    }
}

/// A later row replaced an earlier row with the same ISO code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateNotice {
    pub iso_code: String,
    pub replaced_name: String,
    pub with_name: String,
}

/// Validated set of country records keyed by ISO code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogue {
    pub countries: Vec<CountryRecord>,
    pub duplicates: Vec<DuplicateNotice>,
}

impl Catalogue {
    /// Build a catalogue from rows, last write wins on duplicate codes.
    ///
    /// A replaced record keeps the position of the first row with its code.
    pub fn from_rows(rows: impl IntoIterator<Item = CountryRecord>) -> Self {
        let mut countries: Vec<CountryRecord> = Vec::new();
        let mut duplicates = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for record in rows {
            match index.get(&record.iso_code) {
                Some(&slot) => {
                    duplicates.push(DuplicateNotice {
                        iso_code: record.iso_code.clone(),
                        replaced_name: countries[slot].name.clone(),
                        with_name: record.name.clone(),
                    });
                    countries[slot] = record;
                }
                None => {
                    index.insert(record.iso_code.clone(), countries.len());
                    countries.push(record);
                }
            }
        }

        Self {
            countries,
            duplicates,
        }
    }

    pub fn get(&self, iso_code: &str) -> Option<&CountryRecord> {
        self.countries.iter().find(|c| c.iso_code == iso_code)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(iso: &str, name: &str, indicators: [f64; 5]) -> CountryRecord {
        CountryRecord {
            name: name.to_string(),
            iso_code: iso.to_string(),
            ituc_rights_rating: indicators[0],
            corruption_index: indicators[1],
            migrant_worker_prevalence: indicators[2],
            wjp_index: indicators[3],
            walkfree_slavery_index: indicators[4],
            base_risk_score: 0.0,
        }
    }

    #[test]
    fn test_indicators_follow_column_order() {
        let r = record("ABC", "Alpha", [1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(r.indicators(), [1.0, 2.0, 3.0, 4.0, 5.0]);
        for (pos, indicator) in Indicator::ALL.iter().enumerate() {
            assert_eq!(indicator.position(), pos);
        }
    }

    #[test]
    fn test_from_rows_last_write_wins_in_first_slot() {
        let catalogue = Catalogue::from_rows(vec![
            record("ABC", "Alpha", [1.0; 5]),
            record("DEF", "Delta", [2.0; 5]),
            record("ABC", "Alpha Revised", [3.0; 5]),
        ]);

        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.countries[0].iso_code, "ABC");
        assert_eq!(catalogue.countries[0].name, "Alpha Revised");
        assert_eq!(catalogue.countries[1].iso_code, "DEF");
        assert_eq!(
            catalogue.duplicates,
            vec![DuplicateNotice {
                iso_code: "ABC".to_string(),
                replaced_name: "Alpha".to_string(),
                with_name: "Alpha Revised".to_string(),
            }]
        );
    }

    #[test]
    fn test_triple_duplicate_reports_each_overwrite() {
        let catalogue = Catalogue::from_rows(vec![
            record("ABC", "One", [1.0; 5]),
            record("ABC", "Two", [1.0; 5]),
            record("ABC", "Three", [1.0; 5]),
        ]);
        assert_eq!(catalogue.len(), 1);
        assert_eq!(catalogue.duplicates.len(), 2);
        assert_eq!(catalogue.duplicates[1].replaced_name, "Two");
        assert_eq!(catalogue.duplicates[1].with_name, "Three");
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let r = record("ABC", "Alpha", [1.0, 2.0, 3.0, 4.0, 5.0]);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["isoCode"], "ABC");
        assert_eq!(json["walkfreeSlaveryIndex"], 5.0);
        assert_eq!(json["baseRiskScore"], 0.0);
    }
}
