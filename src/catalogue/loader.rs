use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::error::LoadError;
use super::types::{Catalogue, CountryRecord};

/// Fixed column count: name, isoCode, five indicators, baseRiskScore
pub const COLUMN_COUNT: usize = 8;

const DELIMITER: char = ',';

/// Parses comma-delimited country reference data into a [`Catalogue`].
///
/// Stateless; construct once and share by reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogueLoader;

impl CatalogueLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse a catalogue source.
    ///
    /// The first non-blank line is the header. Structural problems (column
    /// count, missing ISO code, empty source) fail the whole load; numeric
    /// cells that do not parse become `0`.
    pub fn load(&self, source: &str) -> Result<Catalogue, LoadError> {
        let mut header_seen = false;
        let mut rows = Vec::new();

        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = normalize_line(raw);
            if line.is_empty() {
                continue;
            }

            let fields = split_fields(&line);

            if !header_seen {
                if fields.len() != COLUMN_COUNT {
                    return Err(LoadError::HeaderShapeMismatch {
                        expected: COLUMN_COUNT,
                        found: fields.len(),
                    });
                }
                header_seen = true;
                continue;
            }

            if fields.len() != COLUMN_COUNT {
                return Err(LoadError::RowShapeMismatch {
                    line: line_no,
                    expected: COLUMN_COUNT,
                    found: fields.len(),
                });
            }

            rows.push(parse_row(&fields, line_no)?);
        }

        if !header_seen {
            return Err(LoadError::EmptySource);
        }

        let catalogue = Catalogue::from_rows(rows);
        tracing::debug!(
            countries = catalogue.len(),
            duplicates = catalogue.duplicates.len(),
            "catalogue parsed"
        );
        Ok(catalogue)
    }

    /// Read a UTF-8 catalogue file and parse it.
    pub fn load_file(&self, path: &Path) -> Result<Catalogue> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalogue file at {}", path.display()))?;
        let catalogue = self
            .load(&source)
            .with_context(|| format!("Failed to load catalogue from {}", path.display()))?;
        Ok(catalogue)
    }
}

fn parse_row(fields: &[String], line_no: usize) -> Result<CountryRecord, LoadError> {
    let iso_code = fields[1].clone();
    if iso_code.is_empty() {
        return Err(LoadError::MissingIdentifier { line: line_no });
    }

    Ok(CountryRecord {
        name: fields[0].clone(),
        iso_code,
        ituc_rights_rating: parse_number(&fields[2]),
        corruption_index: parse_number(&fields[3]),
        migrant_worker_prevalence: parse_number(&fields[4]),
        wjp_index: parse_number(&fields[5]),
        walkfree_slavery_index: parse_number(&fields[6]),
        base_risk_score: parse_number(&fields[7]),
    })
}

/// Trim, drop NULs, then strip one layer of quotes from the line ends.
fn normalize_line(raw: &str) -> String {
    let cleaned: String = raw.trim().chars().filter(|&c| c != '\0').collect();
    strip_quotes(cleaned.trim()).to_string()
}

fn split_fields(line: &str) -> Vec<String> {
    line.split(DELIMITER)
        .map(|field| strip_quotes(field.trim()).trim().to_string())
        .collect()
}

/// Drop one leading and one trailing double quote, each independently, so a
/// fully quoted row survives the line-level pass. Single quotes are only
/// stripped as a matching pair; apostrophes occur inside country names.
fn strip_quotes(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
        return &s[1..s.len() - 1];
    }
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}

/// Malformed or non-finite numeric cells coerce to zero.
fn parse_number(cell: &str) -> f64 {
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
