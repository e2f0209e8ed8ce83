//! County reference table: zone codes to county FIPS codes.

use std::path::Path;

use super::{GeoError, Result};

/// One row of the county reference file.
#[derive(Debug, Clone)]
struct CountyRow {
    /// Two-letter state abbreviation.
    state: String,
    /// State FIPS, zero-padded to 2 digits.
    state_fips: String,
    /// County FIPS, zero-padded to 3 digits.
    county_fips: String,
}

/// The national county reference, loaded once and scanned per zone.
///
/// The file is line oriented: comma-separated columns
/// `state abbr, state FIPS, county FIPS, county name, class code`.
#[derive(Debug, Default)]
pub struct CountyTable {
    rows: Vec<CountyRow>,
}

impl CountyTable {
    /// Load the table from disk. Malformed lines are skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GeoError::Io(format!("{}: {}", path.display(), e)))?;
        Ok(Self::parse(&contents))
    }

    /// Parse table contents from a string.
    pub fn parse(contents: &str) -> Self {
        let rows = contents
            .lines()
            .filter_map(|line| {
                let mut cols = line.trim().split(',');
                let state = cols.next()?.trim();
                let state_fips = cols.next()?.trim();
                let county_fips = cols.next()?.trim();
                if state.is_empty() || state_fips.is_empty() || county_fips.is_empty() {
                    return None;
                }
                Some(CountyRow {
                    state: state.to_string(),
                    state_fips: format!("{:0>2}", state_fips),
                    county_fips: format!("{:0>3}", county_fips),
                })
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Full 5-digit county FIPS codes for a zone code.
    ///
    /// The zone's state is its first two characters and its county suffix
    /// the last three (`MDC031` and `MD031` both mean state `MD`, county
    /// `031`; the format letter in six-character codes is skipped). A zone
    /// with no matching row yields an empty list rather than an error.
    pub fn counties_for_zone(&self, zone: &str) -> Vec<String> {
        let zone = zone.trim();
        if zone.len() < 5 || !zone.is_ascii() {
            return Vec::new();
        }
        let state = &zone[..2];
        let suffix = &zone[zone.len() - 3..];

        self.rows
            .iter()
            .filter(|row| row.state == state && row.county_fips == suffix)
            .map(|row| format!("{}{}", row.state_fips, row.county_fips))
            .collect()
    }
}

// ── Tests ───────────────────────────────────────────────────────────
