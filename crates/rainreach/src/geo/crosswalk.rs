//! ZIP/county crosswalk table: county FIPS codes to ZIP codes.

use std::collections::HashSet;
use std::path::Path;

use super::{GeoError, Result};

/// Accepted header spellings for the ZIP column.
const ZIP_HEADERS: [&str; 4] = ["ZIP", "zip", "Zip", "ZIP CODE"];

/// Accepted header spellings for the county FIPS column.
const COUNTY_HEADERS: [&str; 3] = ["COUNTY", "COUNTY FIPS", "COUNTYFP"];

#[derive(Debug, Clone)]
struct CrosswalkRow {
    zip: String,
    county: String,
}

/// The ZIP/county crosswalk, one row per (ZIP, county FIPS) pair.
///
/// Both codes are zero-padded to five digits at load time, so lookups
/// compare normalized values regardless of how the file stores them.
#[derive(Debug, Default)]
pub struct CrosswalkTable {
    rows: Vec<CrosswalkRow>,
}

impl CrosswalkTable {
    /// Load the crosswalk CSV. Rows missing either value are skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)
            .map_err(|e| GeoError::Io(format!("{}: {}", path.display(), e)))?;

        let headers = reader
            .headers()
            .map_err(|e| GeoError::Csv(format!("{}: {}", path.display(), e)))?
            .clone();
        let zip_col = find_column(&headers, &ZIP_HEADERS).ok_or_else(|| {
            GeoError::MissingColumn(format!(
                "{}: expected one of {:?}",
                path.display(),
                ZIP_HEADERS
            ))
        })?;
        let county_col = find_column(&headers, &COUNTY_HEADERS).ok_or_else(|| {
            GeoError::MissingColumn(format!(
                "{}: expected one of {:?}",
                path.display(),
                COUNTY_HEADERS
            ))
        })?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record =
                record.map_err(|e| GeoError::Csv(format!("{}: {}", path.display(), e)))?;
            let zip = record.get(zip_col).unwrap_or("");
            let county = record.get(county_col).unwrap_or("");
            if zip.is_empty() || county.is_empty() {
                continue;
            }
            rows.push(CrosswalkRow {
                zip: format!("{:0>5}", zip),
                county: format!("{:0>5}", county),
            });
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Duplicate-free ZIPs of every row whose county code is in the set,
    /// in row order.
    pub fn zips_for_counties(&self, counties: &HashSet<String>) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut zips = Vec::new();
        for row in &self.rows {
            if counties.contains(&row.county) && seen.insert(row.zip.clone()) {
                zips.push(row.zip.clone());
            }
        }
        zips
    }
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| names.contains(&h.trim()))
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn load(contents: &str) -> Result<CrosswalkTable> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crosswalk.csv");
        std::fs::write(&path, contents).unwrap();
        CrosswalkTable::load(&path)
    }

    fn counties(codes: &[&str]) -> HashSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn short_codes_are_zero_padded() {
        let table = load("ZIP,COUNTY\n2108,25025\n").unwrap();
        assert_eq!(table.zips_for_counties(&counties(&["25025"])), vec!["02108"]);
    }

    #[test]
    fn alternate_header_spellings_are_accepted() {
        let table = load("ZIP CODE,COUNTYFP\n20850,24031\n").unwrap();
        assert_eq!(table.zips_for_counties(&counties(&["24031"])), vec!["20850"]);
    }

    #[test]
    fn county_values_are_padded_before_comparison() {
        let table = load("zip,COUNTY\n99577,2020\n").unwrap();
        assert_eq!(table.zips_for_counties(&counties(&["02020"])), vec!["99577"]);
    }

    #[test]
    fn duplicate_zips_appear_once() {
        let table = load("ZIP,COUNTY\n20850,24031\n20850,24031\n20852,24031\n").unwrap();
        assert_eq!(
            table.zips_for_counties(&counties(&["24031"])),
            vec!["20850", "20852"]
        );
    }

    #[test]
    fn rows_outside_the_county_set_are_ignored() {
        let table = load("ZIP,COUNTY\n20850,24031\n73301,48453\n").unwrap();
        assert_eq!(table.zips_for_counties(&counties(&["48453"])), vec!["73301"]);
        assert!(table.zips_for_counties(&counties(&["99999"])).is_empty());
    }

    #[test]
    fn missing_zip_column_is_an_error() {
        let result = load("POSTAL,COUNTY\n20850,24031\n");
        assert!(matches!(result, Err(GeoError::MissingColumn(_))));
    }

    #[test]
    fn rows_missing_values_are_skipped() {
        let table = load("ZIP,COUNTY\n20850,24031\n,\n20852\n").unwrap();
        assert_eq!(table.len(), 1);
    }
}
