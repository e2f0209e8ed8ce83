//! Ad-platform geo-target export index: ZIP codes to criterion IDs.

use std::collections::HashMap;
use std::path::Path;

use super::{GeoError, Result};

/// Header names in the platform's geo-target export.
const CRITERIA_ID: &str = "Criteria ID";
const CANONICAL_NAME: &str = "Canonical Name";
const TARGET_TYPE: &str = "Target Type";
const STATUS: &str = "Status";
const COUNTRY_CODE: &str = "Country Code";

/// Postal-code entries of the platform's geo-target export, keyed by ZIP.
///
/// Only rows with target type `Postal Code`, status `Active`, and country
/// code `US` are indexed; the key is the canonical name up to its first
/// comma and the value is the criterion ID.
#[derive(Debug, Default)]
pub struct GeoTargetIndex {
    by_zip: HashMap<String, String>,
}

impl GeoTargetIndex {
    /// Load and filter the export CSV.
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
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| GeoError::MissingColumn(format!("{}: {}", path.display(), name)))
        };
        let id_col = column(CRITERIA_ID)?;
        let name_col = column(CANONICAL_NAME)?;
        let type_col = column(TARGET_TYPE)?;
        let status_col = column(STATUS)?;
        let country_col = column(COUNTRY_CODE)?;

        let mut by_zip = HashMap::new();
        for record in reader.records() {
            let record =
                record.map_err(|e| GeoError::Csv(format!("{}: {}", path.display(), e)))?;
            if record.get(type_col) != Some("Postal Code")
                || record.get(status_col) != Some("Active")
                || record.get(country_col) != Some("US")
            {
                continue;
            }
            let name = record.get(name_col).unwrap_or("");
            let zip = name.split(',').next().unwrap_or("").trim();
            let id = record.get(id_col).unwrap_or("");
            if !zip.is_empty() && !id.is_empty() {
                by_zip.insert(zip.to_string(), id.to_string());
            }
        }
        Ok(Self { by_zip })
    }

    /// Criterion ID for a ZIP. A miss is soft; the caller decides whether
    /// to warn and skip.
    pub fn geo_id(&self, zip: &str) -> Option<&str> {
        self.by_zip.get(zip).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_zip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_zip.is_empty()
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = "\
Criteria ID,Canonical Name,Target Type,Status,Country Code
9041938,\"20850,Maryland,United States\",Postal Code,Active,US
9041939,\"20852,Maryland,United States\",Postal Code,Active,US
1014895,\"Rockville,Maryland,United States\",City,Active,US
9060075,\"02108,Massachusetts,United States\",Postal Code,Removal Planned,US
9991234,\"T5J,Alberta,Canada\",Postal Code,Active,CA
";

    fn load(contents: &str) -> GeoTargetIndex {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geotargets.csv");
        std::fs::write(&path, contents).unwrap();
        GeoTargetIndex::load(&path).unwrap()
    }

    #[test]
    fn active_us_postal_rows_are_indexed() {
        let index = load(DATA);
        assert_eq!(index.len(), 2);
        assert_eq!(index.geo_id("20850"), Some("9041938"));
        assert_eq!(index.geo_id("20852"), Some("9041939"));
    }

    #[test]
    fn city_inactive_and_foreign_rows_are_excluded() {
        let index = load(DATA);
        assert_eq!(index.geo_id("Rockville"), None);
        assert_eq!(index.geo_id("02108"), None);
        assert_eq!(index.geo_id("T5J"), None);
    }

    #[test]
    fn key_is_the_canonical_name_before_the_first_comma() {
        let index = load(
            "Criteria ID,Canonical Name,Target Type,Status,Country Code\n\
             123,\"00501,New York,United States\",Postal Code,Active,US\n",
        );
        assert_eq!(index.geo_id("00501"), Some("123"));
    }

    #[test]
    fn unknown_zip_is_a_soft_miss() {
        let index = load(DATA);
        assert_eq!(index.geo_id("99999"), None);
    }

    #[test]
    fn missing_header_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geotargets.csv");
        std::fs::write(&path, "Criteria ID,Canonical Name\n1,foo\n").unwrap();
        let result = GeoTargetIndex::load(&path);
        assert!(matches!(result, Err(GeoError::MissingColumn(_))));
    }
}
