//! ZIP centroid coordinates for custom-location targeting.

use std::collections::HashMap;
use std::path::Path;

use super::{GeoError, Result};

/// A ZIP centroid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZipCoordinates {
    pub lat: f64,
    pub lng: f64,
}

/// ZIP → centroid lookup, loaded from a CSV with `zip`, `lat` and `lng`
/// columns. ZIPs are zero-padded to five digits at load time.
#[derive(Debug, Default)]
pub struct CoordinateTable {
    by_zip: HashMap<String, ZipCoordinates>,
}

impl CoordinateTable {
    /// Load the coordinates CSV. Rows with unparseable coordinates are
    /// skipped.
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
        let zip_col = column("zip")?;
        let lat_col = column("lat")?;
        let lng_col = column("lng")?;

        let mut by_zip = HashMap::new();
        for record in reader.records() {
            let record =
                record.map_err(|e| GeoError::Csv(format!("{}: {}", path.display(), e)))?;
            let zip = record.get(zip_col).unwrap_or("");
            if zip.is_empty() {
                continue;
            }
            let lat = record.get(lat_col).unwrap_or("").parse::<f64>();
            let lng = record.get(lng_col).unwrap_or("").parse::<f64>();
            if let (Ok(lat), Ok(lng)) = (lat, lng) {
                by_zip.insert(format!("{:0>5}", zip), ZipCoordinates { lat, lng });
            }
        }
        Ok(Self { by_zip })
    }

    pub fn get(&self, zip: &str) -> Option<ZipCoordinates> {
        self.by_zip.get(zip).copied()
    }

    pub fn len(&self) -> usize {
        self.by_zip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_zip.is_empty()
    }
}

// ── Tests ───────────────────────────────────────────────────────────
