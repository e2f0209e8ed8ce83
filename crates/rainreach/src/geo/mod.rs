//! Static geographic reference tables.
//!
//! Four file-backed tables, each loaded once per run and queried in memory:
//! the county reference, the ZIP/county crosswalk, the ad-platform
//! geo-target export, and the ZIP coordinate table.

mod coordinates;
mod county;
mod crosswalk;
mod geotargets;

pub use coordinates::{CoordinateTable, ZipCoordinates};
pub use county::CountyTable;
pub use crosswalk::CrosswalkTable;
pub use geotargets::GeoTargetIndex;

use std::collections::HashSet;
use std::path::Path;

// ── Errors ──────────────────────────────────────────────────────────

/// Errors from loading reference tables.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("CSV error: {0}")]
    Csv(String),
    #[error("missing column: {0}")]
    MissingColumn(String),
}

pub type Result<T> = std::result::Result<T, GeoError>;

// ── GeoReference ────────────────────────────────────────────────────

/// County reference plus ZIP crosswalk, loaded once and reused for every
/// zone resolved in a run.
#[derive(Debug)]
pub struct GeoReference {
    pub counties: CountyTable,
    pub crosswalk: CrosswalkTable,
}

impl GeoReference {
    /// Load both resolution tables.
    pub fn load(
        county_path: impl AsRef<Path>,
        crosswalk_path: impl AsRef<Path>,
    ) -> Result<Self> {
        Ok(Self {
            counties: CountyTable::load(county_path)?,
            crosswalk: CrosswalkTable::load(crosswalk_path)?,
        })
    }

    /// Resolve a zone code to ZIP codes: zone → county FIPS → ZIPs.
    ///
    /// Unknown zones and counties with no crosswalk rows yield an empty
    /// list; neither is an error.
    pub fn zips_for_zone(&self, zone: &str) -> Vec<String> {
        let counties: HashSet<String> =
            self.counties.counties_for_zone(zone).into_iter().collect();
        if counties.is_empty() {
            return Vec::new();
        }
        self.crosswalk.zips_for_counties(&counties)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
