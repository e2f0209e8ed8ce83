use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::alerts::DEFAULT_ALERTS_URL;
use crate::fallback::GridSpec;
use crate::forecast::RainThresholds;

/// Reference data files the pipeline loads at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFiles {
    /// Census county list (comma-separated text).
    #[serde(default = "default_counties_file")]
    pub counties: PathBuf,
    /// HUD ZIP to county FIPS crosswalk CSV.
    #[serde(default = "default_crosswalk_file")]
    pub crosswalk: PathBuf,
    /// Google Ads geo target constants export CSV.
    #[serde(default = "default_geotargets_file")]
    pub geotargets: PathBuf,
    /// ZIP centroid CSV, only needed when Meta targeting is configured.
    #[serde(default = "default_coordinates_file")]
    pub coordinates: PathBuf,
}

fn default_counties_file() -> PathBuf {
    PathBuf::from("data/national_county.txt")
}

fn default_crosswalk_file() -> PathBuf {
    PathBuf::from("data/zip_county.csv")
}

fn default_geotargets_file() -> PathBuf {
    PathBuf::from("data/geotargets.csv")
}

fn default_coordinates_file() -> PathBuf {
    PathBuf::from("data/uszips.csv")
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            counties: default_counties_file(),
            crosswalk: default_crosswalk_file(),
            geotargets: default_geotargets_file(),
            coordinates: default_coordinates_file(),
        }
    }
}

/// Google Ads account and campaign to reconcile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleAdsConfig {
    /// Customer id without dashes (e.g. 1234567890).
    pub customer_id: String,
    /// Campaign whose location criteria are replaced each run.
    pub campaign_id: String,
}

/// Optional Meta ad set to retarget alongside the Google campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub ad_set_id: String,
    /// Radius of each custom location circle, in miles.
    #[serde(default = "default_radius_miles")]
    pub radius_miles: f64,
}

fn default_radius_miles() -> f64 {
    30.0
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Alert event keywords, matched case-insensitively.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    /// Active alerts endpoint.
    #[serde(default = "default_alerts_url")]
    pub alerts_url: String,
    /// Most new ZIPs a single alert may contribute.
    #[serde(default = "default_per_alert_cap")]
    pub per_alert_cap: usize,
    /// Most ZIPs targeted per run.
    #[serde(default = "default_sample_cap")]
    pub sample_cap: usize,
    #[serde(default)]
    pub data: DataFiles,
    /// Fallback forecast scan grid.
    #[serde(default)]
    pub grid: GridSpec,
    /// Rain qualification thresholds, in inches.
    #[serde(default)]
    pub thresholds: RainThresholds,
    pub google_ads: GoogleAdsConfig,
    #[serde(default)]
    pub meta: Option<MetaConfig>,
}

fn default_keywords() -> Vec<String> {
    vec!["rain".to_string(), "storm".to_string()]
}

fn default_alerts_url() -> String {
    DEFAULT_ALERTS_URL.to_string()
}

fn default_per_alert_cap() -> usize {
    30
}

fn default_sample_cap() -> usize {
    100
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}
