//! Meta (Facebook) ad set targeting client.
//!
//! Replaces an ad set's geo targeting with radius circles around ZIP
//! centroids via the Graph API.

use serde::Serialize;

use super::{AdsError, Result};
use crate::geo::CoordinateTable;

const API_URL: &str = "https://graph.facebook.com/v19.0";

// ── Targeting payload ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct CustomLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub distance_unit: String,
}

#[derive(Debug, Serialize)]
pub struct GeoLocations {
    pub custom_locations: Vec<CustomLocation>,
}

#[derive(Debug, Serialize)]
pub struct Targeting {
    pub geo_locations: GeoLocations,
    pub device_platforms: Vec<String>,
    pub user_os: Vec<String>,
}

/// Build mobile-only iOS targeting from ZIP centroids.
///
/// ZIPs missing from the coordinate table are logged and skipped.
pub fn build_targeting(
    coordinates: &CoordinateTable,
    zips: &[String],
    radius_miles: f64,
) -> Targeting {
    let mut custom_locations = Vec::new();
    for zip in zips {
        match coordinates.get(zip) {
            Some(point) => custom_locations.push(CustomLocation {
                latitude: point.lat,
                longitude: point.lng,
                radius: radius_miles,
                distance_unit: "mile".to_string(),
            }),
            None => log::warn!("[Meta] no coordinates for ZIP {}", zip),
        }
    }
    Targeting {
        geo_locations: GeoLocations { custom_locations },
        device_platforms: vec!["mobile".to_string()],
        user_os: vec!["iOS".to_string()],
    }
}

// ── Client ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct UpdateRequest {
    targeting: Targeting,
    access_token: String,
}

pub struct MetaAdsClient {
    client: reqwest::Client,
    access_token: String,
}

impl MetaAdsClient {
    pub fn new(access_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token,
        }
    }

    /// Build a client from `META_ACCESS_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let access_token = std::env::var("META_ACCESS_TOKEN")
            .map_err(|_| AdsError::MissingCredential("META_ACCESS_TOKEN"))?;
        Ok(Self::new(access_token))
    }

    /// Overwrite the ad set's targeting.
    pub async fn update_targeting(&self, ad_set_id: &str, targeting: Targeting) -> Result<()> {
        let request = UpdateRequest {
            targeting,
            access_token: self.access_token.clone(),
        };
        let response = self
            .client
            .post(format!("{}/{}", API_URL, ad_set_id))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(AdsError::Api { status, message });
        }
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────
