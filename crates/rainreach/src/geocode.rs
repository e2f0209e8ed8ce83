//! Reverse geocoding of coordinates to ZIP + place description.

use serde::Deserialize;

// ── Constants ───────────────────────────────────────────────────────

/// Reverse-geocode API endpoint.
const API_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

// ── Errors ──────────────────────────────────────────────────────────

/// Errors from reverse geocoding.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("OPENCAGE_API_KEY not set")]
    MissingApiKey,
}

pub type Result<T> = std::result::Result<T, GeocodeError>;

// ── Wire format ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Default, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    components: GeocodeComponents,
    #[serde(default)]
    formatted: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GeocodeComponents {
    #[serde(default)]
    postcode: Option<String>,
}

// ── Place ───────────────────────────────────────────────────────────

/// A reverse-geocoded place: postal code plus formatted description.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub zip: String,
    pub location: String,
}

/// The first result, if it carries a postcode and describes a United
/// States location. Anything else is unusable for ZIP targeting.
fn first_us_place(response: GeocodeResponse) -> Option<Place> {
    let result = response.results.into_iter().next()?;
    let zip = result.components.postcode?;
    let location = result.formatted?;
    if !location.contains("United States") {
        return None;
    }
    Some(Place { zip, location })
}

// ── Trait + client ──────────────────────────────────────────────────

/// Reverse geocoder.
pub trait ReverseGeocoder: Send + Sync {
    /// Place for a coordinate; `None` when there is no usable US result.
    fn reverse(
        &self,
        lat: f64,
        lon: f64,
    ) -> impl std::future::Future<Output = Result<Option<Place>>> + Send;
}

/// Reverse-geocode API client.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: reqwest::Client,
    api_key: String,
}

impl GeocodeClient {
    /// Create a client from the `OPENCAGE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("OPENCAGE_API_KEY").map_err(|_| GeocodeError::MissingApiKey)?;
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
        })
    }
}

impl ReverseGeocoder for GeocodeClient {
    async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<Place>> {
        let query = format!("{}+{}", lat, lon);
        let response = self
            .client
            .get(API_URL)
            .query(&[("q", query.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let geocode: GeocodeResponse = response.json().await?;
        Ok(first_us_place(geocode))
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json_str: &str) -> GeocodeResponse {
        serde_json::from_str(json_str).unwrap()
    }

    #[test]
    fn us_result_with_postcode_is_a_place() {
        let response = parse(
            r#"{
                "results": [
                    {
                        "components": {"postcode": "59301", "state": "Montana"},
                        "formatted": "Miles City, MT 59301, United States of America"
                    }
                ]
            }"#,
        );
        let place = first_us_place(response).unwrap();
        assert_eq!(place.zip, "59301");
        assert!(place.location.contains("Miles City"));
    }

    #[test]
    fn non_us_result_is_discarded() {
        let response = parse(
            r#"{
                "results": [
                    {
                        "components": {"postcode": "V8W 1P6"},
                        "formatted": "Victoria, BC V8W 1P6, Canada"
                    }
                ]
            }"#,
        );
        assert_eq!(first_us_place(response), None);
    }

    #[test]
    fn missing_postcode_is_discarded() {
        let response = parse(
            r#"{
                "results": [
                    {
                        "components": {"state": "Montana"},
                        "formatted": "Custer County, Montana, United States of America"
                    }
                ]
            }"#,
        );
        assert_eq!(first_us_place(response), None);
    }

    #[test]
    fn empty_results_yield_none() {
        assert_eq!(first_us_place(parse(r#"{"results": []}"#)), None);
        assert_eq!(first_us_place(parse("{}")), None);
    }

    #[test]
    fn only_the_first_result_is_considered() {
        let response = parse(
            r#"{
                "results": [
                    {"components": {}, "formatted": "Somewhere, Canada"},
                    {
                        "components": {"postcode": "59301"},
                        "formatted": "Miles City, MT, United States of America"
                    }
                ]
            }"#,
        );
        assert_eq!(first_us_place(response), None);
    }
}
