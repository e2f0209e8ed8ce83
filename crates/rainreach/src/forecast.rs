//! Point precipitation forecasts and rain qualification.
//!
//! The client fetches the 5-day/3-hour forecast for a coordinate; the
//! qualification logic decides whether the forecast amounts to heavy
//! rain. Volumes are imperial (inches per 3-hour period).

use serde::{Deserialize, Serialize};

// ── Constants ───────────────────────────────────────────────────────

/// Forecast API endpoint (5-day/3-hour tier).
const API_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

// ── Errors ──────────────────────────────────────────────────────────

/// Errors from forecast lookups.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("OPENWEATHER_API_KEY not set")]
    MissingApiKey,
}

pub type Result<T> = std::result::Result<T, ForecastError>;

// ── Wire format ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct ForecastEntry {
    #[serde(default)]
    dt_txt: String,
    #[serde(default)]
    rain: Option<RainVolume>,
}

#[derive(Debug, Default, Deserialize)]
struct RainVolume {
    #[serde(rename = "3h", default)]
    three_hour: Option<f64>,
}

// ── Periods and signals ─────────────────────────────────────────────

/// One 3-hour forecast period.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPeriod {
    pub time: String,
    pub rain_volume: f64,
}

/// A grid point whose forecast qualifies as heavy rain.
#[derive(Debug, Clone, PartialEq)]
pub struct RainSignal {
    pub lat: f64,
    pub lon: f64,
    pub total_rain: f64,
    pub rainy_periods: Vec<ForecastPeriod>,
}

fn default_total() -> f64 {
    1.0
}

fn default_heavy_period() -> f64 {
    0.5
}

/// Rain qualification thresholds, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RainThresholds {
    /// Summed rain volume over the whole forecast window that qualifies.
    #[serde(default = "default_total")]
    pub total: f64,

    /// Single-period volume that qualifies on its own.
    #[serde(default = "default_heavy_period")]
    pub heavy_period: f64,
}

impl Default for RainThresholds {
    fn default() -> Self {
        Self {
            total: default_total(),
            heavy_period: default_heavy_period(),
        }
    }
}

/// Decide whether a point's forecast qualifies as heavy rain.
///
/// Sums the rainy periods' volumes; the point qualifies when the total
/// exceeds `thresholds.total` or any single period reaches
/// `thresholds.heavy_period`.
pub fn evaluate_point(
    lat: f64,
    lon: f64,
    periods: &[ForecastPeriod],
    thresholds: &RainThresholds,
) -> Option<RainSignal> {
    let mut total_rain = 0.0;
    let mut rainy_periods = Vec::new();
    let mut has_heavy_period = false;

    for period in periods {
        if period.rain_volume > 0.0 {
            total_rain += period.rain_volume;
            if period.rain_volume >= thresholds.heavy_period {
                has_heavy_period = true;
            }
            rainy_periods.push(period.clone());
        }
    }

    if total_rain > thresholds.total || has_heavy_period {
        Some(RainSignal {
            lat,
            lon,
            total_rain,
            rainy_periods,
        })
    } else {
        None
    }
}

fn periods_from_response(response: ForecastResponse) -> Vec<ForecastPeriod> {
    response
        .list
        .into_iter()
        .map(|entry| ForecastPeriod {
            time: entry.dt_txt,
            rain_volume: entry.rain.and_then(|r| r.three_hour).unwrap_or(0.0),
        })
        .collect()
}

// ── Trait + client ──────────────────────────────────────────────────

/// Source of point precipitation forecasts.
pub trait ForecastSource: Send + Sync {
    /// Forecast periods for a coordinate. Empty when the API has no data
    /// for the point.
    fn point_forecast(
        &self,
        lat: f64,
        lon: f64,
    ) -> impl std::future::Future<Output = Result<Vec<ForecastPeriod>>> + Send;
}

/// Forecast API client.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: reqwest::Client,
    api_key: String,
}

impl ForecastClient {
    /// Create a client from the `OPENWEATHER_API_KEY` environment
    /// variable.
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("OPENWEATHER_API_KEY").map_err(|_| ForecastError::MissingApiKey)?;
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
        })
    }
}

impl ForecastSource for ForecastClient {
    async fn point_forecast(&self, lat: f64, lon: f64) -> Result<Vec<ForecastPeriod>> {
        let response = self
            .client
            .get(API_URL)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("units", "imperial".to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ForecastError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let forecast: ForecastResponse = response.json().await?;
        Ok(periods_from_response(forecast))
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn period(time: &str, rain_volume: f64) -> ForecastPeriod {
        ForecastPeriod {
            time: time.to_string(),
            rain_volume,
        }
    }

    #[test]
    fn forecast_response_deserialization() {
        let json_str = r#"{
            "list": [
                {"dt_txt": "2025-06-01 12:00:00", "rain": {"3h": 0.62}},
                {"dt_txt": "2025-06-01 15:00:00"},
                {"dt_txt": "2025-06-01 18:00:00", "rain": {}}
            ]
        }"#;
        let response: ForecastResponse = serde_json::from_str(json_str).unwrap();
        let periods = periods_from_response(response);
        assert_eq!(periods.len(), 3);
        assert_eq!(periods[0], period("2025-06-01 12:00:00", 0.62));
        assert_eq!(periods[1].rain_volume, 0.0);
        assert_eq!(periods[2].rain_volume, 0.0);
    }

    #[test]
    fn qualifies_on_accumulated_total() {
        let periods: Vec<ForecastPeriod> =
            (0..5).map(|i| period(&format!("t{}", i), 0.3)).collect();
        let signal = evaluate_point(39.0, -77.0, &periods, &RainThresholds::default()).unwrap();
        assert!((signal.total_rain - 1.5).abs() < 1e-9);
        assert_eq!(signal.rainy_periods.len(), 5);
    }

    #[test]
    fn qualifies_on_a_single_heavy_period() {
        let periods = vec![period("t0", 0.5)];
        let signal = evaluate_point(39.0, -77.0, &periods, &RainThresholds::default());
        assert!(signal.is_some());
    }

    #[test]
    fn light_rain_does_not_qualify() {
        let periods = vec![period("t0", 0.2), period("t1", 0.3)];
        assert!(evaluate_point(39.0, -77.0, &periods, &RainThresholds::default()).is_none());
    }

    #[test]
    fn total_at_exactly_the_threshold_does_not_qualify() {
        // Total must strictly exceed the threshold; 0.25 is exact in
        // binary so the sum is exactly 1.0.
        let periods: Vec<ForecastPeriod> =
            (0..4).map(|i| period(&format!("t{}", i), 0.25)).collect();
        assert!(evaluate_point(39.0, -77.0, &periods, &RainThresholds::default()).is_none());
    }

    #[test]
    fn dry_forecast_does_not_qualify() {
        let periods = vec![period("t0", 0.0)];
        assert!(evaluate_point(39.0, -77.0, &periods, &RainThresholds::default()).is_none());
    }

    #[test]
    fn dry_periods_are_excluded_from_the_signal() {
        let periods = vec![period("t0", 0.0), period("t1", 0.7), period("t2", 0.0)];
        let signal = evaluate_point(39.0, -77.0, &periods, &RainThresholds::default()).unwrap();
        assert_eq!(signal.rainy_periods, vec![period("t1", 0.7)]);
    }

    #[test]
    fn threshold_defaults() {
        let thresholds = RainThresholds::default();
        assert_eq!(thresholds.total, 1.0);
        assert_eq!(thresholds.heavy_period, 0.5);
    }
}
