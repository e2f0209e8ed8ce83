//! Forecast-grid fallback for when alerts produce no targets.
//!
//! Scans a fixed continental-US coordinate grid for heavy-rain forecasts
//! and reverse geocodes the qualifying points to ZIP codes. Per-point
//! failures drop that point only; the scan itself always completes.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

use crate::forecast::{evaluate_point, ForecastSource, RainSignal, RainThresholds};
use crate::geocode::ReverseGeocoder;

// ── Grid ────────────────────────────────────────────────────────────

/// Concurrent in-flight forecast lookups during the grid scan.
const SCAN_CONCURRENCY: usize = 10;

fn default_lat_start() -> f64 {
    25.0
}

fn default_lat_end() -> f64 {
    70.0
}

fn default_lon_start() -> f64 {
    -125.0
}

fn default_lon_end() -> f64 {
    -65.0
}

fn default_step() -> f64 {
    2.5
}

/// The fixed lat/lon scan grid, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    #[serde(default = "default_lat_start")]
    pub lat_start: f64,
    #[serde(default = "default_lat_end")]
    pub lat_end: f64,
    #[serde(default = "default_lon_start")]
    pub lon_start: f64,
    #[serde(default = "default_lon_end")]
    pub lon_end: f64,
    #[serde(default = "default_step")]
    pub step: f64,
}

impl Default for GridSpec {
    /// Continental-US grid: 19 latitudes from 25.0 and 25 longitudes
    /// from -125.0, every 2.5 degrees (475 points).
    fn default() -> Self {
        Self {
            lat_start: default_lat_start(),
            lat_end: default_lat_end(),
            lon_start: default_lon_start(),
            lon_end: default_lon_end(),
            step: default_step(),
        }
    }
}

impl GridSpec {
    /// All grid points, row-major.
    pub fn points(&self) -> Vec<(f64, f64)> {
        let mut points = Vec::new();
        for lat in axis(self.lat_start, self.lat_end, self.step) {
            for lon in axis(self.lon_start, self.lon_end, self.step) {
                points.push((lat, lon));
            }
        }
        points
    }
}

/// Axis values from `start` through `end` in `step` increments.
fn axis(start: f64, end: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || end < start {
        return vec![start];
    }
    let count = ((end - start) / step + 1e-9).floor() as usize;
    (0..=count).map(|i| start + i as f64 * step).collect()
}

// ── Scan ────────────────────────────────────────────────────────────

/// Fetch every grid point's forecast and keep the qualifying signals.
///
/// Lookups run concurrently; a failed lookup is logged and drops its
/// point.
pub async fn scan_grid<F>(
    forecast: &F,
    grid: &GridSpec,
    thresholds: &RainThresholds,
) -> Vec<RainSignal>
where
    F: ForecastSource,
{
    let points = grid.points();
    let total = points.len();

    let results: Vec<Option<RainSignal>> = stream::iter(points)
        .map(|(lat, lon)| async move {
            match forecast.point_forecast(lat, lon).await {
                Ok(periods) => evaluate_point(lat, lon, &periods, thresholds),
                Err(e) => {
                    log::warn!("[Fallback] forecast failed for ({}, {}): {}", lat, lon, e);
                    None
                }
            }
        })
        .buffer_unordered(SCAN_CONCURRENCY)
        .collect()
        .await;

    let signals: Vec<RainSignal> = results.into_iter().flatten().collect();
    log::info!(
        "[Fallback] heavy rain at {} of {} grid points",
        signals.len(),
        total
    );
    signals
}

// ── Enrichment ──────────────────────────────────────────────────────

/// A rain signal enriched with its reverse-geocoded place.
#[derive(Debug, Clone)]
pub struct RainZone {
    pub zip: String,
    pub location: String,
    pub signal: RainSignal,
}

/// Attach places to signals, dropping points the geocoder cannot place
/// in the US.
async fn enrich<G>(geocoder: &G, signals: Vec<RainSignal>) -> Vec<RainZone>
where
    G: ReverseGeocoder,
{
    let lookups = signals.into_iter().map(|signal| async move {
        match geocoder.reverse(signal.lat, signal.lon).await {
            Ok(Some(place)) => Some(RainZone {
                zip: place.zip,
                location: place.location,
                signal,
            }),
            Ok(None) => None,
            Err(e) => {
                log::warn!(
                    "[Fallback] reverse geocode failed for ({}, {}): {}",
                    signal.lat,
                    signal.lon,
                    e
                );
                None
            }
        }
    });

    futures::future::join_all(lookups)
        .await
        .into_iter()
        .flatten()
        .collect()
}

/// Scan the grid, geocode the qualifying points, and return the
/// deduplicated ZIP list.
pub async fn find_rain_zips<F, G>(
    forecast: &F,
    geocoder: &G,
    grid: &GridSpec,
    thresholds: &RainThresholds,
) -> Vec<String>
where
    F: ForecastSource,
    G: ReverseGeocoder,
{
    let signals = scan_grid(forecast, grid, thresholds).await;
    let zones = enrich(geocoder, signals).await;

    let mut seen = HashSet::new();
    let mut zips = Vec::new();
    for zone in &zones {
        log::info!(
            "[Fallback] {} ({}): {:.2} in over {} periods",
            zone.zip,
            zone.location,
            zone.signal.total_rain,
            zone.signal.rainy_periods.len()
        );
        if seen.insert(zone.zip.clone()) {
            zips.push(zone.zip.clone());
        }
    }
    zips
}

// ── Tests ───────────────────────────────────────────────────────────
