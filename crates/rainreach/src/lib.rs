//! Rainreach
//!
//! Weather-alert driven geo targeting for ad campaigns. Active weather
//! alerts are resolved to ZIP codes, translated to Google Ads geo target
//! constants, and pushed onto a campaign; a forecast grid scan fills in
//! when no alert matches.

pub mod ads;
pub mod alerts;
pub mod config;
pub mod fallback;
pub mod forecast;
pub mod geo;
pub mod geocode;
pub mod pipeline;
pub mod targets;

pub use config::Config;
pub use pipeline::{Pipeline, RunSummary, TargetPlan};
