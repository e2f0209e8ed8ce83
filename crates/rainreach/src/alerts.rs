//! Active weather-alert feed client and relevance filter.
//!
//! Fetches the alert feed, flattens each feature to its event
//! classification and zone-code list, and filters on configured rain
//! keywords. Feed failures are surfaced as errors for the caller to
//! contain.

use serde::Deserialize;

// ── Constants ───────────────────────────────────────────────────────

/// Default active-alert feed endpoint.
pub const DEFAULT_ALERTS_URL: &str = "https://api.weather.gov/alerts/active";

/// The alert feed rejects requests without an identifying agent.
const USER_AGENT: &str = concat!("rainreach/", env!("CARGO_PKG_VERSION"));

// ── Errors ──────────────────────────────────────────────────────────

/// Errors from the alert feed.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, AlertError>;

// ── Wire format ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AlertFeed {
    #[serde(default)]
    features: Vec<AlertFeature>,
}

#[derive(Debug, Default, Deserialize)]
struct AlertFeature {
    #[serde(default)]
    properties: AlertProperties,
}

#[derive(Debug, Default, Deserialize)]
struct AlertProperties {
    #[serde(default)]
    event: Option<String>,
    #[serde(default)]
    geocode: AlertGeocode,
}

#[derive(Debug, Default, Deserialize)]
struct AlertGeocode {
    #[serde(rename = "UGC", default)]
    ugc: Vec<String>,
}

// ── Alert ───────────────────────────────────────────────────────────

/// One active alert: its event classification and the zone codes it
/// covers.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub event: Option<String>,
    pub zones: Vec<String>,
}

impl Alert {
    /// True when the event classification contains any keyword as a
    /// case-insensitive substring. Alerts without an event never match.
    pub fn matches_keywords(&self, keywords: &[String]) -> bool {
        match &self.event {
            Some(event) => {
                let event = event.to_lowercase();
                keywords.iter().any(|kw| event.contains(&kw.to_lowercase()))
            }
            None => false,
        }
    }
}

/// Alerts whose event classification matches any of the keywords.
pub fn relevant_alerts<'a>(alerts: &'a [Alert], keywords: &[String]) -> Vec<&'a Alert> {
    alerts
        .iter()
        .filter(|alert| alert.matches_keywords(keywords))
        .collect()
}

fn alerts_from_feed(feed: AlertFeed) -> Vec<Alert> {
    feed.features
        .into_iter()
        .map(|feature| Alert {
            event: feature.properties.event,
            zones: feature.properties.geocode.ugc,
        })
        .collect()
}

// ── Trait + client ──────────────────────────────────────────────────

/// Source of active weather alerts.
pub trait AlertSource: Send + Sync {
    fn active_alerts(&self) -> impl std::future::Future<Output = Result<Vec<Alert>>> + Send;
}

/// Alert feed client over the public alert API.
#[derive(Debug, Clone)]
pub struct AlertClient {
    client: reqwest::Client,
    url: String,
}

impl AlertClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl AlertSource for AlertClient {
    async fn active_alerts(&self) -> Result<Vec<Alert>> {
        let response = self
            .client
            .get(&self.url)
            .header("user-agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(AlertError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let feed: AlertFeed = response.json().await?;
        Ok(alerts_from_feed(feed))
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn feed_deserialization() {
        let json_str = r#"{
            "features": [
                {
                    "properties": {
                        "event": "Severe Thunderstorm Warning",
                        "geocode": {
                            "UGC": ["MDC031", "MDC033"],
                            "SAME": ["024031"]
                        }
                    }
                },
                {
                    "properties": {
                        "geocode": {"UGC": []}
                    }
                }
            ]
        }"#;
        let feed: AlertFeed = serde_json::from_str(json_str).unwrap();
        let alerts = alerts_from_feed(feed);
        assert_eq!(alerts.len(), 2);
        assert_eq!(
            alerts[0].event.as_deref(),
            Some("Severe Thunderstorm Warning")
        );
        assert_eq!(alerts[0].zones, vec!["MDC031", "MDC033"]);
        assert_eq!(alerts[1].event, None);
        assert!(alerts[1].zones.is_empty());
    }

    #[test]
    fn empty_feed_deserialization() {
        let feed: AlertFeed = serde_json::from_str("{}").unwrap();
        assert!(alerts_from_feed(feed).is_empty());
    }

    #[test]
    fn keyword_match_is_case_insensitive_substring() {
        let alert = Alert {
            event: Some("Severe Thunderstorm Warning".to_string()),
            zones: vec![],
        };
        assert!(alert.matches_keywords(&keywords(&["rain", "storm"])));
        assert!(alert.matches_keywords(&keywords(&["STORM"])));
        assert!(!alert.matches_keywords(&keywords(&["flood"])));
    }

    #[test]
    fn alert_without_event_never_matches() {
        let alert = Alert {
            event: None,
            zones: vec!["MDC031".to_string()],
        };
        assert!(!alert.matches_keywords(&keywords(&["rain", "storm"])));
    }

    #[test]
    fn relevant_alerts_filters_by_event() {
        let alerts = vec![
            Alert {
                event: Some("Heavy Rain Warning".to_string()),
                zones: vec!["MDC031".to_string()],
            },
            Alert {
                event: Some("Heat Advisory".to_string()),
                zones: vec!["AZC013".to_string()],
            },
            Alert {
                event: Some("Tropical Storm Watch".to_string()),
                zones: vec!["FLC086".to_string()],
            },
        ];
        let relevant = relevant_alerts(&alerts, &keywords(&["rain", "storm"]));
        assert_eq!(relevant.len(), 2);
        assert_eq!(relevant[0].zones, vec!["MDC031"]);
        assert_eq!(relevant[1].zones, vec!["FLC086"]);
    }
}
