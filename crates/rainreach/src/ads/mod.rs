//! Advertising platform clients.

pub mod google;
pub mod meta;
pub mod reconcile;

pub use google::GoogleAdsClient;
pub use meta::MetaAdsClient;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum AdsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("{0} not set")]
    MissingCredential(&'static str),
}

pub type Result<T> = std::result::Result<T, AdsError>;

// ── Campaign API ────────────────────────────────────────────────────

/// A campaign on the ads platform.
#[derive(Debug, Clone)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub status: String,
}

/// Operations the reconciler needs from an ads platform.
pub trait CampaignApi: Send + Sync {
    /// Resource names of the campaign's current location criteria.
    fn list_location_criteria(
        &self,
        campaign_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;

    /// Remove criteria by resource name.
    fn remove_criteria(
        &self,
        resource_names: &[String],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Attach geo target constants to the campaign as location criteria.
    fn create_location_criteria(
        &self,
        campaign_id: &str,
        geo_target_ids: &[String],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// List campaigns under the account.
    fn list_campaigns(&self) -> impl std::future::Future<Output = Result<Vec<Campaign>>> + Send;
}

// ── Mock ────────────────────────────────────────────────────────────

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Recording in-memory stand-in for the ads platform.
    pub struct MockCampaignApi {
        pub customer_id: String,
        pub criteria: Mutex<Vec<String>>,
        pub removal_batches: Mutex<Vec<Vec<String>>>,
        pub creation_batches: Mutex<Vec<Vec<String>>>,
        pub fail_removals: bool,
    }

    impl MockCampaignApi {
        pub fn new(customer_id: &str) -> Self {
            Self {
                customer_id: customer_id.to_string(),
                criteria: Mutex::new(Vec::new()),
                removal_batches: Mutex::new(Vec::new()),
                creation_batches: Mutex::new(Vec::new()),
                fail_removals: false,
            }
        }

        pub fn with_criteria(self, resource_names: &[&str]) -> Self {
            {
                let mut criteria = self.criteria.lock().unwrap();
                *criteria = resource_names.iter().map(|s| s.to_string()).collect();
            }
            self
        }

        /// The resource name the platform would assign to a criterion.
        pub fn resource_name(&self, campaign_id: &str, geo_target_id: &str) -> String {
            format!(
                "customers/{}/campaignCriteria/{}~{}",
                self.customer_id, campaign_id, geo_target_id
            )
        }
    }

    impl CampaignApi for MockCampaignApi {
        async fn list_location_criteria(&self, _campaign_id: &str) -> Result<Vec<String>> {
            Ok(self.criteria.lock().unwrap().clone())
        }

        async fn remove_criteria(&self, resource_names: &[String]) -> Result<()> {
            if self.fail_removals {
                return Err(AdsError::Api {
                    status: 400,
                    message: "criterion removal rejected".to_string(),
                });
            }
            self.removal_batches
                .lock()
                .unwrap()
                .push(resource_names.to_vec());
            let mut criteria = self.criteria.lock().unwrap();
            criteria.retain(|name| !resource_names.contains(name));
            Ok(())
        }

        async fn create_location_criteria(
            &self,
            campaign_id: &str,
            geo_target_ids: &[String],
        ) -> Result<()> {
            self.creation_batches
                .lock()
                .unwrap()
                .push(geo_target_ids.to_vec());
            let mut criteria = self.criteria.lock().unwrap();
            for id in geo_target_ids {
                criteria.push(self.resource_name(campaign_id, id));
            }
            Ok(())
        }

        async fn list_campaigns(&self) -> Result<Vec<Campaign>> {
            Ok(vec![Campaign {
                id: "111".to_string(),
                name: "Rain gear".to_string(),
                status: "ENABLED".to_string(),
            }])
        }
    }
}
