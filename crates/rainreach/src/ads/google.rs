//! Google Ads REST client.
//!
//! Speaks the `googleAds:search` and `campaignCriteria:mutate` endpoints
//! directly. Search results and mutate operations use the proto-JSON
//! camelCase field names.

use serde::{Deserialize, Serialize};

use super::{AdsError, Campaign, CampaignApi, Result};

const API_URL: &str = "https://googleads.googleapis.com/v17";

// ── Wire format ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SearchRequest {
    query: String,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchRow>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchRow {
    #[serde(rename = "campaignCriterion")]
    campaign_criterion: Option<CriterionRow>,
    campaign: Option<CampaignRow>,
}

#[derive(Debug, Deserialize)]
struct CriterionRow {
    #[serde(rename = "resourceName")]
    resource_name: String,
}

/// Proto-JSON renders int64 ids as strings.
#[derive(Debug, Deserialize)]
struct CampaignRow {
    id: String,
    name: String,
    status: String,
}

#[derive(Debug, Serialize)]
struct MutateRequest {
    operations: Vec<CriterionOperation>,
}

#[derive(Debug, Default, Serialize)]
struct CriterionOperation {
    #[serde(skip_serializing_if = "Option::is_none")]
    create: Option<NewCriterion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remove: Option<String>,
}

impl CriterionOperation {
    fn create(campaign: String, geo_target_id: &str) -> Self {
        Self {
            create: Some(NewCriterion {
                campaign,
                location: LocationInfo {
                    geo_target_constant: format!("geoTargetConstants/{}", geo_target_id),
                },
            }),
            remove: None,
        }
    }

    fn remove(resource_name: String) -> Self {
        Self {
            create: None,
            remove: Some(resource_name),
        }
    }
}

#[derive(Debug, Serialize)]
struct NewCriterion {
    campaign: String,
    location: LocationInfo,
}

#[derive(Debug, Serialize)]
struct LocationInfo {
    #[serde(rename = "geoTargetConstant")]
    geo_target_constant: String,
}

// ── Queries ─────────────────────────────────────────────────────────

fn criteria_query(campaign_id: &str) -> String {
    format!(
        "SELECT campaign_criterion.resource_name \
         FROM campaign_criterion \
         WHERE campaign.id = {} \
         AND campaign_criterion.location.geo_target_constant IS NOT NULL",
        campaign_id
    )
}

fn campaigns_query() -> String {
    "SELECT campaign.id, campaign.name, campaign.status \
     FROM campaign ORDER BY campaign.id LIMIT 10"
        .to_string()
}

// ── Client ──────────────────────────────────────────────────────────

pub struct GoogleAdsClient {
    client: reqwest::Client,
    customer_id: String,
    developer_token: String,
    access_token: String,
}

impl GoogleAdsClient {
    pub fn new(customer_id: String, developer_token: String, access_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            customer_id,
            developer_token,
            access_token,
        }
    }

    /// Build a client from `GOOGLE_ADS_DEVELOPER_TOKEN` and
    /// `GOOGLE_ADS_ACCESS_TOKEN`.
    pub fn from_env(customer_id: &str) -> Result<Self> {
        let developer_token = std::env::var("GOOGLE_ADS_DEVELOPER_TOKEN")
            .map_err(|_| AdsError::MissingCredential("GOOGLE_ADS_DEVELOPER_TOKEN"))?;
        let access_token = std::env::var("GOOGLE_ADS_ACCESS_TOKEN")
            .map_err(|_| AdsError::MissingCredential("GOOGLE_ADS_ACCESS_TOKEN"))?;
        Ok(Self::new(
            customer_id.to_string(),
            developer_token,
            access_token,
        ))
    }

    async fn post_json<B: Serialize>(&self, url: &str, body: &B) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .header("developer-token", &self.developer_token)
            .json(body)
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
        Ok(response)
    }

    async fn search(&self, query: String) -> Result<Vec<SearchRow>> {
        let url = format!("{}/customers/{}/googleAds:search", API_URL, self.customer_id);
        let response = self.post_json(&url, &SearchRequest { query }).await?;
        let body: SearchResponse = response.json().await?;
        Ok(body.results)
    }

    async fn mutate(&self, operations: Vec<CriterionOperation>) -> Result<()> {
        let url = format!(
            "{}/customers/{}/campaignCriteria:mutate",
            API_URL, self.customer_id
        );
        self.post_json(&url, &MutateRequest { operations }).await?;
        Ok(())
    }
}

impl CampaignApi for GoogleAdsClient {
    async fn list_location_criteria(&self, campaign_id: &str) -> Result<Vec<String>> {
        let rows = self.search(criteria_query(campaign_id)).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.campaign_criterion)
            .map(|criterion| criterion.resource_name)
            .collect())
    }

    async fn remove_criteria(&self, resource_names: &[String]) -> Result<()> {
        let operations = resource_names
            .iter()
            .map(|name| CriterionOperation::remove(name.clone()))
            .collect();
        self.mutate(operations).await
    }

    async fn create_location_criteria(
        &self,
        campaign_id: &str,
        geo_target_ids: &[String],
    ) -> Result<()> {
        let campaign = format!("customers/{}/campaigns/{}", self.customer_id, campaign_id);
        let operations = geo_target_ids
            .iter()
            .map(|id| CriterionOperation::create(campaign.clone(), id))
            .collect();
        self.mutate(operations).await
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>> {
        let rows = self.search(campaigns_query()).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.campaign)
            .map(|campaign| Campaign {
                id: campaign.id,
                name: campaign.name,
                status: campaign.status,
            })
            .collect())
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_operation_serializes_to_proto_json() {
        let operation =
            CriterionOperation::create("customers/1234567890/campaigns/111".to_string(), "840021");
        let value = serde_json::to_value(&MutateRequest {
            operations: vec![operation],
        })
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "operations": [{
                    "create": {
                        "campaign": "customers/1234567890/campaigns/111",
                        "location": {
                            "geoTargetConstant": "geoTargetConstants/840021"
                        }
                    }
                }]
            })
        );
    }

    #[test]
    fn remove_operation_serializes_to_proto_json() {
        let operation = CriterionOperation::remove(
            "customers/1234567890/campaignCriteria/111~840021".to_string(),
        );
        let value = serde_json::to_value(&MutateRequest {
            operations: vec![operation],
        })
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "operations": [{
                    "remove": "customers/1234567890/campaignCriteria/111~840021"
                }]
            })
        );
    }

    #[test]
    fn criteria_search_response_parses() {
        let body = r#"{
            "results": [
                {"campaignCriterion": {"resourceName": "customers/1/campaignCriteria/111~840021"}},
                {"campaignCriterion": {"resourceName": "customers/1/campaignCriteria/111~840309"}}
            ],
            "fieldMask": "campaignCriterion.resourceName"
        }"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        let names: Vec<String> = response
            .results
            .into_iter()
            .filter_map(|row| row.campaign_criterion)
            .map(|criterion| criterion.resource_name)
            .collect();
        assert_eq!(
            names,
            vec![
                "customers/1/campaignCriteria/111~840021",
                "customers/1/campaignCriteria/111~840309"
            ]
        );
    }

    #[test]
    fn campaign_search_response_parses() {
        let body = r#"{
            "results": [
                {"campaign": {"id": "111", "name": "Rain gear", "status": "ENABLED"}}
            ]
        }"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        let campaign = response.results[0].campaign.as_ref().unwrap();
        assert_eq!(campaign.id, "111");
        assert_eq!(campaign.name, "Rain gear");
        assert_eq!(campaign.status, "ENABLED");
    }

    #[test]
    fn empty_search_response_parses() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn criteria_query_filters_on_campaign_and_location() {
        let query = criteria_query("111");
        assert_eq!(
            query,
            "SELECT campaign_criterion.resource_name \
             FROM campaign_criterion \
             WHERE campaign.id = 111 \
             AND campaign_criterion.location.geo_target_constant IS NOT NULL"
        );
    }
}
