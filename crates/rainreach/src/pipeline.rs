//! End-to-end targeting pipeline.
//!
//! Wires the alert feed, geo reference tables, forecast fallback and ads
//! platforms together. Loading the reference data in [`Pipeline::new`] is
//! the only step that fails outright; a run logs and contains every error
//! so a bad alert feed or a rejected API call never aborts the process.

use crate::ads::reconcile::reconcile;
use crate::ads::{meta, CampaignApi, MetaAdsClient};
use crate::alerts::{relevant_alerts, AlertSource};
use crate::config::Config;
use crate::fallback;
use crate::forecast::ForecastSource;
use crate::geo::{CoordinateTable, GeoReference, GeoTargetIndex};
use crate::geocode::ReverseGeocoder;
use crate::targets::TargetSet;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Geo(#[from] crate::geo::GeoError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

// ── Outputs ─────────────────────────────────────────────────────────

/// The ZIPs and geo target ids a run would act on.
#[derive(Debug, Clone)]
pub struct TargetPlan {
    pub zips: Vec<String>,
    pub geo_ids: Vec<String>,
    pub used_fallback: bool,
}

/// What a run actually did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub zips: Vec<String>,
    pub geo_ids: Vec<String>,
    pub used_fallback: bool,
    pub reconciled: bool,
    pub meta_updated: bool,
}

// ── Pipeline ────────────────────────────────────────────────────────

pub struct Pipeline<S, F, G> {
    config: Config,
    reference: GeoReference,
    geotargets: GeoTargetIndex,
    coordinates: Option<CoordinateTable>,
    alerts: S,
    forecast: F,
    geocoder: G,
    meta_client: Option<MetaAdsClient>,
}

impl<S, F, G> Pipeline<S, F, G>
where
    S: AlertSource,
    F: ForecastSource,
    G: ReverseGeocoder,
{
    /// Load the reference tables and assemble the pipeline.
    ///
    /// The ZIP centroid table is only loaded when Meta targeting is
    /// configured.
    pub fn new(config: Config, alerts: S, forecast: F, geocoder: G) -> Result<Self> {
        let reference = GeoReference::load(&config.data.counties, &config.data.crosswalk)?;
        log::info!(
            "[Pipeline] loaded {} counties and {} crosswalk ZIPs",
            reference.counties.len(),
            reference.crosswalk.len()
        );

        let geotargets = GeoTargetIndex::load(&config.data.geotargets)?;
        log::info!("[Pipeline] indexed {} geo target constants", geotargets.len());

        let coordinates = match &config.meta {
            Some(_) => {
                let table = CoordinateTable::load(&config.data.coordinates)?;
                log::info!("[Pipeline] loaded {} ZIP centroids", table.len());
                Some(table)
            }
            None => None,
        };

        Ok(Self {
            config,
            reference,
            geotargets,
            coordinates,
            alerts,
            forecast,
            geocoder,
            meta_client: None,
        })
    }

    pub fn with_meta_client(mut self, client: MetaAdsClient) -> Self {
        self.meta_client = Some(client);
        self
    }

    /// Derive the run's targets without touching any ads platform.
    pub async fn plan(&self) -> TargetPlan {
        let alerts = match self.alerts.active_alerts().await {
            Ok(alerts) => alerts,
            Err(e) => {
                log::error!("[Pipeline] alert fetch failed: {}", e);
                Vec::new()
            }
        };
        log::info!("[Pipeline] {} active alerts", alerts.len());

        let relevant = relevant_alerts(&alerts, &self.config.keywords);
        log::info!(
            "[Pipeline] {} alerts match keywords {:?}",
            relevant.len(),
            self.config.keywords
        );

        let targets = TargetSet::build(&relevant, self.config.per_alert_cap, |zone| {
            self.reference.zips_for_zone(zone)
        });
        let mut zips = targets.sample(self.config.sample_cap);
        let mut used_fallback = false;

        if zips.is_empty() {
            log::info!("[Pipeline] no alert-driven ZIPs, scanning forecast grid");
            zips = fallback::find_rain_zips(
                &self.forecast,
                &self.geocoder,
                &self.config.grid,
                &self.config.thresholds,
            )
            .await;
            used_fallback = true;
        }
        log::info!(
            "[Pipeline] targeting {} ZIPs (fallback: {})",
            zips.len(),
            used_fallback
        );

        let geo_ids = self.translate(&zips);
        TargetPlan {
            zips,
            geo_ids,
            used_fallback,
        }
    }

    /// Run the full pipeline against the given campaign API.
    pub async fn run<A: CampaignApi>(&self, ads: &A) -> RunSummary {
        let plan = self.plan().await;

        let meta_updated = self.push_meta_targeting(&plan.zips).await;

        let reconciled = if plan.geo_ids.is_empty() {
            log::warn!("[Pipeline] no geo targets resolved, leaving campaign untouched");
            false
        } else {
            match reconcile(ads, &self.config.google_ads.campaign_id, &plan.geo_ids).await {
                Ok(()) => true,
                Err(e) => {
                    log::error!("[Pipeline] campaign reconciliation failed: {}", e);
                    false
                }
            }
        };

        RunSummary {
            zips: plan.zips,
            geo_ids: plan.geo_ids,
            used_fallback: plan.used_fallback,
            reconciled,
            meta_updated,
        }
    }

    /// ZIPs to geo target constant ids; misses are logged and dropped.
    fn translate(&self, zips: &[String]) -> Vec<String> {
        let mut geo_ids = Vec::new();
        for zip in zips {
            match self.geotargets.geo_id(zip) {
                Some(id) => geo_ids.push(id.to_string()),
                None => log::warn!("[Pipeline] no geo target constant for ZIP {}", zip),
            }
        }
        geo_ids
    }

    /// Push radius targeting to the Meta ad set when configured.
    async fn push_meta_targeting(&self, zips: &[String]) -> bool {
        let meta_config = match &self.config.meta {
            Some(meta_config) => meta_config,
            None => return false,
        };
        let client = match &self.meta_client {
            Some(client) => client,
            None => {
                log::warn!("[Pipeline] Meta targeting configured but no client attached");
                return false;
            }
        };
        let coordinates = match &self.coordinates {
            Some(coordinates) => coordinates,
            None => return false,
        };

        if zips.is_empty() {
            log::info!("[Pipeline] no ZIPs to push to Meta");
            return false;
        }

        let targeting = meta::build_targeting(coordinates, zips, meta_config.radius_miles);
        if targeting.geo_locations.custom_locations.is_empty() {
            log::warn!("[Pipeline] no coordinates for any targeted ZIP, skipping Meta update");
            return false;
        }

        match client
            .update_targeting(&meta_config.ad_set_id, targeting)
            .await
        {
            Ok(()) => {
                log::info!("[Pipeline] Meta ad set {} retargeted", meta_config.ad_set_id);
                true
            }
            Err(e) => {
                log::error!("[Pipeline] Meta targeting update failed: {}", e);
                false
            }
        }
    }
}
