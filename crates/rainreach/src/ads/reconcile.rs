//! Campaign location-criteria reconciliation.
//!
//! Replaces whatever location criteria a campaign currently carries with
//! the desired geo target set: list, remove all, then attach the new set
//! in one batch. A removal failure aborts before any creation, so the
//! campaign is never left with a mix of old and new targets.

use super::{CampaignApi, Result};

/// Replace `campaign_id`'s location criteria with `geo_target_ids`.
///
/// The campaign briefly has no location criteria between the removal
/// and creation calls.
pub async fn reconcile<A: CampaignApi>(
    api: &A,
    campaign_id: &str,
    geo_target_ids: &[String],
) -> Result<()> {
    let existing = api.list_location_criteria(campaign_id).await?;
    log::info!(
        "[Reconcile] campaign {}: {} existing location criteria",
        campaign_id,
        existing.len()
    );

    if !existing.is_empty() {
        api.remove_criteria(&existing).await?;
        log::info!("[Reconcile] removed {} criteria", existing.len());
    }

    if geo_target_ids.is_empty() {
        log::info!("[Reconcile] no geo targets to attach");
        return Ok(());
    }

    api.create_location_criteria(campaign_id, geo_target_ids)
        .await?;
    log::info!("[Reconcile] attached {} geo targets", geo_target_ids.len());
    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────────
