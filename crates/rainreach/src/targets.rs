//! Target ZIP set: per-alert capped admission, deduplication, sampling.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::alerts::Alert;

/// Insertion-ordered, duplicate-free collection of target ZIP codes.
///
/// Built by admitting ZIPs alert by alert under a per-alert cap, then
/// sampled down to the global cap.
#[derive(Debug, Default)]
pub struct TargetSet {
    zips: Vec<String>,
    seen: HashSet<String>,
}

impl TargetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the set from relevant alerts.
    ///
    /// Each alert's zones are resolved and concatenated in order, then
    /// not-yet-seen ZIPs are admitted one at a time until `per_alert_cap`
    /// new ones have been taken from that alert.
    pub fn build<F>(alerts: &[&Alert], per_alert_cap: usize, mut resolve: F) -> Self
    where
        F: FnMut(&str) -> Vec<String>,
    {
        let mut set = Self::new();
        for alert in alerts {
            let candidates: Vec<String> = alert
                .zones
                .iter()
                .flat_map(|zone| resolve(zone))
                .collect();
            set.admit(&candidates, per_alert_cap);
        }
        set
    }

    /// Admit up to `cap` not-yet-seen ZIPs from `candidates`, in order.
    ///
    /// ZIPs already in the set are skipped and do not count against the
    /// cap. Returns how many were added.
    pub fn admit(&mut self, candidates: &[String], cap: usize) -> usize {
        let mut added = 0;
        for zip in candidates {
            if added >= cap {
                break;
            }
            if self.seen.insert(zip.clone()) {
                self.zips.push(zip.clone());
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.zips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zips.is_empty()
    }

    /// All ZIPs in insertion order.
    pub fn zips(&self) -> &[String] {
        &self.zips
    }

    /// Uniform random sample of at most `n` ZIPs.
    pub fn sample(&self, n: usize) -> Vec<String> {
        self.sample_with(n, &mut rand::thread_rng())
    }

    /// Sample with a caller-supplied random source; tests pass a seeded
    /// RNG for deterministic output.
    pub fn sample_with<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<String> {
        let mut shuffled = self.zips.clone();
        shuffled.shuffle(rng);
        shuffled.truncate(n);
        shuffled
    }
}

// ── Tests ───────────────────────────────────────────────────────────
