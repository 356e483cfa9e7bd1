use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::PositionStore;
use crate::error::StoreError;
use crate::types::fix::{ActivityRecord, DayWindow, Fix, TrackedId};
use crate::types::region::Region;

/// Position store held entirely in process memory, keyed by address.
///
/// Sightings and fixes are kept apart the same way the database keeps
/// `senders` and `sender_positions` apart: a sighting can exist without any
/// stored fix.
#[derive(Default)]
pub struct InMemoryStore {
    sightings: DashMap<TrackedId, DateTime<Utc>>,
    fixes: DashMap<TrackedId, Vec<Fix>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a sighting; only the latest one per address is kept.
    pub fn record_sighting(&self, address: impl Into<TrackedId>, last_seen: DateTime<Utc>) {
        self.sightings
            .entry(address.into())
            .and_modify(|latest| {
                if *latest < last_seen {
                    *latest = last_seen;
                }
            })
            .or_insert(last_seen);
    }

    pub fn insert_fix(&self, fix: Fix) {
        self.fixes.entry(fix.address.clone()).or_default().push(fix);
    }

    /// `day`'s fixes for `ids` passing `keep`, oldest first.
    fn day_fixes(
        &self,
        ids: &[TrackedId],
        day: &DayWindow,
        keep: impl Fn(&Fix) -> bool,
    ) -> Vec<Fix> {
        let unique: BTreeSet<&TrackedId> = ids.iter().collect();
        let mut fixes = Vec::new();
        for id in unique {
            if let Some(path) = self.fixes.get(id) {
                fixes.extend(
                    path.iter()
                        .filter(|fix| day.contains(fix.timestamp) && keep(fix))
                        .cloned(),
                );
            }
        }
        fixes.sort_by_key(|fix| fix.timestamp);
        fixes
    }
}

#[async_trait]
impl PositionStore for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn last_seen(&self, ids: &[TrackedId]) -> Result<Vec<ActivityRecord>, StoreError> {
        let unique: BTreeSet<&TrackedId> = ids.iter().collect();
        Ok(unique
            .into_iter()
            .filter_map(|id| {
                self.sightings.get(id).map(|last_seen| ActivityRecord {
                    address: id.clone(),
                    last_seen: *last_seen,
                })
            })
            .collect())
    }

    async fn fixes_in_region(
        &self,
        ids: &[TrackedId],
        day: &DayWindow,
        region: &Region,
    ) -> Result<Vec<Fix>, StoreError> {
        Ok(self.day_fixes(ids, day, |fix| region.covers(fix.lon, fix.lat)))
    }

    async fn fixes_on_day(
        &self,
        ids: &[TrackedId],
        day: &DayWindow,
    ) -> Result<Vec<Fix>, StoreError> {
        Ok(self.day_fixes(ids, day, |_| true))
    }
}
