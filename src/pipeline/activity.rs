use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::store::PositionStore;
use crate::types::fix::TrackedId;

/// Keeps the ids whose latest sighting is strictly newer than `now - freshness`.
pub async fn filter_active(
    store: &dyn PositionStore,
    ids: &BTreeSet<TrackedId>,
    now: DateTime<Utc>,
    freshness: Duration,
) -> Result<BTreeSet<TrackedId>, StoreError> {
    if ids.is_empty() {
        return Ok(BTreeSet::new());
    }

    let requested: Vec<TrackedId> = ids.iter().cloned().collect();
    let records = store.last_seen(&requested).await?;

    Ok(records
        .into_iter()
        .filter(|record| ids.contains(&record.address))
        .filter(|record| is_active(record.last_seen, now, freshness))
        .map(|record| record.address)
        .collect())
}

pub fn is_active(last_seen: DateTime<Utc>, now: DateTime<Utc>, freshness: Duration) -> bool {
    match (now - last_seen).to_std() {
        Ok(age) => age < freshness,
        // sighting stamped after `now`
        Err(_) => true,
    }
}
