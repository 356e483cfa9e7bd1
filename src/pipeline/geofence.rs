use std::collections::BTreeSet;

use crate::error::StoreError;
use crate::store::PositionStore;
use crate::types::fix::{DayWindow, Fix, TrackedId};
use crate::types::region::Region;

/// All of `day`'s fixes for `ids` inside `region`, oldest first.
pub async fn fetch_today_fixes_in_region(
    store: &dyn PositionStore,
    ids: &BTreeSet<TrackedId>,
    day: &DayWindow,
    region: &Region,
) -> Result<Vec<Fix>, StoreError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let requested: Vec<TrackedId> = ids.iter().cloned().collect();
    let mut fixes = store.fixes_in_region(&requested, day, region).await?;
    // stable: equal timestamps keep store order
    fixes.sort_by_key(|fix| fix.timestamp);
    Ok(fixes)
}
