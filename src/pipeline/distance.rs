use geo::{Distance, Geodesic, Point};

use crate::error::StoreError;
use crate::pipeline::group::group_by_identifier;
use crate::store::PositionStore;
use crate::types::fix::{DayWindow, Distances, Fix, TrackedId};

/// Distance flown during `day` by each id, in kilometers.
///
/// Every fix of the day counts, inside the region or not. One batched store
/// query serves all ids, so the call succeeds or fails as a whole. An id with
/// a single fix reports `0.0`; an id without fixes is absent.
pub async fn compute_distances(
    store: &dyn PositionStore,
    ids: &[TrackedId],
    day: &DayWindow,
) -> Result<Distances, StoreError> {
    if ids.is_empty() {
        return Ok(Distances::new());
    }

    let mut fixes = store.fixes_on_day(ids, day).await?;
    fixes.sort_by_key(|fix| fix.timestamp);

    Ok(group_by_identifier(fixes)
        .into_iter()
        .filter(|(address, _)| ids.contains(address))
        .map(|(address, path)| (address, path_length_km(&path)))
        .collect())
}

/// Sum of WGS84 geodesic segment lengths along `path`, in kilometers.
pub fn path_length_km(path: &[Fix]) -> f64 {
    let meters: f64 = path
        .windows(2)
        .map(|pair| {
            Geodesic::distance(
                Point::new(pair[0].lon, pair[0].lat),
                Point::new(pair[1].lon, pair[1].lat),
            )
        })
        .sum();
    meters / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use chrono::{DateTime, Duration, Utc};

    fn now() -> DateTime<Utc> {
        "2026-07-14T12:00:00Z".parse().expect("timestamp")
    }

    fn today() -> DayWindow {
        DayWindow::containing(now(), chrono_tz::UTC)
    }

    fn fix(address: &str, minutes_ago: i64, lon: f64, lat: f64) -> Fix {
        Fix {
            address: address.to_string(),
            altitude: Some(800.0),
            timestamp: (now() - Duration::minutes(minutes_ago)).timestamp(),
            lon,
            lat,
        }
    }

    #[test]
    fn single_fix_has_zero_length() {
        assert_eq!(path_length_km(&[fix("A", 1, 8.0, 50.0)]), 0.0);
        assert_eq!(path_length_km(&[]), 0.0);
    }

    #[test]
    fn matches_reference_geodesic_length() {
        // 0.1° north along the 8°E meridian, then 0.1° east along 50.1°N.
        // Reference value from Vincenty's inverse formula on WGS84.
        let path = vec![
            fix("A", 30, 8.0, 50.0),
            fix("A", 20, 8.0, 50.1),
            fix("A", 10, 8.1, 50.1),
        ];
        let km = path_length_km(&path);
        assert!((km - 18.277_695).abs() < 1e-5, "got {km}");
    }

    #[tokio::test]
    async fn uses_time_order_and_out_of_region_fixes() {
        let store = InMemoryStore::new();
        // inserted out of order; the Berlin fix is outside the region
        store.insert_fix(fix("A", 10, 8.1, 50.1));
        store.insert_fix(fix("A", 30, 8.0, 50.0));
        store.insert_fix(fix("A", 20, 8.0, 50.1));
        store.insert_fix(fix("B", 15, 13.4050, 52.5200));
        store.insert_fix(fix("B", 5, 8.6821, 50.1109));

        let ids = vec!["A".to_string(), "B".to_string()];
        let distances = compute_distances(&store, &ids, &today()).await.unwrap();

        assert!((distances["A"] - 18.277_695).abs() < 1e-5);
        // Berlin to Frankfurt is roughly 424 km
        assert!((distances["B"] - 424.0).abs() < 5.0, "got {}", distances["B"]);
    }

    #[tokio::test]
    async fn single_fix_reports_zero_and_missing_ids_are_absent() {
        let store = InMemoryStore::new();
        store.insert_fix(fix("ONE", 3, 8.6, 50.1));
        store.insert_fix(fix("OLD", 60 * 24, 8.6, 50.1));

        let ids = vec!["ONE".to_string(), "OLD".to_string(), "NONE".to_string()];
        let distances = compute_distances(&store, &ids, &today()).await.unwrap();

        assert_eq!(distances.len(), 1);
        assert_eq!(distances["ONE"], 0.0);
    }
}
