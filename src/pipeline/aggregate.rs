use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::error::{AggregateError, StoreError};
use crate::pipeline::{activity, distance, geofence, group};
use crate::store::PositionStore;
use crate::types::fix::{DayWindow, FlightSummary, TrackedId};

/// Runs the whole query chain for one request under `config.query_timeout`.
///
/// Steps run one after another, each feeding the next: active ids, today's
/// in-region fixes, per-id paths, then full-day distances for the ids that
/// produced a path. The first failing step aborts the request.
pub async fn aggregate(
    store: &dyn PositionStore,
    config: &Config,
    ids: &BTreeSet<TrackedId>,
    now: DateTime<Utc>,
) -> Result<FlightSummary, AggregateError> {
    tokio::time::timeout(config.query_timeout, run(store, config, ids, now))
        .await
        .map_err(|_| AggregateError::Timeout(config.query_timeout))?
        .map_err(AggregateError::from)
}

async fn run(
    store: &dyn PositionStore,
    config: &Config,
    ids: &BTreeSet<TrackedId>,
    now: DateTime<Utc>,
) -> Result<FlightSummary, StoreError> {
    let day = DayWindow::containing(now, config.day_time_zone);

    let active = activity::filter_active(store, ids, now, config.inactive_after).await?;
    tracing::debug!("Recently seen: {:?}", active);

    let fixes = geofence::fetch_today_fixes_in_region(store, &active, &day, &config.region).await?;
    let tracks = group::group_by_identifier(fixes);

    let tracked: Vec<TrackedId> = tracks.keys().cloned().collect();
    let distances = distance::compute_distances(store, &tracked, &day).await?;

    Ok(FlightSummary { tracks, distances })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::types::fix::Fix;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        "2026-07-14T12:00:00Z".parse().expect("timestamp")
    }

    fn fix(address: &str, minutes_ago: i64, lon: f64, lat: f64) -> Fix {
        Fix {
            address: address.to_string(),
            altitude: Some(950.0),
            timestamp: (now() - Duration::minutes(minutes_ago)).timestamp(),
            lon,
            lat,
        }
    }

    fn set(ids: &[&str]) -> BTreeSet<TrackedId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.record_sighting("A", now() - Duration::minutes(5));
        store.insert_fix(fix("A", 40, 8.0, 50.0));
        store.insert_fix(fix("A", 20, 8.0, 50.1));

        store.record_sighting("B", now() - Duration::hours(2));
        store.insert_fix(fix("B", 130, 8.3, 50.3));

        // active but only seen outside the region today
        store.record_sighting("C", now() - Duration::minutes(1));
        store.insert_fix(fix("C", 3, 13.4050, 52.5200));
        store
    }

    #[tokio::test]
    async fn only_active_ids_with_in_region_fixes_appear() {
        let store = seeded();
        let summary = aggregate(&store, &Config::default(), &set(&["A", "B", "C"]), now())
            .await
            .unwrap();

        assert_eq!(summary.tracks.keys().collect::<Vec<_>>(), vec!["A"]);
        assert_eq!(summary.tracks["A"].len(), 2);
        assert_eq!(summary.distances.keys().collect::<Vec<_>>(), vec!["A"]);
        assert!((summary.distances["A"] - 11.123_003).abs() < 1e-5);
    }

    #[tokio::test]
    async fn empty_request_is_empty_summary() {
        let store = seeded();
        let summary = aggregate(&store, &Config::default(), &BTreeSet::new(), now())
            .await
            .unwrap();
        assert_eq!(summary, FlightSummary::default());
    }
}
