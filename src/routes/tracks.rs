use std::collections::BTreeSet;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::auth::ApiKey;
use crate::error::AppError;
use crate::pipeline::aggregate::aggregate;
use crate::state::AppState;
use crate::types::fix::{FlightSummary, TrackedId};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/flarm/:ids", get(flarm_tracks))
}

async fn flarm_tracks(
    _key: ApiKey,
    State(state): State<AppState>,
    Path(raw_ids): Path<String>,
) -> Result<Json<FlightSummary>, AppError> {
    let started = Instant::now();
    let request_id = Uuid::new_v4();

    let ids = parse_ids(&raw_ids);
    if ids.is_empty() {
        return Err(AppError::BadRequest(
            "Expected a comma-separated list of ids".to_string(),
        ));
    }

    let now = state.now();
    tracing::info!(%request_id, "ids: {:?} at {}", ids, now.to_rfc3339());

    let summary = aggregate(state.store.as_ref(), &state.config, &ids, now)
        .instrument(tracing::info_span!("request", %request_id))
        .await
        .map_err(|err| {
            tracing::error!(%request_id, "Position retrieval failed: {}", err);
            AppError::from(err)
        })?;

    tracing::info!(
        %request_id,
        "Execution time: {:.2?} ({} of {} ids tracked)",
        started.elapsed(),
        summary.tracks.len(),
        ids.len()
    );

    Ok(Json(summary))
}

/// Splits the path segment on commas. Blank entries are dropped and
/// duplicates collapse.
pub fn parse_ids(raw: &str) -> BTreeSet<TrackedId> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ids_trims_and_dedups() {
        let ids = parse_ids("DD1234, 3E5F21,,DD1234 ");
        assert_eq!(
            ids.into_iter().collect::<Vec<_>>(),
            vec!["3E5F21".to_string(), "DD1234".to_string()]
        );
    }

    #[test]
    fn parse_ids_of_only_separators_is_empty() {
        assert!(parse_ids(" , ,").is_empty());
    }
}
