use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use super::PositionStore;
use crate::error::StoreError;
use crate::types::fix::{ActivityRecord, DayWindow, Fix, TrackedId};
use crate::types::region::{Region, REGION_SRID};

// Timestamps are truncated to whole seconds, so flooring keeps the time order.
const FIX_COLUMNS: &str = r#"
    address,
    altitude::float8 AS altitude,
    FLOOR(EXTRACT(EPOCH FROM "timestamp"))::bigint AS ts,
    ST_X(location)::float8 AS lon,
    ST_Y(location)::float8 AS lat
"#;

/// PostGIS-backed position store.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds a lazily connecting pool; the first query opens the connection.
    pub fn connect_lazy(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_lazy(database_url)?;
        Ok(Self::new(pool))
    }
}

fn fix_from_row(row: &PgRow) -> Result<Fix, sqlx::Error> {
    Ok(Fix {
        address: row.try_get("address")?,
        altitude: row.try_get("altitude")?,
        timestamp: row.try_get("ts")?,
        lon: row.try_get("lon")?,
        lat: row.try_get("lat")?,
    })
}

#[async_trait]
impl PositionStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn last_seen(&self, ids: &[TrackedId]) -> Result<Vec<ActivityRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT address, MAX(lastseen)::timestamptz AS last_seen
            FROM senders
            WHERE address = ANY($1)
            GROUP BY address
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let last_seen: Option<DateTime<Utc>> = row.try_get("last_seen")?;
            if let Some(last_seen) = last_seen {
                records.push(ActivityRecord {
                    address: row.try_get("address")?,
                    last_seen,
                });
            }
        }
        Ok(records)
    }

    async fn fixes_in_region(
        &self,
        ids: &[TrackedId],
        day: &DayWindow,
        region: &Region,
    ) -> Result<Vec<Fix>, StoreError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM sender_positions
            WHERE "timestamp" >= $2 AND "timestamp" < $3
              AND address = ANY($1)
              AND ST_Covers(ST_GeomFromText($4, $5), location)
            ORDER BY "timestamp" ASC
            "#,
            FIX_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(ids)
            .bind(day.start)
            .bind(day.end)
            .bind(region.to_wkt())
            .bind(REGION_SRID)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(fix_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    async fn fixes_on_day(
        &self,
        ids: &[TrackedId],
        day: &DayWindow,
    ) -> Result<Vec<Fix>, StoreError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM sender_positions
            WHERE "timestamp" >= $2 AND "timestamp" < $3
              AND address = ANY($1)
            ORDER BY "timestamp" ASC
            "#,
            FIX_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(ids)
            .bind(day.start)
            .bind(day.end)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(fix_from_row).collect::<Result<Vec<_>, _>>()?)
    }
}
