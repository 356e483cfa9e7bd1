//! Read access to recorded positions.
//!
//! The service never writes: a separate ingestion process fills the
//! `senders` and `sender_positions` tables. [`PgStore`] queries those tables
//! through PostGIS, [`InMemoryStore`] answers the same questions from memory.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::fix::{ActivityRecord, DayWindow, Fix, TrackedId};
use crate::types::region::Region;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait PositionStore: Send + Sync {
    /// Short backend name for diagnostics.
    fn backend(&self) -> &'static str;

    /// Most recent sighting per address. Addresses without any record are omitted.
    async fn last_seen(&self, ids: &[TrackedId]) -> Result<Vec<ActivityRecord>, StoreError>;

    /// Fixes inside `day` whose point is covered by `region`, oldest first.
    async fn fixes_in_region(
        &self,
        ids: &[TrackedId],
        day: &DayWindow,
        region: &Region,
    ) -> Result<Vec<Fix>, StoreError>;

    /// Every fix inside `day` regardless of location, oldest first.
    async fn fixes_on_day(&self, ids: &[TrackedId], day: &DayWindow)
        -> Result<Vec<Fix>, StoreError>;
}
