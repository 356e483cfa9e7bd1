use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub type TrackedId = String;

/// One position report of a tracked object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub address: TrackedId,
    /// Meters; `None` when the receiver reported no altitude.
    pub altitude: Option<f64>,
    /// Seconds since the unix epoch.
    pub timestamp: i64,
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    pub address: TrackedId,
    pub last_seen: DateTime<Utc>,
}

pub type Tracks = BTreeMap<TrackedId, Vec<Fix>>;
pub type Distances = BTreeMap<TrackedId, f64>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlightSummary {
    pub tracks: Tracks,
    pub distances: Distances,
}

/// Half-open `[start, end)` interval covering one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// The calendar day `now` falls on in `tz`. Days around a daylight-saving
    /// switch are 23 or 25 hours long.
    pub fn containing(now: DateTime<Utc>, tz: Tz) -> Self {
        let date = now.with_timezone(&tz).date_naive();
        let start = start_of_day(tz, date);
        let end = date
            .succ_opt()
            .map(|next| start_of_day(tz, next))
            .unwrap_or_else(|| start + Duration::days(1));
        Self { start, end }
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.start.timestamp() <= timestamp && timestamp < self.end.timestamp()
    }
}

/// First instant of `date` in `tz`. Where local midnight falls into a
/// daylight-saving gap the day starts at the first existing local hour.
fn start_of_day(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..24)
        .map(|hour| midnight + Duration::hours(hour))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}
