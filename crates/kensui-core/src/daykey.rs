//! Calendar-day primitives.
//!
//! Quota and streak logic never compares raw timestamps. It goes
//! through exactly two operations: [`DayClock::day_key`] buckets an
//! instant into a calendar day, and [`DayKey::days_between`] counts
//! whole days between two buckets. The day boundary sits at one fixed
//! UTC offset, so a set logged at 23:50 and the quota check at 00:10
//! land on the days the user expects regardless of the host timezone.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

/// A calendar-day identifier, stable for the whole day.
///
/// Serialized as `YYYY-MM-DD`; the stats documents store it in that
/// form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Absolute number of calendar days separating two keys. The same
    /// day yields 0, adjacent days yield 1, in either direction.
    pub fn days_between(&self, other: &DayKey) -> u32 {
        (self.0 - other.0).num_days().unsigned_abs() as u32
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<NaiveDate>().map(DayKey)
    }
}

/// Converts instants into day keys at one fixed reference offset.
///
/// The offset is configuration, not the host timezone: every device an
/// account uses must agree on where the day flips or streaks drift.
#[derive(Debug, Clone, Copy)]
pub struct DayClock {
    offset: FixedOffset,
}

impl DayClock {
    /// A clock whose day boundary sits at the given UTC offset in
    /// hours. Out-of-range offsets fall back to UTC.
    pub fn from_offset_hours(hours: i32) -> Self {
        let offset = FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    /// A clock with its day boundary at midnight UTC.
    pub fn utc() -> Self {
        Self::from_offset_hours(0)
    }

    /// Bucket an instant into its calendar day.
    pub fn day_key(&self, instant: DateTime<Utc>) -> DayKey {
        DayKey(instant.with_timezone(&self.offset).date_naive())
    }

    /// The key for the current instant.
    pub fn today(&self) -> DayKey {
        self.day_key(Utc::now())
    }
}

impl Default for DayClock {
    fn default() -> Self {
        Self::utc()
    }
}
