//! # Availability Engine
//!
//! Everything between the slot/availability records fetched from the API and
//! the availability intervals sent back to it:
//!
//! - [`grid`]: indexes slots and availability records by local (date, time)
//!   cells at a fixed 30 minute granularity
//! - [`selection`]: tracks a rectangular drag selection over the grid
//! - [`coalesce`]: reduces selected cells to maximal `[start, end)` intervals
//! - [`slot_keys`]: the toggle-style selection keyed by `isoTimestamp_minutes`
//!
//! All structures are plain values rebuilt from their inputs; nothing here is
//! shared or mutated across tasks.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::SesplanError;

pub mod coalesce;
pub mod grid;
pub mod selection;
pub mod slot_keys;

/// Width of one grid cell in minutes.
pub const TIME_INCREMENT_MINUTES: i64 = 30;

/// Width of one grid cell.
pub fn time_increment() -> Duration {
    Duration::minutes(TIME_INCREMENT_MINUTES)
}

/// One (date, time-of-day) cell of the availability grid, in local wall-clock time.
///
/// Its string key is `yyyy-MM-dd-HH:mm`; the time is whatever follows the last `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl GridCell {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// Zero-padded `HH:mm`.
    pub fn time_label(&self) -> String {
        format_time(&self.time)
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.date.format("%Y-%m-%d"), format_time(&self.time))
    }
}

impl FromStr for GridCell {
    type Err = SesplanError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let (date, time) = key
            .rsplit_once('-')
            .ok_or_else(|| SesplanError::Parse(format!("invalid cell key {:?}", key)))?;

        let date = parse_date(date)?;
        let time = parse_time(time)?;
        Ok(Self { date, time })
    }
}

/// Read access to the grid that the selection tracker needs.
pub trait CellLookup {
    /// True when the cell falls inside some slot's window.
    fn is_active_cell(&self, date: NaiveDate, time: NaiveTime) -> bool;

    /// Id of the slot covering the cell, if any.
    fn slot_id(&self, date: NaiveDate, time: NaiveTime) -> Option<i64>;
}

pub fn format_time(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parses a `yyyy-MM-dd` date with three numeric components.
pub fn parse_date(value: &str) -> Result<NaiveDate, SesplanError> {
    if value.split('-').count() != 3 {
        return Err(SesplanError::Parse(format!("invalid date {:?}", value)));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| SesplanError::Parse(format!("invalid date {:?}: {}", value, e)))
}

/// Parses an `HH:mm` time of day.
pub fn parse_time(value: &str) -> Result<NaiveTime, SesplanError> {
    if value.split(':').count() != 2 {
        return Err(SesplanError::Parse(format!("invalid time {:?}", value)));
    }
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|e| SesplanError::Parse(format!("invalid time {:?}: {}", value, e)))
}
