//! Reduces a set of fixed-width ticks to maximal contiguous intervals.
//!
//! Every caller quantizes its input to the grid increment first and then goes
//! through [`coalesce_ticks`], so the merge rule is the same everywhere: a tick
//! extends the open interval only when it starts exactly where that interval
//! ends.

use std::collections::BTreeMap;
use std::ops::Add;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::GridCell;

/// A half-open `[start, end)` interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval<T> {
    pub start: T,
    pub end: T,
}

/// The intervals produced for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayIntervals {
    pub date: NaiveDate,
    pub intervals: Vec<Interval<DateTime<Utc>>>,
}

/// Run-length encodes `ticks` of width `step` into maximal `[start, end)` ranges.
///
/// Duplicate ticks are ignored. The output is sorted, and no two intervals
/// overlap or touch.
pub fn coalesce_ticks<T, I>(ticks: I, step: Duration) -> Vec<Interval<T>>
where
    T: Ord + Copy + Add<Duration, Output = T>,
    I: IntoIterator<Item = T>,
{
    let mut ticks: Vec<T> = ticks.into_iter().collect();
    ticks.sort();
    ticks.dedup();

    let mut intervals = Vec::new();
    let mut open: Option<Interval<T>> = None;

    for tick in ticks {
        open = Some(match open {
            Some(mut current) if tick == current.end => {
                current.end = tick + step;
                current
            }
            Some(current) => {
                intervals.push(current);
                Interval { start: tick, end: tick + step }
            }
            None => Interval { start: tick, end: tick + step },
        });
    }

    if let Some(current) = open {
        intervals.push(current);
    }

    intervals
}

/// Groups grid cells by day and coalesces each day into UTC intervals.
///
/// Cells are local wall-clock times in `tz`. A time that is ambiguous (DST
/// fall-back) resolves to its earlier instant; a time that does not exist
/// (DST spring-forward) is skipped.
pub fn coalesce_cells<Tz, I>(cells: I, tz: &Tz, step: Duration) -> Vec<DayIntervals>
where
    Tz: TimeZone,
    I: IntoIterator<Item = GridCell>,
{
    let mut by_day: BTreeMap<NaiveDate, Vec<DateTime<Utc>>> = BTreeMap::new();

    for cell in cells {
        let local = cell.date.and_time(cell.time);
        let instant = match tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => {
                warn!("Skipping cell {} which does not exist in the grid timezone", cell);
                continue;
            }
        };
        by_day
            .entry(cell.date)
            .or_default()
            .push(instant.with_timezone(&Utc));
    }

    by_day
        .into_iter()
        .map(|(date, ticks)| DayIntervals {
            date,
            intervals: coalesce_ticks(ticks, step),
        })
        .collect()
}

/// Parses `yyyy-MM-dd-HH:mm` cell keys, logging and skipping malformed ones.
pub fn parse_cell_keys<'a, I>(keys: I) -> Vec<GridCell>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .filter_map(|key| match key.parse::<GridCell>() {
            Ok(cell) => Some(cell),
            Err(e) => {
                error!("Skipping cell key {:?}: {}", key, e);
                None
            }
        })
        .collect()
}
