//! Toggle-style selection over session-wide availability.
//!
//! Cells are identified by slot keys of the form `isoTimestamp_minutesOfDay`,
//! e.g. `2024-05-01T16:00:00Z_1080`: the UTC instant the cell starts at, and
//! the cell's local minutes since midnight. Dragging toggles every cell the
//! pointer passes over.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, TimeZone, Timelike, Utc};
use tracing::{debug, error, warn};

use super::coalesce::{coalesce_ticks, Interval};
use crate::errors::{SesplanError, SesplanResult};
use crate::models::availability::{Availability, AvailabilityWindow};
use crate::models::parse_timestamp;

/// Builds the key for the cell starting `minutes` after local midnight of `day`.
pub fn slot_key<Tz: TimeZone>(day: NaiveDate, minutes: u32, tz: &Tz) -> Option<String> {
    let start = local_cell_start(day, minutes, tz)?;
    Some(format!("{}_{}", start.format("%Y-%m-%dT%H:%M:%SZ"), minutes))
}

/// Splits a slot key into the cell's start instant and its minutes of day.
pub fn parse_slot_key(key: &str) -> SesplanResult<(DateTime<Utc>, u32)> {
    let (timestamp, minutes) = key
        .split_once('_')
        .filter(|(_, rest)| !rest.contains('_'))
        .ok_or_else(|| SesplanError::Parse(format!("invalid slot key {:?}", key)))?;

    let start = parse_timestamp(timestamp)?;
    let minutes = minutes
        .parse::<u32>()
        .map_err(|e| SesplanError::Parse(format!("invalid minutes in slot key {:?}: {}", key, e)))?;
    Ok((start, minutes))
}

/// Coalesces slot keys into maximal intervals, skipping malformed keys.
pub fn coalesce_slot_keys<'a, I>(keys: I, step: Duration) -> Vec<Interval<DateTime<Utc>>>
where
    I: IntoIterator<Item = &'a str>,
{
    let ticks = keys.into_iter().filter_map(|key| match parse_slot_key(key) {
        Ok((start, _)) => Some(start),
        Err(e) => {
            error!("Skipping slot key: {}", e);
            None
        }
    });
    coalesce_ticks(ticks, step)
}

fn local_cell_start<Tz: TimeZone>(day: NaiveDate, minutes: u32, tz: &Tz) -> Option<DateTime<Utc>> {
    let local = day.and_hms_opt(0, 0, 0)? + Duration::minutes(i64::from(minutes));
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// Start of the earliest cell of `day` that exists locally. Midnight itself
/// is missing in zones that switch to summer time at 00:00.
fn first_cell_of_day<Tz: TimeZone>(day: NaiveDate, step: Duration, tz: &Tz) -> Option<DateTime<Utc>> {
    let step_minutes = usize::try_from(step.num_minutes()).ok().filter(|m| *m > 0)?;
    (0..24 * 60)
        .step_by(step_minutes)
        .find_map(|minutes| local_cell_start(day, minutes, tz))
}

#[derive(Debug, Clone)]
pub struct SlotKeySelection<Tz: TimeZone> {
    tz: Tz,
    step: Duration,
    drag_origin: Option<(NaiveDate, u32)>,
    selected: BTreeSet<String>,
}

impl<Tz: TimeZone> SlotKeySelection<Tz> {
    pub fn new(tz: Tz, step: Duration) -> Self {
        Self {
            tz,
            step,
            drag_origin: None,
            selected: BTreeSet::new(),
        }
    }

    /// Seeds the selection from the user's saved availability.
    pub fn from_availabilities(tz: Tz, step: Duration, availabilities: &[Availability]) -> Self {
        let mut selection = Self::new(tz, step);
        selection.sync_with(availabilities);
        selection
    }

    pub fn is_selecting(&self) -> bool {
        self.drag_origin.is_some()
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, day: NaiveDate, minutes: u32) -> bool {
        slot_key(day, minutes, &self.tz).is_some_and(|key| self.selected.contains(&key))
    }

    /// Starts a drag and toggles the first cell.
    pub fn start(&mut self, day: NaiveDate, minutes: u32) {
        self.drag_origin = Some((day, minutes));
        self.toggle(day, minutes);
    }

    /// Toggles a cell the pointer moved over; ignored outside a drag.
    pub fn drag_over(&mut self, day: NaiveDate, minutes: u32) {
        if self.is_selecting() {
            self.toggle(day, minutes);
        }
    }

    pub fn end(&mut self) {
        self.drag_origin = None;
    }

    pub fn toggle(&mut self, day: NaiveDate, minutes: u32) {
        let Some(key) = slot_key(day, minutes, &self.tz) else {
            warn!("Cell {} +{}min does not exist in the selection timezone", day, minutes);
            return;
        };
        if !self.selected.remove(&key) {
            self.selected.insert(key);
        }
    }

    /// Forgets the local selection; nothing is sent to the server.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Replaces the selection with every cell whose start lies inside one of
    /// the availability ranges.
    pub fn sync_with(&mut self, availabilities: &[Availability]) {
        let mut selected = BTreeSet::new();

        for avail in availabilities {
            let (from, to) = match avail.window() {
                Ok(window) => window,
                Err(e) => {
                    error!("Skipping availability {}: {}", avail.id, e);
                    continue;
                }
            };

            let first_day = from.with_timezone(&self.tz).date_naive();
            let Some(mut cursor) = first_cell_of_day(first_day, self.step, &self.tz) else {
                warn!(
                    "Skipping availability {}: no cell of {} exists in the selection timezone",
                    avail.id, first_day
                );
                continue;
            };
            while cursor < to {
                if cursor >= from {
                    let local = cursor.with_timezone(&self.tz).naive_local();
                    let minutes = local.hour() * 60 + local.minute();
                    selected.insert(format!("{}_{}", cursor.format("%Y-%m-%dT%H:%M:%SZ"), minutes));
                }
                cursor += self.step;
            }
        }

        debug!("Synced {} cells from {} availability records", selected.len(), availabilities.len());
        self.selected = selected;
    }

    /// Contiguous blocks of the selection, ready to save.
    pub fn blocks(&self) -> Vec<AvailabilityWindow> {
        coalesce_slot_keys(self.selected.iter().map(String::as_str), self.step)
            .into_iter()
            .map(|interval| AvailabilityWindow::new(interval.start, interval.end))
            .collect()
    }
}
