//! # Slot Grid Indexer
//!
//! Builds lookups from local (date, time-of-day) cells to the slot covering the
//! cell and to the users available in it. The index is a pure function of the
//! slot list, the availability list, the acting user and the display timezone;
//! when any of them changes, build a new one.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use tracing::{debug, warn};

use super::{time_increment, CellLookup, TIME_INCREMENT_MINUTES};
use crate::models::{availability::UserAvailability, slot::SessionSlot, user::UserSimple};

/// date → time → slot id
pub type SlotMap = BTreeMap<NaiveDate, BTreeMap<NaiveTime, i64>>;
/// date → time → slot id → users available in that cell
pub type AvailabilityMap = BTreeMap<NaiveDate, BTreeMap<NaiveTime, HashMap<i64, Vec<UserSimple>>>>;
/// date → time → slots the acting user declared availability for
pub type UserAvailabilityMap = BTreeMap<NaiveDate, BTreeMap<NaiveTime, BTreeSet<i64>>>;

const DEFAULT_FIRST_HOUR: u32 = 8;
const DEFAULT_LAST_HOUR: u32 = 22;

/// Longest range a slot or availability row may span before it is rejected.
pub const MAX_SPAN_DAYS: i64 = 14;

/// A day column of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridDay {
    pub date: NaiveDate,
    /// Short label such as `Wed 1.5.`
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct GridIndex<Tz: TimeZone> {
    tz: Tz,
    acting_user_id: i64,
    slot_map: SlotMap,
    availability_map: AvailabilityMap,
    user_availability_map: UserAvailabilityMap,
    days: Vec<GridDay>,
    time_slots: Vec<NaiveTime>,
}

impl<Tz: TimeZone> GridIndex<Tz> {
    /// Indexes `slots` and `availabilities` as seen from `acting_user_id` in `tz`.
    ///
    /// Rows whose timestamps do not parse, or that span more than
    /// [`MAX_SPAN_DAYS`], are logged and contribute nothing.
    pub fn build(
        slots: &[SessionSlot],
        availabilities: &[UserAvailability],
        acting_user_id: i64,
        tz: Tz,
    ) -> Self {
        let windows: Vec<(i64, DateTime<Utc>, DateTime<Utc>)> = slots
            .iter()
            .filter_map(|slot| match slot.window() {
                Ok((from, to)) if within_span(from, to) => Some((slot.id, from, to)),
                Ok((from, to)) => {
                    warn!(
                        "Skipping slot {}: {} - {} is longer than {} days",
                        slot.id, from, to, MAX_SPAN_DAYS
                    );
                    None
                }
                Err(e) => {
                    warn!("Skipping slot {}: {}", slot.id, e);
                    None
                }
            })
            .collect();

        let slot_map = build_slot_map(&windows, &tz);
        let (availability_map, user_availability_map) =
            build_availability_maps(availabilities, acting_user_id, &tz);
        let days = build_days(&slot_map);
        let time_slots = build_time_slots(&slot_map);

        debug!(
            "Indexed {} slots and {} availability records for user {} ({} days)",
            windows.len(),
            availabilities.len(),
            acting_user_id,
            days.len()
        );

        Self {
            tz,
            acting_user_id,
            slot_map,
            availability_map,
            user_availability_map,
            days,
            time_slots,
        }
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    pub fn acting_user_id(&self) -> i64 {
        self.acting_user_id
    }

    pub fn slot_map(&self) -> &SlotMap {
        &self.slot_map
    }

    pub fn availability_map(&self) -> &AvailabilityMap {
        &self.availability_map
    }

    pub fn user_availability_map(&self) -> &UserAvailabilityMap {
        &self.user_availability_map
    }

    /// Days with at least one active cell, ascending.
    pub fn days(&self) -> &[GridDay] {
        &self.days
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.days.iter().map(|day| day.date).collect()
    }

    /// Row times of the grid, ascending.
    pub fn time_slots(&self) -> &[NaiveTime] {
        &self.time_slots
    }

    pub fn is_active_cell(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.slot_map
            .get(&date)
            .is_some_and(|row| row.contains_key(&time))
    }

    pub fn slot_id(&self, date: NaiveDate, time: NaiveTime) -> Option<i64> {
        self.slot_map.get(&date)?.get(&time).copied()
    }

    /// Whether `user_id` declared availability for the slot under the cell.
    pub fn is_user_available(&self, date: NaiveDate, time: NaiveTime, user_id: i64) -> bool {
        if user_id <= 0 {
            warn!("Invalid user id {} in availability lookup", user_id);
            return false;
        }

        let Some(slot_id) = self.slot_id(date, time) else {
            return false;
        };

        if user_id == self.acting_user_id {
            return self
                .user_availability_map
                .get(&date)
                .and_then(|row| row.get(&time))
                .is_some_and(|slots| slots.contains(&slot_id));
        }

        self.available_users(date, time)
            .iter()
            .any(|user| user.id == user_id)
    }

    /// Users available in the cell for the slot covering it.
    pub fn available_users(&self, date: NaiveDate, time: NaiveTime) -> &[UserSimple] {
        let Some(slot_id) = self.slot_id(date, time) else {
            return &[];
        };
        self.availability_map
            .get(&date)
            .and_then(|row| row.get(&time))
            .and_then(|by_slot| by_slot.get(&slot_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn available_users_count(&self, date: NaiveDate, time: NaiveTime) -> usize {
        self.available_users(date, time).len()
    }

    pub fn tooltip_text(&self, date: NaiveDate, time: NaiveTime) -> String {
        if self.slot_id(date, time).is_none() {
            return "Outside of a defined slot".to_string();
        }

        let users = self.available_users(date, time);
        if users.is_empty() {
            "Nobody is available".to_string()
        } else {
            let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
            format!("Available: {}", names.join(", "))
        }
    }
}

impl<Tz: TimeZone> CellLookup for GridIndex<Tz> {
    fn is_active_cell(&self, date: NaiveDate, time: NaiveTime) -> bool {
        GridIndex::is_active_cell(self, date, time)
    }

    fn slot_id(&self, date: NaiveDate, time: NaiveTime) -> Option<i64> {
        GridIndex::slot_id(self, date, time)
    }
}

/// Local cells `[from, to)` at the grid increment.
fn cells_between<Tz: TimeZone>(
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    tz: &Tz,
) -> impl Iterator<Item = (NaiveDate, NaiveTime)> + '_ {
    let step: Duration = time_increment();
    std::iter::successors(Some(from), move |cur| Some(*cur + step))
        .take_while(move |cur| *cur < to)
        .map(move |cur| {
            let local = cur.with_timezone(tz).naive_local();
            (local.date(), local.time())
        })
}

fn within_span(from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
    to - from <= Duration::days(MAX_SPAN_DAYS)
}

fn build_slot_map<Tz: TimeZone>(windows: &[(i64, DateTime<Utc>, DateTime<Utc>)], tz: &Tz) -> SlotMap {
    let mut slot_map = SlotMap::new();
    for &(slot_id, from, to) in windows {
        for (date, time) in cells_between(from, to, tz) {
            slot_map.entry(date).or_default().insert(time, slot_id);
        }
    }
    slot_map
}

fn build_availability_maps<Tz: TimeZone>(
    availabilities: &[UserAvailability],
    acting_user_id: i64,
    tz: &Tz,
) -> (AvailabilityMap, UserAvailabilityMap) {
    let mut all = AvailabilityMap::new();
    let mut mine = UserAvailabilityMap::new();

    for avail in availabilities {
        let (from, to) = match avail.window() {
            Ok((from, to)) if within_span(from, to) => (from, to),
            Ok((from, to)) => {
                warn!(
                    "Skipping availability {}: {} - {} is longer than {} days",
                    avail.id, from, to, MAX_SPAN_DAYS
                );
                continue;
            }
            Err(e) => {
                warn!("Skipping availability {}: {}", avail.id, e);
                continue;
            }
        };

        for (date, time) in cells_between(from, to, tz) {
            let users = all
                .entry(date)
                .or_default()
                .entry(time)
                .or_default()
                .entry(avail.slot_id)
                .or_default();
            if !users.iter().any(|u| u.id == avail.user.id) {
                users.push(avail.user.clone());
            }

            if avail.user_id == acting_user_id {
                mine.entry(date)
                    .or_default()
                    .entry(time)
                    .or_default()
                    .insert(avail.slot_id);
            }
        }
    }

    (all, mine)
}

fn build_days(slot_map: &SlotMap) -> Vec<GridDay> {
    slot_map
        .keys()
        .map(|date| GridDay {
            date: *date,
            label: date.format("%a %-d.%-m.").to_string(),
        })
        .collect()
}

/// Whole hours from the earliest to the latest active cell, so every active
/// cell has a row. A slot crossing midnight therefore widens the rows to
/// include the early morning of the following day.
fn build_time_slots(slot_map: &SlotMap) -> Vec<NaiveTime> {
    let mut bounds: Option<(u32, u32)> = None;
    for time in slot_map.values().flat_map(|row| row.keys()) {
        let hour = time.hour();
        bounds = Some(match bounds {
            Some((first, last)) => (first.min(hour), last.max(hour + 1)),
            None => (hour, hour + 1),
        });
    }
    let (first_hour, last_hour) = bounds.unwrap_or((DEFAULT_FIRST_HOUR, DEFAULT_LAST_HOUR));

    let minutes_per_row = TIME_INCREMENT_MINUTES as usize;
    (first_hour..last_hour)
        .flat_map(|hour| {
            (0..60)
                .step_by(minutes_per_row)
                .filter_map(move |minute| NaiveTime::from_hms_opt(hour, minute, 0))
        })
        .collect()
}
