mod common;

use chrono::Utc;
use chrono_tz::Europe::Prague;
use pretty_assertions::assert_eq;
use sesplan_core::availability::grid::GridIndex;
use sesplan_core::availability::selection::{SelectionIntent, SelectionState};

use common::{availability, cell, date, slot, time};

const ME: i64 = 1;
const OTHER: i64 = 2;

#[test]
fn test_one_hour_slot_populates_exactly_two_cells() {
    let slots = vec![slot(10, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z")];

    let grid = GridIndex::build(&slots, &[], ME, Utc);

    let row = &grid.slot_map()[&date(2024, 5, 1)];
    assert_eq!(row.keys().copied().collect::<Vec<_>>(), vec![time(9, 0), time(9, 30)]);
    assert!(row.values().all(|id| *id == 10));
    assert_eq!(grid.slot_map().len(), 1);

    assert!(grid.is_active_cell(date(2024, 5, 1), time(9, 30)));
    assert!(!grid.is_active_cell(date(2024, 5, 1), time(10, 0)));
    assert!(!grid.is_active_cell(date(2024, 5, 1), time(8, 30)));
    assert_eq!(grid.slot_id(date(2024, 5, 1), time(9, 0)), Some(10));
    assert_eq!(grid.slot_id(date(2024, 5, 2), time(9, 0)), None);
}

#[test]
fn test_full_window_availability_marks_only_that_slot() {
    let slots = vec![
        slot(10, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z"),
        slot(11, "2024-05-01T10:00:00Z", "2024-05-01T11:00:00Z"),
    ];
    let avails = vec![availability(100, ME, "me", 10, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z")];

    let grid = GridIndex::build(&slots, &avails, ME, Utc);

    let mine = &grid.user_availability_map()[&date(2024, 5, 1)];
    assert_eq!(mine.len(), 2);
    for t in [time(9, 0), time(9, 30)] {
        assert_eq!(mine[&t].iter().copied().collect::<Vec<_>>(), vec![10]);
        assert!(grid.is_user_available(date(2024, 5, 1), t, ME));
    }
    for t in [time(10, 0), time(10, 30)] {
        assert!(!grid.is_user_available(date(2024, 5, 1), t, ME));
    }
}

#[test]
fn test_users_are_deduplicated_per_cell() {
    let slots = vec![slot(10, "2024-05-01T09:00:00Z", "2024-05-01T11:00:00Z")];
    let avails = vec![
        availability(100, OTHER, "bob", 10, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z"),
        availability(101, OTHER, "bob", 10, "2024-05-01T09:30:00Z", "2024-05-01T10:30:00Z"),
        availability(102, ME, "ada", 10, "2024-05-01T09:30:00Z", "2024-05-01T10:00:00Z"),
    ];

    let grid = GridIndex::build(&slots, &avails, ME, Utc);

    assert_eq!(grid.available_users_count(date(2024, 5, 1), time(9, 0)), 1);
    assert_eq!(grid.available_users_count(date(2024, 5, 1), time(9, 30)), 2);
    assert_eq!(grid.available_users_count(date(2024, 5, 1), time(10, 0)), 1);
    assert_eq!(grid.available_users_count(date(2024, 5, 1), time(10, 30)), 0);
    assert_eq!(grid.available_users_count(date(2024, 5, 1), time(12, 0)), 0);

    assert!(grid.is_user_available(date(2024, 5, 1), time(10, 0), OTHER));
    assert!(!grid.is_user_available(date(2024, 5, 1), time(10, 0), ME));
}

#[test]
fn test_tooltip_text() {
    let slots = vec![slot(10, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z")];
    let avails = vec![
        availability(100, ME, "ada", 10, "2024-05-01T09:00:00Z", "2024-05-01T09:30:00Z"),
        availability(101, OTHER, "bob", 10, "2024-05-01T09:00:00Z", "2024-05-01T09:30:00Z"),
    ];

    let grid = GridIndex::build(&slots, &avails, ME, Utc);

    assert_eq!(grid.tooltip_text(date(2024, 5, 1), time(9, 0)), "Available: ada, bob");
    assert_eq!(grid.tooltip_text(date(2024, 5, 1), time(9, 30)), "Nobody is available");
    assert_eq!(grid.tooltip_text(date(2024, 5, 1), time(8, 0)), "Outside of a defined slot");
}

#[test]
fn test_invalid_user_id_is_never_available() {
    let slots = vec![slot(10, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z")];
    let grid = GridIndex::build(&slots, &[], ME, Utc);

    assert!(!grid.is_user_available(date(2024, 5, 1), time(9, 0), 0));
    assert!(!grid.is_user_available(date(2024, 5, 1), time(9, 0), -3));
}

#[test_log::test]
fn test_malformed_rows_are_skipped() {
    let slots = vec![
        slot(10, "not-a-date", "2024-05-01T10:00:00Z"),
        slot(11, "2024-05-01T12:00:00Z", "2024-05-01T12:30:00Z"),
    ];
    let avails = vec![
        availability(100, ME, "ada", 11, "2024-05-01T12:00:00Z", "garbage"),
        availability(101, OTHER, "bob", 11, "2024-05-01T12:00:00Z", "2024-05-01T12:30:00Z"),
    ];

    let grid = GridIndex::build(&slots, &avails, ME, Utc);

    assert_eq!(grid.slot_map()[&date(2024, 5, 1)].len(), 1);
    assert_eq!(grid.available_users_count(date(2024, 5, 1), time(12, 0)), 1);
    assert!(grid.user_availability_map().is_empty());
}

#[test]
fn test_cells_use_local_wall_clock() {
    // 16:00Z is 18:00 in Prague during summer time.
    let slots = vec![slot(10, "2024-05-01T16:00:00Z", "2024-05-01T17:00:00Z")];

    let grid = GridIndex::build(&slots, &[], ME, Prague);

    assert!(grid.is_active_cell(date(2024, 5, 1), time(18, 0)));
    assert!(grid.is_active_cell(date(2024, 5, 1), time(18, 30)));
    assert!(!grid.is_active_cell(date(2024, 5, 1), time(16, 0)));
}

#[test]
fn test_slot_crossing_midnight_spans_two_days() {
    let slots = vec![slot(10, "2024-05-01T23:00:00Z", "2024-05-02T01:00:00Z")];

    let grid = GridIndex::build(&slots, &[], ME, Utc);

    assert!(grid.is_active_cell(date(2024, 5, 1), time(23, 30)));
    assert!(grid.is_active_cell(date(2024, 5, 2), time(0, 30)));
    assert_eq!(grid.dates(), vec![date(2024, 5, 1), date(2024, 5, 2)]);

    // Rows reach from the early morning of the second day to the late evening of the first.
    let times = grid.time_slots();
    assert_eq!(times.len(), 48);
    assert_eq!(times[0], time(0, 0));
    assert_eq!(times[47], time(23, 30));

    // Every active cell has a place in the grid.
    for (day, row) in grid.slot_map() {
        assert!(grid.dates().contains(day));
        for t in row.keys() {
            assert!(times.contains(t));
        }
    }
}

#[test]
fn test_cells_after_midnight_are_selectable() {
    let slots = vec![slot(10, "2024-05-01T23:00:00Z", "2024-05-02T01:00:00Z")];
    let grid = GridIndex::build(&slots, &[], ME, Utc);
    let dates = grid.dates();

    let from = cell("2024-05-02-00:00");
    let to = cell("2024-05-02-00:30");
    let mut state = SelectionState::new();
    state.start(from, SelectionIntent::Add, &grid);

    assert!(state.update(from, to, &dates, grid.time_slots(), &grid).is_ok());
    assert_eq!(state.cells().len(), 2);
    assert_eq!(state.slot_id(), Some(10));
}

#[test]
fn test_rows_spanning_too_long_are_skipped() {
    let slots = vec![
        slot(10, "2024-05-01T18:00:00Z", "2024-05-01T19:00:00Z"),
        slot(11, "2024-05-01T18:00:00Z", "2026-05-01T18:00:00Z"),
    ];
    let availabilities = vec![availability(
        1,
        OTHER,
        "bob",
        10,
        "2024-05-01T18:00:00Z",
        "2025-05-01T18:00:00Z",
    )];

    let grid = GridIndex::build(&slots, &availabilities, ME, Utc);

    assert_eq!(grid.dates(), vec![date(2024, 5, 1)]);
    assert_eq!(grid.slot_id(date(2024, 5, 1), time(18, 0)), Some(10));
    assert!(grid.availability_map().is_empty());
}

#[test]
fn test_days_and_time_slots() {
    let slots = vec![
        slot(11, "2024-05-03T17:00:00Z", "2024-05-03T19:30:00Z"),
        slot(10, "2024-05-01T16:00:00Z", "2024-05-01T18:00:00Z"),
        slot(12, "2024-05-01T19:00:00Z", "2024-05-01T20:00:00Z"),
    ];

    let grid = GridIndex::build(&slots, &[], ME, Utc);

    let days: Vec<_> = grid.days().iter().map(|d| (d.date, d.label.as_str())).collect();
    assert_eq!(
        days,
        vec![(date(2024, 5, 1), "Wed 1.5."), (date(2024, 5, 3), "Fri 3.5.")]
    );
    assert_eq!(grid.dates(), vec![date(2024, 5, 1), date(2024, 5, 3)]);

    // 16:00 up to 20:00 (19:30 rounds up to 20)
    let times = grid.time_slots();
    assert_eq!(times.len(), 8);
    assert_eq!(times[0], time(16, 0));
    assert_eq!(times[7], time(19, 30));
}

#[test]
fn test_default_time_range_without_slots() {
    let grid = GridIndex::build(&[], &[], ME, Utc);

    assert!(grid.days().is_empty());
    assert_eq!(grid.time_slots().len(), 28);
    assert_eq!(grid.time_slots()[0], time(8, 0));
    assert_eq!(grid.time_slots()[27], time(21, 30));
}
