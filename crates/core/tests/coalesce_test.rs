mod common;

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Europe::Prague;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sesplan_core::availability::{
    coalesce::{coalesce_cells, coalesce_ticks, parse_cell_keys, Interval},
    time_increment,
};

use common::{cell, date};

fn at(time: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("2024-05-01 {}", time), "%Y-%m-%d %H:%M").unwrap()
}

fn utc(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, h, m, 0).unwrap()
}

#[test]
fn test_contiguous_ticks_and_a_gap() {
    let ticks = ["10:00", "10:30", "11:00", "12:00"].map(at);

    let intervals = coalesce_ticks(ticks, time_increment());

    assert_eq!(
        intervals,
        vec![
            Interval { start: at("10:00"), end: at("11:30") },
            Interval { start: at("12:00"), end: at("12:30") },
        ]
    );
}

#[rstest]
#[case(vec!["09:00", "10:00", "11:00"])]
#[case(vec!["08:00", "13:30"])]
#[case(vec!["00:00", "01:00", "02:00", "23:00"])]
fn test_isolated_ticks_yield_one_interval_each(#[case] times: Vec<&str>) {
    let ticks: Vec<_> = times.iter().copied().map(at).collect();

    let intervals = coalesce_ticks(ticks.clone(), time_increment());

    assert_eq!(intervals.len(), ticks.len());
    for (interval, tick) in intervals.iter().zip(&ticks) {
        assert_eq!(interval.start, *tick);
        assert_eq!(interval.end, *tick + time_increment());
    }
}

#[test]
fn test_full_run_is_one_interval() {
    let start = at("08:00");
    let ticks: Vec<_> = (0..12).map(|i| start + time_increment() * i).collect();

    let intervals = coalesce_ticks(ticks, time_increment());

    assert_eq!(intervals, vec![Interval { start, end: at("14:00") }]);
}

#[test]
fn test_one_missing_tick_splits_the_run() {
    let intervals = coalesce_ticks([at("10:00"), at("11:00")], time_increment());

    assert_eq!(
        intervals,
        vec![
            Interval { start: at("10:00"), end: at("10:30") },
            Interval { start: at("11:00"), end: at("11:30") },
        ]
    );
}

#[test]
fn test_unsorted_input_is_sorted_first() {
    let intervals = coalesce_ticks([at("11:00"), at("10:00"), at("10:30")], time_increment());

    assert_eq!(intervals, vec![Interval { start: at("10:00"), end: at("11:30") }]);
}

#[test]
fn test_coalescing_is_idempotent() {
    let first = coalesce_ticks(
        ["09:00", "09:30", "10:30", "11:00", "11:30", "15:00"].map(at),
        time_increment(),
    );

    let ticks = first.iter().flat_map(|interval| {
        let mut ticks = Vec::new();
        let mut cur = interval.start;
        while cur < interval.end {
            ticks.push(cur);
            cur += time_increment();
        }
        ticks
    });
    let second = coalesce_ticks(ticks, time_increment());

    assert_eq!(first, second);
}

#[test]
fn test_only_exact_boundaries_merge() {
    let step = Duration::minutes(30);
    // 10:40 overlaps [10:30, 11:00) but does not start at its end.
    let intervals = coalesce_ticks([at("10:30"), at("10:40")], step);

    assert_eq!(intervals.len(), 2);
}

#[test]
fn test_cells_grouped_by_day_in_utc() {
    let cells = [
        cell("2024-05-02-18:00"),
        cell("2024-05-01-18:00"),
        cell("2024-05-01-18:30"),
        cell("2024-05-01-20:00"),
    ];

    let days = coalesce_cells(cells, &Utc, time_increment());

    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date, date(2024, 5, 1));
    assert_eq!(
        days[0].intervals,
        vec![
            Interval { start: utc(18, 0), end: utc(19, 0) },
            Interval { start: utc(20, 0), end: utc(20, 30) },
        ]
    );
    assert_eq!(days[1].date, date(2024, 5, 2));
    assert_eq!(days[1].intervals.len(), 1);
}

#[test]
fn test_cells_are_converted_from_local_time() {
    // Prague is UTC+2 in May.
    let days = coalesce_cells(
        [cell("2024-05-01-18:00"), cell("2024-05-01-18:30")],
        &Prague,
        time_increment(),
    );

    assert_eq!(days[0].intervals, vec![Interval { start: utc(16, 0), end: utc(17, 0) }]);
}

#[test]
fn test_nonexistent_local_time_is_skipped() {
    // 2024-03-31 02:00-03:00 does not exist in Prague.
    let days = coalesce_cells(
        [cell("2024-03-31-02:00"), cell("2024-03-31-03:00")],
        &Prague,
        time_increment(),
    );

    assert_eq!(days.len(), 1);
    assert_eq!(days[0].intervals.len(), 1);
}

#[test_log::test]
fn test_malformed_cell_keys_are_skipped() {
    let cells = parse_cell_keys(["2024-05-01-18:00", "garbage", "2024-05-01-xx:00", "2024-05-01-18:30"]);

    assert_eq!(cells, vec![cell("2024-05-01-18:00"), cell("2024-05-01-18:30")]);
}
