#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use sesplan_core::availability::GridCell;
use sesplan_core::models::{availability::UserAvailability, slot::SessionSlot, user::UserSimple};

pub fn slot(id: i64, from: &str, to: &str) -> SessionSlot {
    SessionSlot {
        id,
        session_id: 1,
        slot_from: from.to_string(),
        slot_to: to.to_string(),
        note: None,
        created_at: None,
        updated_at: None,
        user_availabilities: Vec::new(),
    }
}

pub fn availability(id: i64, user_id: i64, username: &str, slot_id: i64, from: &str, to: &str) -> UserAvailability {
    UserAvailability {
        id,
        user_id,
        slot_id,
        user: UserSimple {
            id: user_id,
            username: username.to_string(),
        },
        available_from: from.to_string(),
        available_to: to.to_string(),
        note: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn cell(key: &str) -> GridCell {
    key.parse().unwrap()
}
