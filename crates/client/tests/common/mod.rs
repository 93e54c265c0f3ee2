#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use sesplan_core::availability::GridCell;
use sesplan_core::models::availability::{Availability, AvailabilityWindow, UserAvailability};
use sesplan_core::models::user::UserSimple;

pub fn utc(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, h, m, 0).unwrap()
}

pub fn cell(key: &str) -> GridCell {
    key.parse().unwrap()
}

/// What the server answers to a successful slot-scoped PUT.
pub fn stored(slot_id: i64, window: &AvailabilityWindow) -> UserAvailability {
    UserAvailability {
        id: 1,
        user_id: 7,
        slot_id,
        user: UserSimple {
            id: 7,
            username: "alice".to_string(),
        },
        available_from: window.available_from.clone(),
        available_to: window.available_to.clone(),
        note: window.note.clone(),
        created_at: None,
        updated_at: None,
    }
}

pub fn session_availability(id: i64, from: &str, to: &str) -> Availability {
    Availability {
        id,
        user_id: 7,
        session_id: 3,
        available_from: from.to_string(),
        available_to: to.to_string(),
        note: None,
        created_at: None,
        updated_at: None,
    }
}
