use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{format_timestamp, parse_timestamp, user::UserSimple};
use crate::errors::SesplanResult;

/// A user's declared free range against one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAvailability {
    pub id: i64,
    pub user_id: i64,
    pub slot_id: i64,
    pub user: UserSimple,
    pub available_from: String,
    pub available_to: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl UserAvailability {
    pub fn window(&self) -> SesplanResult<(DateTime<Utc>, DateTime<Utc>)> {
        Ok((
            parse_timestamp(&self.available_from)?,
            parse_timestamp(&self.available_to)?,
        ))
    }
}

/// Request body for setting availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub available_from: String,
    pub available_to: String,
    pub note: Option<String>,
}

impl AvailabilityWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            available_from: format_timestamp(&from),
            available_to: format_timestamp(&to),
            note: None,
        }
    }
}

/// Session-wide availability record (not bound to a slot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub id: i64,
    pub user_id: i64,
    pub session_id: i64,
    pub available_from: String,
    pub available_to: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Availability {
    pub fn window(&self) -> SesplanResult<(DateTime<Utc>, DateTime<Utc>)> {
        Ok((
            parse_timestamp(&self.available_from)?,
            parse_timestamp(&self.available_to)?,
        ))
    }
}
