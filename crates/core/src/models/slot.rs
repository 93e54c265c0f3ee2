use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{availability::UserAvailability, parse_timestamp};
use crate::errors::{SesplanError, SesplanResult};

/// A bookable time window within a session.
///
/// Timestamps are kept as the raw strings the API sent so that one malformed
/// row does not fail the whole list; use [`SessionSlot::window`] to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSlot {
    pub id: i64,
    pub session_id: i64,
    pub slot_from: String,
    pub slot_to: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub user_availabilities: Vec<UserAvailability>,
}

impl SessionSlot {
    /// Parses `[slot_from, slot_to)`.
    pub fn window(&self) -> SesplanResult<(DateTime<Utc>, DateTime<Utc>)> {
        let from = parse_timestamp(&self.slot_from)?;
        let to = parse_timestamp(&self.slot_to)?;
        if to <= from {
            return Err(SesplanError::Validation(format!(
                "slot {} ends before it starts",
                self.id
            )));
        }
        Ok((from, to))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSlotCreate {
    pub slot_from: String,
    pub slot_to: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSlotUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
