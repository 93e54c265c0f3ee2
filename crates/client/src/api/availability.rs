//! Availability endpoints.
//!
//! Two flavours exist on the server: availability bound to one slot, declared
//! as `[from, to)` ranges inside that slot, and session-wide availability that
//! is replaced as a whole. The write paths used by the state containers are
//! exposed as traits so they can be mocked.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sesplan_core::errors::SesplanResult;
use sesplan_core::models::availability::{Availability, AvailabilityWindow, UserAvailability};
use sesplan_core::models::format_timestamp;
use tracing::debug;

use super::Pagination;
use crate::{require_id, ApiClient};

/// Writes to the current user's availability inside a slot.
#[async_trait]
pub trait SlotAvailabilityApi: Send + Sync {
    /// Declares the user available for `window`. Overlapping an existing
    /// declaration yields [`sesplan_core::errors::SesplanError::Conflict`].
    async fn set_my_slot_availability(
        &self,
        session_id: i64,
        slot_id: i64,
        window: AvailabilityWindow,
    ) -> SesplanResult<UserAvailability>;

    /// Removes the user's availability in `range`, or all of it in the slot
    /// when `range` is `None`.
    async fn delete_my_slot_availability(
        &self,
        session_id: i64,
        slot_id: i64,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> SesplanResult<()>;
}

/// The current user's session-wide availability.
#[async_trait]
pub trait SessionAvailabilityApi: Send + Sync {
    async fn my_availability(&self, session_id: i64) -> SesplanResult<Vec<Availability>>;

    /// Replaces the user's availability with `blocks` and returns the stored list.
    async fn set_my_availability(
        &self,
        session_id: i64,
        blocks: Vec<AvailabilityWindow>,
    ) -> SesplanResult<Vec<Availability>>;

    async fn delete_my_availability(&self, session_id: i64) -> SesplanResult<()>;
}

pub(crate) fn my_slot_availability_path(session_id: i64, slot_id: i64) -> String {
    format!("/sessions/{}/slots/{}/availabilities/me", session_id, slot_id)
}

/// `time_from` / `time_to` query of a ranged delete.
pub(crate) fn range_query(range: Option<(DateTime<Utc>, DateTime<Utc>)>) -> Option<[(&'static str, String); 2]> {
    range.map(|(from, to)| {
        [
            ("time_from", format_timestamp(&from)),
            ("time_to", format_timestamp(&to)),
        ]
    })
}

impl ApiClient {
    /// Every user's availability for one slot.
    pub async fn slot_availabilities(
        &self,
        session_id: i64,
        slot_id: i64,
        page: Pagination,
    ) -> SesplanResult<Vec<UserAvailability>> {
        require_id("session_id", session_id)?;
        require_id("slot_id", slot_id)?;
        self.get_with_query(
            &format!("/sessions/{}/slots/{}/availabilities", session_id, slot_id),
            &page,
        )
        .await
    }

    /// Every user's availability across all slots of a session.
    pub async fn session_availabilities(&self, session_id: i64) -> SesplanResult<Vec<UserAvailability>> {
        require_id("session_id", session_id)?;
        let rows: Vec<UserAvailability> = self
            .get(&format!("/sessions/{}/availabilities", session_id))
            .await?;
        debug!("Fetched {} availability records for session {}", rows.len(), session_id);
        Ok(rows)
    }
}

#[async_trait]
impl SlotAvailabilityApi for ApiClient {
    async fn set_my_slot_availability(
        &self,
        session_id: i64,
        slot_id: i64,
        window: AvailabilityWindow,
    ) -> SesplanResult<UserAvailability> {
        require_id("session_id", session_id)?;
        require_id("slot_id", slot_id)?;
        self.put(&my_slot_availability_path(session_id, slot_id), &window)
            .await
    }

    async fn delete_my_slot_availability(
        &self,
        session_id: i64,
        slot_id: i64,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> SesplanResult<()> {
        require_id("session_id", session_id)?;
        require_id("slot_id", slot_id)?;
        self.delete(&my_slot_availability_path(session_id, slot_id), range_query(range).as_ref())
            .await
    }
}

#[async_trait]
impl SessionAvailabilityApi for ApiClient {
    async fn my_availability(&self, session_id: i64) -> SesplanResult<Vec<Availability>> {
        require_id("session_id", session_id)?;
        self.get(&format!("/sessions/{}/availabilities/me", session_id))
            .await
    }

    async fn set_my_availability(
        &self,
        session_id: i64,
        blocks: Vec<AvailabilityWindow>,
    ) -> SesplanResult<Vec<Availability>> {
        require_id("session_id", session_id)?;
        self.put(&format!("/sessions/{}/availabilities/me", session_id), &blocks)
            .await
    }

    async fn delete_my_availability(&self, session_id: i64) -> SesplanResult<()> {
        require_id("session_id", session_id)?;
        self.delete::<()>(&format!("/sessions/{}/availabilities/me", session_id), None)
            .await
    }
}
