use sesplan_core::errors::SesplanResult;
use sesplan_core::models::slot::{SessionSlot, SessionSlotCreate, SessionSlotUpdate};
use tracing::debug;

use super::Pagination;
use crate::{require_id, ApiClient};

impl ApiClient {
    /// Slots of a session, each carrying its users' availability.
    pub async fn session_slots(&self, session_id: i64, page: Pagination) -> SesplanResult<Vec<SessionSlot>> {
        require_id("session_id", session_id)?;
        let slots: Vec<SessionSlot> = self
            .get_with_query(&format!("/sessions/{}/slots", session_id), &page)
            .await?;
        debug!("Fetched {} slots for session {}", slots.len(), session_id);
        Ok(slots)
    }

    pub async fn create_slot(&self, session_id: i64, slot: &SessionSlotCreate) -> SesplanResult<SessionSlot> {
        require_id("session_id", session_id)?;
        self.post(&format!("/sessions/{}/slots", session_id), slot).await
    }

    pub async fn update_slot(
        &self,
        session_id: i64,
        slot_id: i64,
        update: &SessionSlotUpdate,
    ) -> SesplanResult<SessionSlot> {
        require_id("session_id", session_id)?;
        require_id("slot_id", slot_id)?;
        self.put(&format!("/sessions/{}/slots/{}", session_id, slot_id), update)
            .await
    }

    /// Deletes a slot and returns it as it was before deletion.
    pub async fn delete_slot(&self, session_id: i64, slot_id: i64) -> SesplanResult<SessionSlot> {
        require_id("session_id", session_id)?;
        require_id("slot_id", slot_id)?;
        self.delete_returning(&format!("/sessions/{}/slots/{}", session_id, slot_id))
            .await
    }
}
