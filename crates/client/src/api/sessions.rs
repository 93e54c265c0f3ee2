use sesplan_core::errors::SesplanResult;
use sesplan_core::models::session::{Session, SessionCreate, SessionUpdate};

use crate::{require_id, require_non_empty, ApiClient};

impl ApiClient {
    pub async fn sessions_by_campaign(&self, campaign_id: i64) -> SesplanResult<Vec<Session>> {
        require_id("campaign_id", campaign_id)?;
        self.get(&format!("/sessions/by_campaign/{}", campaign_id)).await
    }

    pub async fn session(&self, session_id: i64) -> SesplanResult<Session> {
        require_id("session_id", session_id)?;
        self.get(&format!("/sessions/{}", session_id)).await
    }

    /// Sessions of every campaign the current user takes part in.
    pub async fn my_sessions(&self) -> SesplanResult<Vec<Session>> {
        self.get("/sessions/my-sessions").await
    }

    pub async fn create_session(&self, session: &SessionCreate) -> SesplanResult<Session> {
        require_id("campaign_id", session.campaign_id)?;
        require_non_empty("title", &session.title)?;
        self.post("/sessions/", session).await
    }

    pub async fn update_session(&self, session_id: i64, update: &SessionUpdate) -> SesplanResult<Session> {
        require_id("session_id", session_id)?;
        self.put(&format!("/sessions/{}", session_id), update).await
    }

    pub async fn delete_session(&self, session_id: i64) -> SesplanResult<()> {
        require_id("session_id", session_id)?;
        self.delete::<()>(&format!("/sessions/{}", session_id), None).await
    }
}
