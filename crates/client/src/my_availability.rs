//! The current user's session-wide availability, as held by the UI.

use sesplan_core::models::availability::{Availability, AvailabilityWindow};
use tracing::{debug, error};

use crate::api::availability::SessionAvailabilityApi;

#[derive(Debug, Clone, Default)]
pub struct MyAvailability {
    session_id: Option<i64>,
    availabilities: Vec<Availability>,
    is_loading: bool,
    load_error: Option<String>,
    is_saving: bool,
    save_error: Option<String>,
}

impl MyAvailability {
    pub fn new(session_id: Option<i64>) -> Self {
        Self {
            session_id,
            ..Self::default()
        }
    }

    pub fn session_id(&self) -> Option<i64> {
        self.session_id
    }

    pub fn availabilities(&self) -> &[Availability] {
        &self.availabilities
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    pub fn save_error(&self) -> Option<&str> {
        self.save_error.as_deref()
    }

    /// Switches to another session, dropping everything held for the old one.
    /// The caller fetches afterwards.
    pub fn set_session(&mut self, session_id: Option<i64>) {
        self.session_id = session_id;
        self.availabilities.clear();
        self.load_error = None;
        self.save_error = None;
    }

    fn valid_session(&self) -> Option<i64> {
        self.session_id.filter(|id| *id > 0)
    }

    /// Reloads the list; on failure the list is emptied.
    pub async fn fetch<A>(&mut self, api: &A) -> bool
    where
        A: SessionAvailabilityApi + ?Sized,
    {
        let Some(session_id) = self.valid_session() else {
            return false;
        };

        self.is_loading = true;
        self.load_error = None;
        let ok = match api.my_availability(session_id).await {
            Ok(list) => {
                debug!("Loaded {} availability blocks for session {}", list.len(), session_id);
                self.availabilities = list;
                true
            }
            Err(e) => {
                error!("Failed to fetch my availability: {}", e);
                self.load_error = Some(e.to_string());
                self.availabilities.clear();
                false
            }
        };
        self.is_loading = false;
        ok
    }

    /// Replaces the server-side list with `blocks` and keeps what the server returns.
    pub async fn save<A>(&mut self, api: &A, blocks: Vec<AvailabilityWindow>) -> bool
    where
        A: SessionAvailabilityApi + ?Sized,
    {
        let Some(session_id) = self.valid_session() else {
            return false;
        };

        self.is_saving = true;
        self.save_error = None;
        let ok = match api.set_my_availability(session_id, blocks).await {
            Ok(list) => {
                self.availabilities = list;
                true
            }
            Err(e) => {
                error!("Failed to save availability: {}", e);
                self.save_error = Some(e.to_string());
                false
            }
        };
        self.is_saving = false;
        ok
    }

    /// Deletes everything on the server; the local list survives a failure.
    pub async fn clear_on_server<A>(&mut self, api: &A) -> bool
    where
        A: SessionAvailabilityApi + ?Sized,
    {
        let Some(session_id) = self.valid_session() else {
            return false;
        };

        self.is_saving = true;
        self.save_error = None;
        let ok = match api.delete_my_availability(session_id).await {
            Ok(()) => {
                self.availabilities.clear();
                true
            }
            Err(e) => {
                error!("Failed to delete availability: {}", e);
                self.save_error = Some(e.to_string());
                false
            }
        };
        self.is_saving = false;
        ok
    }
}
