//! Endpoint groups of the REST API, each adding methods to [`crate::ApiClient`].

pub mod availability;
pub mod sessions;
pub mod slots;
pub mod users;

use serde::Serialize;

/// Page of a listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub skip: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}
