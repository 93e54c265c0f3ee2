//! # Sesplan Core
//!
//! Shared building blocks for the Sesplan campaign planner client: the wire
//! models exchanged with the REST API, the error taxonomy, and the
//! availability engine that turns slot and availability records into a
//! day × time grid and turns grid selections back into intervals.
//!
//! Nothing in this crate performs I/O.

/// Error types shared by every Sesplan crate
pub mod errors;
/// Request and response payloads of the REST API
pub mod models;
/// Availability grid indexing, drag selection and interval coalescing
pub mod availability;
