use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use sesplan_core::errors::SesplanResult;
use sesplan_core::models::availability::{Availability, AvailabilityWindow, UserAvailability};

use crate::api::availability::{SessionAvailabilityApi, SlotAvailabilityApi};

// Mock backends for testing
mock! {
    pub SlotAvailability {}

    #[async_trait]
    impl SlotAvailabilityApi for SlotAvailability {
        async fn set_my_slot_availability(
            &self,
            session_id: i64,
            slot_id: i64,
            window: AvailabilityWindow,
        ) -> SesplanResult<UserAvailability>;

        async fn delete_my_slot_availability(
            &self,
            session_id: i64,
            slot_id: i64,
            range: Option<(DateTime<Utc>, DateTime<Utc>)>,
        ) -> SesplanResult<()>;
    }
}

mock! {
    pub SessionAvailability {}

    #[async_trait]
    impl SessionAvailabilityApi for SessionAvailability {
        async fn my_availability(&self, session_id: i64) -> SesplanResult<Vec<Availability>>;

        async fn set_my_availability(
            &self,
            session_id: i64,
            blocks: Vec<AvailabilityWindow>,
        ) -> SesplanResult<Vec<Availability>>;

        async fn delete_my_availability(&self, session_id: i64) -> SesplanResult<()>;
    }
}
