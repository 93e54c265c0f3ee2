//! # Availability Commit Protocol
//!
//! Sends coalesced selections to the server one interval at a time. Adding is
//! a best-effort upsert: an interval that overlaps an existing declaration is
//! answered with 409 and skipped. Removing deletes each interval by range. Any
//! other failure stops the remaining submissions and is returned.

use chrono::{DateTime, LocalResult, TimeZone, Utc};
use sesplan_core::availability::coalesce::{coalesce_cells, Interval};
use sesplan_core::availability::selection::{Selection, SelectionIntent};
use sesplan_core::availability::{time_increment, GridCell};
use sesplan_core::errors::{SesplanError, SesplanResult};
use sesplan_core::models::availability::AvailabilityWindow;
use tracing::{debug, error, info};

use crate::api::availability::SlotAvailabilityApi;
use crate::require_id;

/// Outcome of a commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Intervals sent to the server.
    pub submitted: usize,
    /// Add requests the server rejected as overlapping.
    pub conflicts: usize,
}

/// Submits `intervals` for `slot_id` sequentially.
pub async fn commit_intervals<A>(
    api: &A,
    session_id: i64,
    slot_id: i64,
    intent: SelectionIntent,
    intervals: &[Interval<DateTime<Utc>>],
) -> SesplanResult<CommitReport>
where
    A: SlotAvailabilityApi + ?Sized,
{
    require_id("session_id", session_id)?;
    require_id("slot_id", slot_id)?;

    let mut report = CommitReport::default();
    for interval in intervals {
        report.submitted += 1;
        match intent {
            SelectionIntent::Add => {
                let window = AvailabilityWindow::new(interval.start, interval.end);
                match api.set_my_slot_availability(session_id, slot_id, window).await {
                    Ok(_) => {}
                    Err(e) if e.is_conflict() => {
                        debug!("Interval {} - {} already covered: {}", interval.start, interval.end, e);
                        report.conflicts += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
            SelectionIntent::Remove => {
                api.delete_my_slot_availability(session_id, slot_id, Some((interval.start, interval.end)))
                    .await?;
            }
        }
    }

    info!(
        "Committed {} intervals to slot {} ({} already present)",
        report.submitted, slot_id, report.conflicts
    );
    Ok(report)
}

/// UI-facing state around committing availability.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityActions {
    is_processing: bool,
    error: Option<String>,
    success_message: Option<String>,
}

impl AvailabilityActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn clear_success_message(&mut self) {
        self.success_message = None;
    }

    /// Coalesces a finished drag and commits it.
    ///
    /// An empty selection commits nothing and succeeds.
    pub async fn process_selection<A, Tz>(
        &mut self,
        api: &A,
        session_id: i64,
        selection: &Selection,
        tz: &Tz,
    ) -> SesplanResult<CommitReport>
    where
        A: SlotAvailabilityApi + ?Sized,
        Tz: TimeZone,
    {
        if selection.cells.is_empty() {
            return Ok(CommitReport::default());
        }

        let intervals: Vec<Interval<DateTime<Utc>>> =
            coalesce_cells(selection.cells.iter().copied(), tz, time_increment())
                .into_iter()
                .flat_map(|day| day.intervals)
                .collect();

        self.run(api, session_id, selection.slot_id, selection.intent, intervals)
            .await
    }

    /// Commits a single grid cell, one increment long.
    pub async fn set_cell_availability<A, Tz>(
        &mut self,
        api: &A,
        session_id: i64,
        slot_id: i64,
        cell: GridCell,
        intent: SelectionIntent,
        tz: &Tz,
    ) -> SesplanResult<CommitReport>
    where
        A: SlotAvailabilityApi + ?Sized,
        Tz: TimeZone,
    {
        let start = match tz.from_local_datetime(&cell.date.and_time(cell.time)) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
            LocalResult::None => {
                let e = SesplanError::Validation(format!("cell {} does not exist in the grid timezone", cell));
                self.error = Some(e.to_string());
                return Err(e);
            }
        };
        let interval = Interval {
            start,
            end: start + time_increment(),
        };

        self.run(api, session_id, Some(slot_id), intent, vec![interval])
            .await
    }

    async fn run<A>(
        &mut self,
        api: &A,
        session_id: i64,
        slot_id: Option<i64>,
        intent: SelectionIntent,
        intervals: Vec<Interval<DateTime<Utc>>>,
    ) -> SesplanResult<CommitReport>
    where
        A: SlotAvailabilityApi + ?Sized,
    {
        self.is_processing = true;
        self.error = None;

        let result = match slot_id {
            Some(slot_id) => commit_intervals(api, session_id, slot_id, intent, &intervals).await,
            None => Err(SesplanError::Validation("selection is not inside a slot".to_string())),
        };

        self.is_processing = false;
        match &result {
            Ok(_) => {
                self.success_message = Some(
                    match intent {
                        SelectionIntent::Add => "Availability saved",
                        SelectionIntent::Remove => "Availability removed",
                    }
                    .to_string(),
                );
            }
            Err(e) => {
                error!("Failed to commit availability: {}", e);
                self.error = Some(e.to_string());
            }
        }
        result
    }
}
