//! # Selection Tracker
//!
//! Tracks a rectangular drag over the availability grid. A drag starts on one
//! cell, captures the slot under it and whether cells are being added or
//! removed, and grows or shrinks as the pointer moves. Only active cells of the
//! captured slot are ever selected.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, error};

use super::{CellLookup, GridCell};
use crate::errors::{SesplanError, SesplanResult};

/// Whether the selected cells should become available or stop being available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionIntent {
    Add,
    Remove,
}

impl SelectionIntent {
    pub fn is_adding(self) -> bool {
        matches!(self, SelectionIntent::Add)
    }
}

/// Rendering hints for a cell inside the current drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellClassification {
    pub is_selection_start: bool,
    pub is_selection_end: bool,
    pub is_adding: bool,
}

/// A finished drag, ready to be coalesced and committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub slot_id: Option<i64>,
    pub cells: BTreeSet<GridCell>,
    pub intent: SelectionIntent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging {
        start: GridCell,
        end: GridCell,
        slot_id: Option<i64>,
        intent: SelectionIntent,
    },
}

#[derive(Debug, Clone)]
pub struct SelectionState {
    state: DragState,
    cells: BTreeSet<GridCell>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
            cells: BTreeSet::new(),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn cells(&self) -> &BTreeSet<GridCell> {
        &self.cells
    }

    pub fn start_cell(&self) -> Option<GridCell> {
        match self.state {
            DragState::Dragging { start, .. } => Some(start),
            DragState::Idle => None,
        }
    }

    pub fn end_cell(&self) -> Option<GridCell> {
        match self.state {
            DragState::Dragging { end, .. } => Some(end),
            DragState::Idle => None,
        }
    }

    /// Slot captured when the drag started.
    pub fn slot_id(&self) -> Option<i64> {
        match self.state {
            DragState::Dragging { slot_id, .. } => slot_id,
            DragState::Idle => None,
        }
    }

    pub fn intent(&self) -> Option<SelectionIntent> {
        match self.state {
            DragState::Dragging { intent, .. } => Some(intent),
            DragState::Idle => None,
        }
    }

    /// Begins a drag on `cell`, discarding any previous selection.
    pub fn start(&mut self, cell: GridCell, intent: SelectionIntent, lookup: &impl CellLookup) {
        let slot_id = lookup.slot_id(cell.date, cell.time);
        self.cells.clear();
        if slot_id.is_some() && lookup.is_active_cell(cell.date, cell.time) {
            self.cells.insert(cell);
        }
        self.state = DragState::Dragging {
            start: cell,
            end: cell,
            slot_id,
            intent,
        };
    }

    /// Recomputes the selection as the rectangle spanned by `from` and `to`.
    ///
    /// Rows and columns are positions in `days` and `times`, not calendar
    /// arithmetic. Cells outside the captured slot are left out. Returns whether
    /// the selected set changed. When `from` or `to` is not in the lists, the
    /// selection is left untouched and a validation error is returned.
    pub fn update(
        &mut self,
        from: GridCell,
        to: GridCell,
        days: &[NaiveDate],
        times: &[NaiveTime],
        lookup: &impl CellLookup,
    ) -> SesplanResult<bool> {
        let DragState::Dragging { slot_id, ref mut end, .. } = self.state else {
            return Ok(false);
        };

        let (Some(d0), Some(d1), Some(t0), Some(t1)) = (
            index_of(days, &from.date),
            index_of(days, &to.date),
            index_of(times, &from.time),
            index_of(times, &to.time),
        ) else {
            error!("Selection {} -> {} is outside the grid", from, to);
            return Err(SesplanError::Validation(format!(
                "selection {} -> {} is outside the grid",
                from, to
            )));
        };

        *end = to;

        let mut next = BTreeSet::new();
        for date in &days[d0.min(d1)..=d0.max(d1)] {
            for time in &times[t0.min(t1)..=t0.max(t1)] {
                if lookup.is_active_cell(*date, *time) && lookup.slot_id(*date, *time) == slot_id {
                    next.insert(GridCell::new(*date, *time));
                }
            }
        }

        let changed = next != self.cells;
        if changed {
            debug!("Selection updated: {} cells", next.len());
        }
        self.cells = next;
        Ok(changed)
    }

    /// Classifies `cell` for rendering; `None` when idle or outside the selection.
    pub fn classify(&self, cell: GridCell) -> Option<CellClassification> {
        let DragState::Dragging { start, end, intent, .. } = self.state else {
            return None;
        };
        if !self.cells.contains(&cell) {
            return None;
        }

        Some(CellClassification {
            is_selection_start: start == cell,
            is_selection_end: end == cell,
            is_adding: intent.is_adding(),
        })
    }

    /// Human-readable summary of the current selection, empty when nothing is selected.
    pub fn label(&self) -> String {
        if !self.is_dragging() {
            return String::new();
        }
        format_selection_label(&self.cells)
    }

    /// Ends the drag and hands back what was selected.
    pub fn finish(&mut self) -> Option<Selection> {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        let cells = std::mem::take(&mut self.cells);
        match state {
            DragState::Dragging { slot_id, intent, .. } => Some(Selection { slot_id, cells, intent }),
            DragState::Idle => None,
        }
    }

    /// Discards the drag without producing a selection.
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
        self.cells.clear();
    }
}

fn index_of<T: PartialEq>(list: &[T], item: &T) -> Option<usize> {
    list.iter().position(|x| x == item)
}

/// Formats a set of cells as `1.5. 18:00`, `1.5. 18:00-19:00 (3 slots)` or
/// `1.5.-3.5. (7 slots)`.
pub fn format_selection_label(cells: &BTreeSet<GridCell>) -> String {
    let mut by_date: BTreeMap<NaiveDate, Vec<NaiveTime>> = BTreeMap::new();
    for cell in cells {
        by_date.entry(cell.date).or_default().push(cell.time);
    }

    let (Some((first_date, first_times)), Some((last_date, _))) =
        (by_date.first_key_value(), by_date.last_key_value())
    else {
        return String::new();
    };

    if by_date.len() == 1 {
        let day = short_date(first_date);
        let first = first_times[0].format("%H:%M");
        let last = first_times[first_times.len() - 1].format("%H:%M");
        if first_times.len() == 1 {
            return format!("{} {}", day, first);
        }
        return format!("{} {}-{} ({} slots)", day, first, last, first_times.len());
    }

    let total: usize = by_date.values().map(Vec::len).sum();
    format!("{}-{} ({} slots)", short_date(first_date), short_date(last_date), total)
}

fn short_date(date: &NaiveDate) -> String {
    date.format("%-d.%-m.").to_string()
}
