use std::collections::BTreeMap;

use adventure_core::{CellKey, GridMonth};
use time::Date;

use super::{Category, CategoryId, TimeEntryId};

/// Everything needed to render one month of the grid.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub month: GridMonth,
    pub days: Vec<Date>,
    pub categories: Vec<Category>,
    /// Sparse: cells without an entry have no key.
    pub cells: BTreeMap<CellKey, u32>,
}

/// A single cell edit as received from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitCellRequest {
    pub day: Date,
    pub category_id: CategoryId,
    /// `None` clears the cell.
    pub minutes: Option<u32>,
}

/// What a commit did to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellCommit {
    Created(TimeEntryId),
    Updated(TimeEntryId),
    Deleted(TimeEntryId),
    /// Cleared a cell that had no entry.
    Unchanged,
}

impl CellCommit {
    pub fn entry_id(&self) -> Option<TimeEntryId> {
        match self {
            CellCommit::Created(id) | CellCommit::Updated(id) | CellCommit::Deleted(id) => {
                Some(*id)
            }
            CellCommit::Unchanged => None,
        }
    }
}
