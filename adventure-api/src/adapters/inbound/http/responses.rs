//! HTTP response types for grid endpoints.
//!
//! These types serialize to the JSON format expected by the clients.

use adventure_core::GridMonth;
use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::{
    models::{Category, CategoryId, CellCommit, MonthGrid, TimeEntryId},
    User,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            created_at: category.created_at,
        }
    }
}

/// One filled cell. Empty cells are not sent.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellResponse {
    /// Date in YYYY-MM-DD format.
    pub day: String,
    pub category_id: CategoryId,
    pub minutes: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridResponse {
    pub month: GridMonth,
    pub days: Vec<String>,
    pub categories: Vec<CategoryResponse>,
    pub cells: Vec<CellResponse>,
}

impl From<MonthGrid> for GridResponse {
    fn from(grid: MonthGrid) -> Self {
        Self {
            month: grid.month,
            days: grid.days.iter().map(ToString::to_string).collect(),
            categories: grid.categories.into_iter().map(Into::into).collect(),
            cells: grid
                .cells
                .into_iter()
                .map(|(key, minutes)| CellResponse {
                    day: key.day.to_string(),
                    category_id: key.category_id,
                    minutes,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitOutcome {
    Created,
    Updated,
    Deleted,
    Unchanged,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellCommitResponse {
    pub outcome: CommitOutcome,
    pub entry_id: Option<TimeEntryId>,
}

impl From<CellCommit> for CellCommitResponse {
    fn from(commit: CellCommit) -> Self {
        let outcome = match commit {
            CellCommit::Created(_) => CommitOutcome::Created,
            CellCommit::Updated(_) => CommitOutcome::Updated,
            CellCommit::Deleted(_) => CommitOutcome::Deleted,
            CellCommit::Unchanged => CommitOutcome::Unchanged,
        };
        Self {
            outcome,
            entry_id: commit.entry_id(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: i32,
    pub email: String,
}

impl From<User> for MeResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_i32(),
            email: user.email,
        }
    }
}
