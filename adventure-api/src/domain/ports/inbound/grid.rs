use adventure_core::{GridMonth, GridOffset};
use async_trait::async_trait;

use crate::domain::{
    models::{Category, CellCommit, CommitCellRequest, MonthGrid, UserId},
    GridError,
};

/// Inbound port for the monthly grid.
///
/// Every operation is scoped to the authenticated owner; callers must resolve
/// the owner before invoking the service.
#[async_trait]
pub trait GridService: Send + Sync + 'static {
    /// The fixed offset days are anchored to.
    fn offset(&self) -> GridOffset;

    async fn list_categories(&self, owner: &UserId) -> Result<Vec<Category>, GridError>;

    async fn create_category(&self, owner: &UserId, name: &str) -> Result<Category, GridError>;

    /// Load every grid cell of `month` for `owner`.
    ///
    /// Entries without an end instant are left out of the result.
    async fn load_month(&self, owner: &UserId, month: GridMonth) -> Result<MonthGrid, GridError>;

    /// Persist one edited cell.
    ///
    /// Creates the backing entry on the first value, moves its end on later
    /// values and deletes it when the cell is cleared. Fails with
    /// `UnknownCategory` when the category does not belong to `owner`.
    async fn commit_cell(
        &self,
        owner: &UserId,
        request: &CommitCellRequest,
    ) -> Result<CellCommit, GridError>;
}
