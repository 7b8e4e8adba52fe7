use time::OffsetDateTime;

use super::{CategoryId, UserId};

/// Longest accepted category name, in characters.
pub const MAX_CATEGORY_NAME_LEN: usize = 64;

/// A named activity column of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub owner: UserId,
    pub name: String,
    pub created_at: OffsetDateTime,
}
