use std::borrow::Cow;
use std::fmt;

use time::OffsetDateTime;

use super::{CategoryId, TimeEntryId, UserId};

/// Marker stored in `time_entries.tag`.
///
/// The table is shared between features, so every read and write names the
/// tag it works on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryTag(Cow<'static, str>);

impl EntryTag {
    /// Rows that back a cell of the monthly grid.
    pub const GRID: EntryTag = EntryTag(Cow::Borrowed("grid"));

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntryTag {
    fn from(tag: String) -> Self {
        Self(Cow::Owned(tag))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntry {
    pub id: TimeEntryId,
    pub owner: UserId,
    pub category_id: CategoryId,
    pub start_at: OffsetDateTime,
    /// Missing on rows that were never finished.
    pub end_at: Option<OffsetDateTime>,
    pub tag: EntryTag,
}

#[derive(Debug, Clone)]
pub struct NewTimeEntry {
    pub owner: UserId,
    pub category_id: CategoryId,
    pub start_at: OffsetDateTime,
    pub end_at: OffsetDateTime,
    pub tag: EntryTag,
}
