//! Time entry repository port (outbound).
//!
//! Every method takes the [`EntryTag`] it operates on. The backing table is
//! shared with other features and rows carrying another tag must never be
//! read or touched through a grid operation.

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::domain::{
    models::{CategoryId, EntryTag, NewTimeEntry, TimeEntry, TimeEntryId, UserId},
    GridError,
};

#[async_trait]
pub trait TimeEntryRepository: Send + Sync + 'static {
    /// Entries of `owner` with `tag` whose start lies in `[from, to)`.
    async fn list_tagged_in_range(
        &self,
        owner: &UserId,
        tag: &EntryTag,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<TimeEntry>, GridError>;

    /// The entry of `owner` with `tag` for `category` starting exactly at `start_at`.
    ///
    /// Returns at most one row even if storage holds duplicates.
    async fn find_tagged_at(
        &self,
        owner: &UserId,
        category_id: &CategoryId,
        tag: &EntryTag,
        start_at: OffsetDateTime,
    ) -> Result<Option<TimeEntry>, GridError>;

    async fn insert(&self, entry: &NewTimeEntry) -> Result<TimeEntryId, GridError>;

    /// Move the end instant of an existing entry. Nothing else changes.
    async fn update_end(
        &self,
        owner: &UserId,
        id: &TimeEntryId,
        tag: &EntryTag,
        end_at: OffsetDateTime,
    ) -> Result<(), GridError>;

    async fn delete(
        &self,
        owner: &UserId,
        id: &TimeEntryId,
        tag: &EntryTag,
    ) -> Result<(), GridError>;
}
