//! In-memory repositories for service tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};

use crate::domain::{
    models::{Category, CategoryId, EntryTag, NewTimeEntry, TimeEntry, TimeEntryId, UserId},
    ports::outbound::{CategoryRepository, TimeEntryRepository},
    GridError,
};

/// Time entry repository backed by an in-memory map.
///
/// Applies the same owner/tag/range filters as the PostgreSQL adapter.
#[derive(Clone, Default)]
pub struct MockTimeEntryRepository {
    rows: Arc<RwLock<BTreeMap<TimeEntryId, TimeEntry>>>,
    next_id: Arc<AtomicI32>,
    fail_writes: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MockTimeEntryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a row; `minutes: None` leaves the end instant unset.
    pub fn with_entry(
        self,
        owner: UserId,
        category: i32,
        start_at: OffsetDateTime,
        minutes: Option<i64>,
        tag: EntryTag,
    ) -> Self {
        let id = self.allocate_id();
        let entry = TimeEntry {
            id,
            owner,
            category_id: CategoryId::new(category),
            start_at,
            end_at: minutes.map(|m| start_at + Duration::minutes(m)),
            tag,
        };
        self.rows.write().unwrap().insert(id, entry);
        self
    }

    /// Make every insert, update and delete fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().unwrap().is_empty()
    }

    pub fn get(&self, id: TimeEntryId) -> Option<TimeEntry> {
        self.rows.read().unwrap().get(&id).cloned()
    }

    pub fn duration_minutes(&self, id: TimeEntryId) -> Option<i64> {
        let entry = self.get(id)?;
        entry.end_at.map(|end| (end - entry.start_at).whole_minutes())
    }

    fn allocate_id(&self) -> TimeEntryId {
        TimeEntryId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn check_writable(&self) -> Result<(), GridError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GridError::storage("write rejected by mock"));
        }
        Ok(())
    }
}

#[async_trait]
impl TimeEntryRepository for MockTimeEntryRepository {
    async fn list_tagged_in_range(
        &self,
        owner: &UserId,
        tag: &EntryTag,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<TimeEntry>, GridError> {
        Ok(self
            .rows
            .read()
            .unwrap()
            .values()
            .filter(|e| e.owner == *owner && e.tag == *tag)
            .filter(|e| e.start_at >= from && e.start_at < to)
            .cloned()
            .collect())
    }

    async fn find_tagged_at(
        &self,
        owner: &UserId,
        category_id: &CategoryId,
        tag: &EntryTag,
        start_at: OffsetDateTime,
    ) -> Result<Option<TimeEntry>, GridError> {
        Ok(self
            .rows
            .read()
            .unwrap()
            .values()
            .find(|e| {
                e.owner == *owner
                    && e.category_id == *category_id
                    && e.tag == *tag
                    && e.start_at == start_at
            })
            .cloned())
    }

    async fn insert(&self, entry: &NewTimeEntry) -> Result<TimeEntryId, GridError> {
        self.check_writable()?;
        let id = self.allocate_id();
        let row = TimeEntry {
            id,
            owner: entry.owner,
            category_id: entry.category_id,
            start_at: entry.start_at,
            end_at: Some(entry.end_at),
            tag: entry.tag.clone(),
        };
        self.rows.write().unwrap().insert(id, row);
        Ok(id)
    }

    async fn update_end(
        &self,
        owner: &UserId,
        id: &TimeEntryId,
        tag: &EntryTag,
        end_at: OffsetDateTime,
    ) -> Result<(), GridError> {
        self.check_writable()?;
        let mut rows = self.rows.write().unwrap();
        if let Some(row) = rows
            .get_mut(id)
            .filter(|row| row.owner == *owner && row.tag == *tag)
        {
            row.end_at = Some(end_at);
        }
        Ok(())
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: &TimeEntryId,
        tag: &EntryTag,
    ) -> Result<(), GridError> {
        self.check_writable()?;
        let mut rows = self.rows.write().unwrap();
        if rows
            .get(id)
            .is_some_and(|row| row.owner == *owner && row.tag == *tag)
        {
            rows.remove(id);
        }
        Ok(())
    }
}

/// Category repository backed by an in-memory list.
#[derive(Clone, Default)]
pub struct MockCategoryRepository {
    rows: Arc<RwLock<Vec<Category>>>,
}

impl MockCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a category for `owner`; ids follow insertion order starting at 1.
    pub fn with_category(self, owner: UserId, name: &str) -> Self {
        {
            let mut rows = self.rows.write().unwrap();
            let id = CategoryId::new(rows.len() as i32 + 1);
            rows.push(Category {
                id,
                owner,
                name: name.to_string(),
                created_at: OffsetDateTime::now_utc(),
            });
        }
        self
    }
}

#[async_trait]
impl CategoryRepository for MockCategoryRepository {
    async fn list_categories(&self, owner: &UserId) -> Result<Vec<Category>, GridError> {
        let mut categories: Vec<_> = self
            .rows
            .read()
            .unwrap()
            .iter()
            .filter(|c| c.owner == *owner)
            .cloned()
            .collect();
        categories.sort_by_key(|c| (c.created_at, c.id));
        Ok(categories)
    }

    async fn find_category(
        &self,
        owner: &UserId,
        id: &CategoryId,
    ) -> Result<Option<Category>, GridError> {
        Ok(self
            .rows
            .read()
            .unwrap()
            .iter()
            .find(|c| c.id == *id && c.owner == *owner)
            .cloned())
    }

    async fn create_category(&self, owner: &UserId, name: &str) -> Result<Category, GridError> {
        let mut rows = self.rows.write().unwrap();
        let id = CategoryId::new(rows.len() as i32 + 1);
        let category = Category {
            id,
            owner: *owner,
            name: name.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        rows.push(category.clone());
        Ok(category)
    }
}
