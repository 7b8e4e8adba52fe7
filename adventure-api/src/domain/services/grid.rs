use std::{collections::BTreeMap, sync::Arc};

use adventure_core::{from_range, CellKey, GridMonth, GridOffset};
use async_trait::async_trait;

use crate::domain::{
    models::{
        Category, CellCommit, CommitCellRequest, EntryTag, MonthGrid, NewTimeEntry, UserId,
        MAX_CATEGORY_NAME_LEN,
    },
    ports::{
        inbound::GridService,
        outbound::{CategoryRepository, TimeEntryRepository},
    },
    GridError,
};

/// Implementation of the GridService inbound port.
///
/// Reconciles the sparse (day, category) → minutes view with the flat list of
/// grid-tagged time entries: one entry per cell, starting at local midnight
/// of its day and ending `minutes` later.
pub struct GridServiceImpl<E, C> {
    entries: Arc<E>,
    categories: Arc<C>,
    offset: GridOffset,
}

impl<E, C> GridServiceImpl<E, C> {
    pub fn new(entries: Arc<E>, categories: Arc<C>, offset: GridOffset) -> Self {
        Self {
            entries,
            categories,
            offset,
        }
    }
}

#[async_trait]
impl<E: TimeEntryRepository, C: CategoryRepository> GridService for GridServiceImpl<E, C> {
    fn offset(&self) -> GridOffset {
        self.offset
    }

    async fn list_categories(&self, owner: &UserId) -> Result<Vec<Category>, GridError> {
        self.categories.list_categories(owner).await
    }

    async fn create_category(&self, owner: &UserId, name: &str) -> Result<Category, GridError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GridError::InvalidCategoryName("name is empty".to_string()));
        }
        if name.chars().count() > MAX_CATEGORY_NAME_LEN {
            return Err(GridError::InvalidCategoryName(format!(
                "name is longer than {MAX_CATEGORY_NAME_LEN} characters"
            )));
        }

        self.categories.create_category(owner, name).await
    }

    async fn load_month(&self, owner: &UserId, month: GridMonth) -> Result<MonthGrid, GridError> {
        let (from, to) = self.offset.month_range(month);

        let categories = self.categories.list_categories(owner).await?;
        let entries = self
            .entries
            .list_tagged_in_range(owner, &EntryTag::GRID, from, to)
            .await?;

        let mut cells = BTreeMap::new();
        for entry in entries {
            let Some(end_at) = entry.end_at else {
                tracing::debug!(entry_id = %entry.id, "skipping grid entry without end time");
                continue;
            };

            let key = CellKey::new(self.offset.day_of(entry.start_at), entry.category_id);
            cells.insert(key, from_range(entry.start_at, end_at));
        }

        Ok(MonthGrid {
            month,
            days: month.days(),
            categories,
            cells,
        })
    }

    async fn commit_cell(
        &self,
        owner: &UserId,
        request: &CommitCellRequest,
    ) -> Result<CellCommit, GridError> {
        // Zero renders as an empty cell, so it is stored as one.
        let minutes = request.minutes.filter(|minutes| *minutes > 0);
        let (start_at, end_at) = self
            .offset
            .to_range(request.day, minutes.map_or(0, i64::from))
            .ok_or_else(|| GridError::InvalidDay(request.day.to_string()))?;

        if self
            .categories
            .find_category(owner, &request.category_id)
            .await?
            .is_none()
        {
            return Err(GridError::UnknownCategory(request.category_id));
        }

        let existing = self
            .entries
            .find_tagged_at(owner, &request.category_id, &EntryTag::GRID, start_at)
            .await?;

        match (minutes, existing) {
            (None, None) => Ok(CellCommit::Unchanged),
            (None, Some(entry)) => {
                self.entries
                    .delete(owner, &entry.id, &EntryTag::GRID)
                    .await?;
                tracing::debug!(entry_id = %entry.id, day = %request.day, "deleted grid entry");
                Ok(CellCommit::Deleted(entry.id))
            }
            (Some(minutes), Some(entry)) => {
                self.entries
                    .update_end(owner, &entry.id, &EntryTag::GRID, end_at)
                    .await?;
                tracing::debug!(entry_id = %entry.id, minutes, "updated grid entry");
                Ok(CellCommit::Updated(entry.id))
            }
            (Some(minutes), None) => {
                let entry = NewTimeEntry {
                    owner: *owner,
                    category_id: request.category_id,
                    start_at,
                    end_at,
                    tag: EntryTag::GRID,
                };
                let id = self.entries.insert(&entry).await?;
                tracing::debug!(entry_id = %id, minutes, "created grid entry");
                Ok(CellCommit::Created(id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::mock::{MockCategoryRepository, MockTimeEntryRepository};
    use crate::domain::models::{CategoryId, TimeEntryId};
    use time::macros::{date, datetime};
    use time::Date;

    const OWNER: UserId = UserId::new(1);

    fn service(
        entries: MockTimeEntryRepository,
        categories: MockCategoryRepository,
    ) -> GridServiceImpl<MockTimeEntryRepository, MockCategoryRepository> {
        GridServiceImpl::new(
            Arc::new(entries),
            Arc::new(categories),
            GridOffset::default(),
        )
    }

    /// Categories 1 through 5, all belonging to `OWNER`.
    fn owned_categories() -> MockCategoryRepository {
        (1..=5).fold(MockCategoryRepository::new(), |repo, n| {
            repo.with_category(OWNER, &format!("Category {n}"))
        })
    }

    fn commit(day: Date, category: i32, minutes: Option<u32>) -> CommitCellRequest {
        CommitCellRequest {
            day,
            category_id: CategoryId::new(category),
            minutes,
        }
    }

    fn january() -> GridMonth {
        "2026-01".parse().unwrap()
    }

    #[tokio::test]
    async fn clearing_an_empty_cell_is_a_no_op() {
        let entries = MockTimeEntryRepository::new();
        let service = service(entries.clone(), owned_categories());

        let result = service
            .commit_cell(&OWNER, &commit(date!(2026 - 01 - 15), 1, None))
            .await
            .unwrap();

        assert_eq!(result, CellCommit::Unchanged);
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn second_commit_updates_the_same_entry() {
        let entries = MockTimeEntryRepository::new();
        let service = service(entries.clone(), owned_categories());
        let day = date!(2026 - 01 - 15);

        let created = service
            .commit_cell(&OWNER, &commit(day, 1, Some(60)))
            .await
            .unwrap();
        let CellCommit::Created(id) = created else {
            panic!("expected a created entry, got {created:?}");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.duration_minutes(id), Some(60));

        let updated = service
            .commit_cell(&OWNER, &commit(day, 1, Some(90)))
            .await
            .unwrap();

        assert_eq!(updated, CellCommit::Updated(id));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.duration_minutes(id), Some(90));
    }

    #[tokio::test]
    async fn update_only_moves_the_end_instant() {
        let entries = MockTimeEntryRepository::new();
        let service = service(entries.clone(), owned_categories());
        let day = date!(2026 - 01 - 15);

        let id = service
            .commit_cell(&OWNER, &commit(day, 3, Some(30)))
            .await
            .unwrap()
            .entry_id()
            .unwrap();
        let before = entries.get(id).unwrap();

        service
            .commit_cell(&OWNER, &commit(day, 3, Some(45)))
            .await
            .unwrap();
        let after = entries.get(id).unwrap();

        assert_eq!(after.start_at, before.start_at);
        assert_eq!(after.category_id, before.category_id);
        assert_eq!(after.owner, before.owner);
        assert_eq!(after.tag, EntryTag::GRID);
        assert_eq!(after.end_at, Some(datetime!(2026-01-15 00:45 +09:00)));
    }

    #[tokio::test]
    async fn zero_minutes_deletes_the_entry() {
        let entries = MockTimeEntryRepository::new();
        let service = service(entries.clone(), owned_categories());
        let day = date!(2026 - 01 - 20);

        let id = service
            .commit_cell(&OWNER, &commit(day, 1, Some(15)))
            .await
            .unwrap()
            .entry_id()
            .unwrap();

        let result = service
            .commit_cell(&OWNER, &commit(day, 1, Some(0)))
            .await
            .unwrap();

        assert_eq!(result, CellCommit::Deleted(id));
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn zero_minutes_on_an_empty_cell_creates_nothing() {
        let entries = MockTimeEntryRepository::new();
        let service = service(entries.clone(), owned_categories());

        let result = service
            .commit_cell(&OWNER, &commit(date!(2026 - 01 - 20), 1, Some(0)))
            .await
            .unwrap();

        assert_eq!(result, CellCommit::Unchanged);
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn load_only_returns_grid_entries_inside_the_month() {
        let entries = MockTimeEntryRepository::new()
            // inside, grid
            .with_entry(OWNER, 1, datetime!(2026-01-01 00:00 +09:00), Some(30), EntryTag::GRID)
            // last instant before the month starts
            .with_entry(OWNER, 1, datetime!(2025-12-31 23:59 +09:00), Some(30), EntryTag::GRID)
            // first instant of the next month
            .with_entry(OWNER, 1, datetime!(2026-02-01 00:00 +09:00), Some(30), EntryTag::GRID)
            // inside, different feature
            .with_entry(
                OWNER,
                1,
                datetime!(2026-01-10 00:00 +09:00),
                Some(30),
                EntryTag::from("timer".to_string()),
            )
            // inside, other owner
            .with_entry(
                UserId::new(2),
                1,
                datetime!(2026-01-11 00:00 +09:00),
                Some(30),
                EntryTag::GRID,
            );
        let service = service(entries, owned_categories());

        let grid = service.load_month(&OWNER, january()).await.unwrap();

        assert_eq!(grid.cells.len(), 1);
        assert_eq!(
            grid.cells.get(&CellKey::new(date!(2026 - 01 - 01), 1)),
            Some(&30)
        );
        assert_eq!(grid.days.len(), 31);
    }

    #[tokio::test]
    async fn load_skips_entries_without_an_end() {
        let entries = MockTimeEntryRepository::new()
            .with_entry(OWNER, 1, datetime!(2026-01-05 00:00 +09:00), None, EntryTag::GRID)
            .with_entry(OWNER, 2, datetime!(2026-01-05 00:00 +09:00), Some(75), EntryTag::GRID);
        let service = service(entries, owned_categories());

        let grid = service.load_month(&OWNER, january()).await.unwrap();

        assert_eq!(grid.cells.len(), 1);
        assert_eq!(
            grid.cells.get(&CellKey::new(date!(2026 - 01 - 05), 2)),
            Some(&75)
        );
    }

    #[tokio::test]
    async fn load_keys_cells_by_the_local_day_of_utc_instants() {
        // Storage hands instants back in UTC; 15:00Z is midnight of the next day in +09:00.
        let entries = MockTimeEntryRepository::new().with_entry(
            OWNER,
            4,
            datetime!(2026-01-14 15:00 UTC),
            Some(45),
            EntryTag::GRID,
        );
        let service = service(entries, owned_categories());

        let grid = service.load_month(&OWNER, january()).await.unwrap();

        assert_eq!(
            grid.cells.get(&CellKey::new(date!(2026 - 01 - 15), 4)),
            Some(&45)
        );
    }

    #[tokio::test]
    async fn load_returns_categories_oldest_first() {
        let categories = MockCategoryRepository::new();
        let service = service(MockTimeEntryRepository::new(), categories);

        service.create_category(&OWNER, "Reading").await.unwrap();
        service.create_category(&OWNER, "Running").await.unwrap();
        service
            .create_category(&UserId::new(2), "Someone else's")
            .await
            .unwrap();

        let grid = service.load_month(&OWNER, january()).await.unwrap();
        let names: Vec<_> = grid.categories.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["Reading", "Running"]);
    }

    #[tokio::test]
    async fn commits_never_touch_rows_with_another_tag() {
        let start = datetime!(2026-01-15 00:00 +09:00);
        let entries = MockTimeEntryRepository::new().with_entry(
            OWNER,
            1,
            start,
            Some(20),
            EntryTag::from("timer".to_string()),
        );
        let service = service(entries.clone(), owned_categories());

        let created = service
            .commit_cell(&OWNER, &commit(date!(2026 - 01 - 15), 1, Some(50)))
            .await
            .unwrap();
        assert!(matches!(created, CellCommit::Created(_)));

        service
            .commit_cell(&OWNER, &commit(date!(2026 - 01 - 15), 1, None))
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries.get(TimeEntryId::new(1)).unwrap().tag.as_str(), "timer");
    }

    #[tokio::test]
    async fn storage_failures_are_returned_as_errors() {
        let entries = MockTimeEntryRepository::new();
        let service = service(entries.clone(), owned_categories());
        entries.fail_writes(true);

        let err = service
            .commit_cell(&OWNER, &commit(date!(2026 - 01 - 15), 1, Some(60)))
            .await
            .unwrap_err();

        assert!(matches!(err, GridError::Storage(_)));
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn rapid_edits_to_one_cell_are_last_write_wins() {
        // No per-cell sequencing: whichever commit reaches storage last decides the value.
        let entries = MockTimeEntryRepository::new();
        let service = service(entries.clone(), owned_categories());
        let day = date!(2026 - 01 - 15);

        service.commit_cell(&OWNER, &commit(day, 1, Some(30))).await.unwrap();
        service.commit_cell(&OWNER, &commit(day, 1, Some(120))).await.unwrap();
        service.commit_cell(&OWNER, &commit(day, 1, Some(45))).await.unwrap();

        let grid = service.load_month(&OWNER, january()).await.unwrap();
        assert_eq!(grid.cells.get(&CellKey::new(day, 1)), Some(&45));
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn commits_to_different_cells_run_independently() {
        let entries = MockTimeEntryRepository::new();
        let service = Arc::new(service(entries.clone(), owned_categories()));

        let handles: Vec<_> = (1..=5)
            .map(|category| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .commit_cell(
                            &OWNER,
                            &commit(date!(2026 - 01 - 15), category, Some(category as u32 * 10)),
                        )
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let grid = service.load_month(&OWNER, january()).await.unwrap();
        assert_eq!(grid.cells.len(), 5);
        for category in 1..=5 {
            assert_eq!(
                grid.cells.get(&CellKey::new(date!(2026 - 01 - 15), category)),
                Some(&(category as u32 * 10))
            );
        }
    }

    #[tokio::test]
    async fn commit_past_the_last_representable_day_is_rejected() {
        let entries = MockTimeEntryRepository::new();
        let service = service(entries.clone(), owned_categories());

        let err = service
            .commit_cell(&OWNER, &commit(Date::MAX, 1, Some(1440)))
            .await
            .unwrap_err();

        assert!(matches!(err, GridError::InvalidDay(_)));
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn commit_to_another_users_category_is_rejected() {
        let entries = MockTimeEntryRepository::new();
        let categories = MockCategoryRepository::new()
            .with_category(OWNER, "Reading")
            .with_category(UserId::new(2), "Someone else's");
        let service = service(entries.clone(), categories);

        let err = service
            .commit_cell(&OWNER, &commit(date!(2026 - 01 - 15), 2, Some(60)))
            .await
            .unwrap_err();
        assert!(matches!(err, GridError::UnknownCategory(id) if id == CategoryId::new(2)));

        let err = service
            .commit_cell(&OWNER, &commit(date!(2026 - 01 - 15), 9, Some(60)))
            .await
            .unwrap_err();
        assert!(matches!(err, GridError::UnknownCategory(_)));
        assert!(entries.is_empty());

        service
            .commit_cell(&OWNER, &commit(date!(2026 - 01 - 15), 1, Some(60)))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn rejects_blank_and_overlong_category_names() {
        let service = service(MockTimeEntryRepository::new(), MockCategoryRepository::new());

        assert!(matches!(
            service.create_category(&OWNER, "   ").await,
            Err(GridError::InvalidCategoryName(_))
        ));
        assert!(matches!(
            service.create_category(&OWNER, &"x".repeat(65)).await,
            Err(GridError::InvalidCategoryName(_))
        ));

        let category = service.create_category(&OWNER, "  Reading ").await.unwrap();
        assert_eq!(category.name, "Reading");
    }

    #[tokio::test]
    async fn reading_scenario_from_create_to_delete() {
        let categories = MockCategoryRepository::new();
        let entries = MockTimeEntryRepository::new();
        let service = service(entries.clone(), categories);
        let reading = service.create_category(&OWNER, "Reading").await.unwrap();
        let day = date!(2026 - 01 - 15);

        let created = service
            .commit_cell(
                &OWNER,
                &CommitCellRequest {
                    day,
                    category_id: reading.id,
                    minutes: Some(90),
                },
            )
            .await
            .unwrap();
        let entry = entries.get(created.entry_id().unwrap()).unwrap();
        assert_eq!(entry.start_at, datetime!(2026-01-15 00:00 +09:00));
        assert_eq!(entry.end_at, Some(datetime!(2026-01-15 01:30 +09:00)));
        assert_eq!(entry.tag, EntryTag::GRID);

        let grid = service.load_month(&OWNER, january()).await.unwrap();
        assert_eq!(grid.cells.get(&CellKey::new(day, reading.id)), Some(&90));

        let deleted = service
            .commit_cell(
                &OWNER,
                &CommitCellRequest {
                    day,
                    category_id: reading.id,
                    minutes: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(deleted, CellCommit::Deleted(entry.id));

        let grid = service.load_month(&OWNER, january()).await.unwrap();
        assert!(!grid.cells.contains_key(&CellKey::new(day, reading.id)));
    }
}
