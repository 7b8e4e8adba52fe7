//! PostgreSQL implementation of the TimeEntryRepository port.

use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::domain::{
    models::{CategoryId, EntryTag, NewTimeEntry, TimeEntry, TimeEntryId, UserId},
    ports::outbound::TimeEntryRepository,
    GridError,
};

pub struct PostgresTimeEntryRepository {
    pool: PgPool,
}

impl PostgresTimeEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DatabaseTimeEntry {
    id: i32,
    user_id: i32,
    category_id: i32,
    start_at: OffsetDateTime,
    end_at: Option<OffsetDateTime>,
    tag: String,
}

impl From<DatabaseTimeEntry> for TimeEntry {
    fn from(row: DatabaseTimeEntry) -> Self {
        Self {
            id: TimeEntryId::new(row.id),
            owner: UserId::new(row.user_id),
            category_id: CategoryId::new(row.category_id),
            start_at: row.start_at,
            end_at: row.end_at,
            tag: EntryTag::from(row.tag),
        }
    }
}

#[async_trait]
impl TimeEntryRepository for PostgresTimeEntryRepository {
    async fn list_tagged_in_range(
        &self,
        owner: &UserId,
        tag: &EntryTag,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<TimeEntry>, GridError> {
        let rows = sqlx::query_as::<_, DatabaseTimeEntry>(
            r#"
            SELECT id, user_id, category_id, start_at, end_at, tag
            FROM time_entries
            WHERE user_id = $1 AND tag = $2 AND start_at >= $3 AND start_at < $4
            "#,
        )
        .bind(owner.as_i32())
        .bind(tag.as_str())
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_tagged_at(
        &self,
        owner: &UserId,
        category_id: &CategoryId,
        tag: &EntryTag,
        start_at: OffsetDateTime,
    ) -> Result<Option<TimeEntry>, GridError> {
        let row = sqlx::query_as::<_, DatabaseTimeEntry>(
            r#"
            SELECT id, user_id, category_id, start_at, end_at, tag
            FROM time_entries
            WHERE user_id = $1 AND category_id = $2 AND tag = $3 AND start_at = $4
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(owner.as_i32())
        .bind(category_id.as_i32())
        .bind(tag.as_str())
        .bind(start_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn insert(&self, entry: &NewTimeEntry) -> Result<TimeEntryId, GridError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO time_entries (user_id, category_id, start_at, end_at, tag)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(entry.owner.as_i32())
        .bind(entry.category_id.as_i32())
        .bind(entry.start_at)
        .bind(entry.end_at)
        .bind(entry.tag.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(TimeEntryId::new(id))
    }

    async fn update_end(
        &self,
        owner: &UserId,
        id: &TimeEntryId,
        tag: &EntryTag,
        end_at: OffsetDateTime,
    ) -> Result<(), GridError> {
        sqlx::query(
            r#"
            UPDATE time_entries
            SET end_at = $1
            WHERE id = $2 AND user_id = $3 AND tag = $4
            "#,
        )
        .bind(end_at)
        .bind(id.as_i32())
        .bind(owner.as_i32())
        .bind(tag.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: &TimeEntryId,
        tag: &EntryTag,
    ) -> Result<(), GridError> {
        sqlx::query(
            r#"
            DELETE FROM time_entries
            WHERE id = $1 AND user_id = $2 AND tag = $3
            "#,
        )
        .bind(id.as_i32())
        .bind(owner.as_i32())
        .bind(tag.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
