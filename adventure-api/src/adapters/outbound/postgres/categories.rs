use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::domain::{
    models::{Category, CategoryId, UserId},
    ports::outbound::CategoryRepository,
    GridError,
};

pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DatabaseCategory {
    id: i32,
    user_id: i32,
    name: String,
    created_at: OffsetDateTime,
}

impl From<DatabaseCategory> for Category {
    fn from(row: DatabaseCategory) -> Self {
        Self {
            id: CategoryId::new(row.id),
            owner: UserId::new(row.user_id),
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list_categories(&self, owner: &UserId) -> Result<Vec<Category>, GridError> {
        let rows = sqlx::query_as::<_, DatabaseCategory>(
            r#"
            SELECT id, user_id, name, created_at
            FROM categories
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner.as_i32())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_category(
        &self,
        owner: &UserId,
        id: &CategoryId,
    ) -> Result<Option<Category>, GridError> {
        let row = sqlx::query_as::<_, DatabaseCategory>(
            r#"
            SELECT id, user_id, name, created_at
            FROM categories
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_i32())
        .bind(owner.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn create_category(&self, owner: &UserId, name: &str) -> Result<Category, GridError> {
        let row = sqlx::query_as::<_, DatabaseCategory>(
            r#"
            INSERT INTO categories (user_id, name)
            VALUES ($1, $2)
            RETURNING id, user_id, name, created_at
            "#,
        )
        .bind(owner.as_i32())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
