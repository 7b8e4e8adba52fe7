use sqlx::PgPool;

use crate::domain::{models::UserId, User};

use super::repo_error::RepositoryError;

pub trait UserRepository {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    async fn create_user(&self, user: &NewUser) -> Result<User, RepositoryError>;
}

pub struct UserRepositoryImpl {
    pool: PgPool,
}

impl UserRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DatabaseUser {
    id: i32,
    email: String,
    password_hash: String,
}

impl From<DatabaseUser> for User {
    fn from(row: DatabaseUser) -> Self {
        Self {
            id: UserId::new(row.id),
            email: row.email,
            password_hash: row.password_hash,
        }
    }
}

impl UserRepository for UserRepositoryImpl {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, DatabaseUser>(
            r#"
            SELECT id, email, password_hash
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(Into::into))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, DatabaseUser>(
            r#"
            SELECT id, email, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(Into::into))
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, DatabaseUser>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user.into())
    }
}

pub struct NewUser {
    email: String,
    password_hash: String,
}

impl NewUser {
    /// `email` is normalized to lowercase without surrounding whitespace.
    pub fn new(email: &str, password_hash: String) -> Self {
        Self {
            email: normalize_email(email),
            password_hash,
        }
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
