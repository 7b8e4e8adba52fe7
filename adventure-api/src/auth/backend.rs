use std::fmt;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use axum_login::{AuthnBackend, UserId as SessionUserId};
use serde::Deserialize;
use sqlx::PgPool;
use tokio::task;

use crate::{
    domain::{models::UserId, User},
    repositories::{
        normalize_email, NewUser, RepositoryError, UserRepository, UserRepositoryImpl,
    },
};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    TaskJoin(#[from] task::JoinError),

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("{0}")]
    InvalidSignup(String),
}

impl From<argon2::password_hash::Error> for BackendError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::Hash(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct AuthBackend {
    db: PgPool,
}

impl AuthBackend {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a user from signup credentials.
    ///
    /// Fails with `RepositoryError::AlreadyExists` when the email is taken.
    pub async fn register(&self, creds: Credentials) -> Result<User, BackendError> {
        validate_signup(&creds)?;

        let password = creds.password;
        let password_hash = task::spawn_blocking(move || hash_password(&password)).await??;

        let user_repo = UserRepositoryImpl::new(self.db.clone());
        let user = user_repo
            .create_user(&NewUser::new(&creds.email, password_hash))
            .await?;

        tracing::info!(user_id = %user.id, "registered user");
        Ok(user)
    }
}

#[async_trait]
impl AuthnBackend for AuthBackend {
    type User = User;
    type Credentials = Credentials;
    type Error = BackendError;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        let user_repo = UserRepositoryImpl::new(self.db.clone());
        let Some(user) = user_repo
            .get_user_by_email(&normalize_email(&creds.email))
            .await?
        else {
            return Ok(None);
        };

        // Argon2 is CPU bound, keep it off the async workers.
        let hash = user.password_hash.clone();
        let verified =
            task::spawn_blocking(move || verify_password(&creds.password, &hash)).await?;

        Ok(verified.then_some(user))
    }

    async fn get_user(
        &self,
        user_id: &SessionUserId<Self>,
    ) -> Result<Option<Self::User>, Self::Error> {
        let Ok(id) = i32::try_from(*user_id) else {
            return Ok(None);
        };

        let user_repo = UserRepositoryImpl::new(self.db.clone());
        Ok(user_repo.get_user(UserId::new(id)).await?)
    }
}

pub type AuthSession = axum_login::AuthSession<AuthBackend>;

fn validate_signup(creds: &Credentials) -> Result<(), BackendError> {
    let email = creds.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(BackendError::InvalidSignup(
            "email must be a valid address".to_string(),
        ));
    }
    if creds.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(BackendError::InvalidSignup(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!("stored password hash is malformed: {}", e);
            false
        }
    }
}
