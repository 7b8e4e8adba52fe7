mod repo_error;
mod user_repo;

pub use repo_error::RepositoryError;
pub(crate) use user_repo::normalize_email;
pub use user_repo::{NewUser, UserRepository, UserRepositoryImpl};
