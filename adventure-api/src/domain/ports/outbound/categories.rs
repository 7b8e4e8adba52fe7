use async_trait::async_trait;

use crate::domain::{
    models::{Category, CategoryId, UserId},
    GridError,
};

/// Outbound port for the categories shown as grid columns.
#[async_trait]
pub trait CategoryRepository: Send + Sync + 'static {
    /// Categories of `owner`, oldest first.
    async fn list_categories(&self, owner: &UserId) -> Result<Vec<Category>, GridError>;

    /// The category `id`, only when it belongs to `owner`.
    async fn find_category(
        &self,
        owner: &UserId,
        id: &CategoryId,
    ) -> Result<Option<Category>, GridError>;

    async fn create_category(&self, owner: &UserId, name: &str) -> Result<Category, GridError>;
}
