//! Port for category persistence.
use async_trait::async_trait;

use crate::domain::{Category, CategoryId, CategoryName, Error, OrganisationId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by category repository adapters.
    pub enum CategoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "category repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "category repository query failed: {message}",
    }
}

impl From<CategoryRepositoryError> for Error {
    fn from(value: CategoryRepositoryError) -> Self {
        match value {
            CategoryRepositoryError::Connection { message } => Self::service_unavailable(message),
            CategoryRepositoryError::Query { message } => Self::internal(message),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Categories of an organisation ordered by id.
    async fn list(
        &self,
        organisation_id: OrganisationId,
    ) -> Result<Vec<Category>, CategoryRepositoryError>;

    async fn find(
        &self,
        organisation_id: OrganisationId,
        id: CategoryId,
    ) -> Result<Option<Category>, CategoryRepositoryError>;

    async fn insert(
        &self,
        organisation_id: OrganisationId,
        name: &CategoryName,
    ) -> Result<Category, CategoryRepositoryError>;

    async fn rename(
        &self,
        organisation_id: OrganisationId,
        id: CategoryId,
        name: &CategoryName,
    ) -> Result<Option<Category>, CategoryRepositoryError>;

    /// Delete a category; its leads keep existing uncategorised.
    async fn delete(
        &self,
        organisation_id: OrganisationId,
        id: CategoryId,
    ) -> Result<bool, CategoryRepositoryError>;
}
