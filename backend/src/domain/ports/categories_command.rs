//! Driving port for managing categories.

use async_trait::async_trait;

use crate::domain::{Caller, Category, CategoryId, CategoryName, Error};

#[async_trait]
pub trait CategoriesCommand: Send + Sync {
    async fn create_category(&self, caller: &Caller, name: CategoryName)
    -> Result<Category, Error>;

    async fn update_category(
        &self,
        caller: &Caller,
        id: CategoryId,
        name: CategoryName,
    ) -> Result<Category, Error>;

    async fn delete_category(&self, caller: &Caller, id: CategoryId) -> Result<(), Error>;
}
