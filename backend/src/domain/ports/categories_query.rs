//! Driving port for reading categories.

use async_trait::async_trait;

use crate::domain::{Caller, Category, CategoryId, Error, Lead};

/// Categories of the caller's organisation with lead counts over the
/// caller's visible leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryListing {
    pub categories: Vec<Category>,
    pub unassigned_lead_count: u64,
    pub lead_count: u64,
}

/// A category with the visible leads tagged with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDetail {
    pub category: Category,
    pub leads: Vec<Lead>,
}

#[async_trait]
pub trait CategoriesQuery: Send + Sync {
    async fn list_categories(&self, caller: &Caller) -> Result<CategoryListing, Error>;

    async fn category_detail(
        &self,
        caller: &Caller,
        id: CategoryId,
    ) -> Result<CategoryDetail, Error>;
}
