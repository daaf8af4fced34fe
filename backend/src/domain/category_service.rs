//! Category use-cases.
//!
//! Categories are organisation-wide, but the lead counts and the leads shown
//! on a category page only cover what the caller may see.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    CategoriesCommand, CategoriesQuery, CategoryDetail, CategoryListing, CategoryRepository,
    LeadRepository,
};
use crate::domain::{
    Caller, Category, CategoryFilter, CategoryId, CategoryName, Error, LeadFilter, RecordScope,
};

/// Implements [`CategoriesQuery`] and [`CategoriesCommand`].
#[derive(Clone)]
pub struct CategoryService<C, L> {
    categories: Arc<C>,
    leads: Arc<L>,
}

impl<C, L> CategoryService<C, L> {
    pub fn new(categories: Arc<C>, leads: Arc<L>) -> Self {
        Self { categories, leads }
    }
}

fn category_not_found(id: CategoryId) -> Error {
    Error::not_found(format!("category {id} not found"))
}

#[async_trait]
impl<C, L> CategoriesQuery for CategoryService<C, L>
where
    C: CategoryRepository,
    L: LeadRepository,
{
    async fn list_categories(&self, caller: &Caller) -> Result<CategoryListing, Error> {
        let visible = LeadFilter::visible(RecordScope::for_caller(caller));
        let categories = self.categories.list(caller.organisation_id()).await?;
        let unassigned_lead_count = self
            .leads
            .count(&visible.with_category(CategoryFilter::Uncategorised))
            .await?;
        let lead_count = self
            .leads
            .count(&visible.with_category(CategoryFilter::Categorised))
            .await?;
        Ok(CategoryListing {
            categories,
            unassigned_lead_count,
            lead_count,
        })
    }

    async fn category_detail(
        &self,
        caller: &Caller,
        id: CategoryId,
    ) -> Result<CategoryDetail, Error> {
        let scope = RecordScope::for_caller(caller);
        let category = self
            .categories
            .find(scope.organisation_id(), id)
            .await?
            .ok_or_else(|| category_not_found(id))?;
        let leads = self
            .leads
            .list(&LeadFilter::visible(scope).with_category(CategoryFilter::Only(id)))
            .await?;
        Ok(CategoryDetail { category, leads })
    }
}

#[async_trait]
impl<C, L> CategoriesCommand for CategoryService<C, L>
where
    C: CategoryRepository,
    L: LeadRepository,
{
    async fn create_category(
        &self,
        caller: &Caller,
        name: CategoryName,
    ) -> Result<Category, Error> {
        let organisation_id = caller.require_organisor()?;
        let category = self.categories.insert(organisation_id, &name).await?;
        info!(category_id = %category.id(), %organisation_id, "category created");
        Ok(category)
    }

    async fn update_category(
        &self,
        caller: &Caller,
        id: CategoryId,
        name: CategoryName,
    ) -> Result<Category, Error> {
        let organisation_id = caller.require_organisor()?;
        self.categories
            .rename(organisation_id, id, &name)
            .await?
            .ok_or_else(|| category_not_found(id))
    }

    async fn delete_category(&self, caller: &Caller, id: CategoryId) -> Result<(), Error> {
        let organisation_id = caller.require_organisor()?;
        if self.categories.delete(organisation_id, id).await? {
            info!(category_id = %id, %organisation_id, "category deleted");
            Ok(())
        } else {
            Err(category_not_found(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockCategoryRepository, MockLeadRepository};
    use crate::domain::{AgentId, OrganisationId};
    use crate::test_support::fixtures::{agent_caller, category, lead, organisor_caller};
    use mockall::predicate::eq;
    use rstest::rstest;

    fn service(
        categories: MockCategoryRepository,
        leads: MockLeadRepository,
    ) -> CategoryService<MockCategoryRepository, MockLeadRepository> {
        CategoryService::new(Arc::new(categories), Arc::new(leads))
    }

    #[rstest]
    #[tokio::test]
    async fn listing_counts_only_visible_leads() {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_list()
            .with(eq(OrganisationId::new(10)))
            .return_once(|_| Ok(vec![category(7, 10, "Contacted")]));
        let mut leads = MockLeadRepository::new();
        leads
            .expect_count()
            .withf(|filter| {
                filter.scope.agent_id() == Some(AgentId::new(5))
                    && filter.category == CategoryFilter::Uncategorised
            })
            .return_once(|_| Ok(2));
        leads
            .expect_count()
            .withf(|filter| {
                filter.scope.agent_id() == Some(AgentId::new(5))
                    && filter.category == CategoryFilter::Categorised
            })
            .return_once(|_| Ok(3));

        let listing = service(categories, leads)
            .list_categories(&agent_caller(2, 5, 10))
            .await
            .expect("listing succeeds");

        assert_eq!(listing.categories.len(), 1);
        assert_eq!(listing.unassigned_lead_count, 2);
        assert_eq!(listing.lead_count, 3);
    }

    #[rstest]
    #[tokio::test]
    async fn detail_lists_the_category_leads() {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find()
            .return_once(|_, _| Ok(Some(category(7, 10, "Contacted"))));
        let mut leads = MockLeadRepository::new();
        leads
            .expect_list()
            .withf(|filter| filter.category == CategoryFilter::Only(CategoryId::new(7)))
            .return_once(|_| Ok(vec![lead(1, 10, Some(5), Some(7))]));

        let detail = service(categories, leads)
            .category_detail(&organisor_caller(1, 10), CategoryId::new(7))
            .await
            .expect("detail succeeds");

        assert_eq!(detail.category.name().as_str(), "Contacted");
        assert_eq!(detail.leads.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn foreign_category_is_not_found() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_find().return_once(|_, _| Ok(None));

        let err = service(categories, MockLeadRepository::new())
            .category_detail(&organisor_caller(1, 10), CategoryId::new(70))
            .await
            .expect_err("hidden category");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn agents_cannot_create_categories() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_insert().never();
        let name = CategoryName::new("Hot").expect("valid name");

        let err = service(categories, MockLeadRepository::new())
            .create_category(&agent_caller(2, 5, 10), name)
            .await
            .expect_err("forbidden");

        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_missing_category_is_not_found() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_delete().return_once(|_, _| Ok(false));

        let err = service(categories, MockLeadRepository::new())
            .delete_category(&organisor_caller(1, 10), CategoryId::new(7))
            .await
            .expect_err("missing category");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
