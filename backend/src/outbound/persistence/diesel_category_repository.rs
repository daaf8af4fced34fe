//! PostgreSQL-backed `CategoryRepository`.
//!
//! Deleting a category leaves its leads in place; the foreign key clears
//! their `category_id`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CategoryRepository, CategoryRepositoryError};
use crate::domain::{Category, CategoryId, CategoryName, OrganisationId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::CategoryRow;
use super::pool::{DbPool, PoolError};
use super::schema::categories;

/// Diesel implementation of [`CategoryRepository`].
#[derive(Clone)]
pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CategoryRepositoryError {
    map_basic_pool_error(error, CategoryRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CategoryRepositoryError {
    map_basic_diesel_error(
        error,
        CategoryRepositoryError::query,
        CategoryRepositoryError::connection,
    )
}

fn into_category(row: CategoryRow) -> Result<Category, CategoryRepositoryError> {
    row.into_category().map_err(CategoryRepositoryError::query)
}

#[async_trait]
impl CategoryRepository for DieselCategoryRepository {
    async fn list(
        &self,
        organisation_id: OrganisationId,
    ) -> Result<Vec<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CategoryRow> = categories::table
            .filter(categories::organisation_id.eq(organisation_id.get()))
            .order(categories::id.asc())
            .select(CategoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(into_category).collect()
    }

    async fn find(
        &self,
        organisation_id: OrganisationId,
        id: CategoryId,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CategoryRow> = categories::table
            .filter(categories::id.eq(id.get()))
            .filter(categories::organisation_id.eq(organisation_id.get()))
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(into_category).transpose()
    }

    async fn insert(
        &self,
        organisation_id: OrganisationId,
        name: &CategoryName,
    ) -> Result<Category, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: CategoryRow = diesel::insert_into(categories::table)
            .values((
                categories::name.eq(name.as_str()),
                categories::organisation_id.eq(organisation_id.get()),
            ))
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_category(row)
    }

    async fn rename(
        &self,
        organisation_id: OrganisationId,
        id: CategoryId,
        name: &CategoryName,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CategoryRow> = diesel::update(
            categories::table
                .filter(categories::id.eq(id.get()))
                .filter(categories::organisation_id.eq(organisation_id.get())),
        )
        .set(categories::name.eq(name.as_str()))
        .returning(CategoryRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(into_category).transpose()
    }

    async fn delete(
        &self,
        organisation_id: OrganisationId,
        id: CategoryId,
    ) -> Result<bool, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            categories::table
                .filter(categories::id.eq(id.get()))
                .filter(categories::organisation_id.eq(organisation_id.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let err = map_pool_error(PoolError::build("bad url"));
        assert!(matches!(err, CategoryRepositoryError::Connection { .. }));
        assert!(err.to_string().contains("bad url"));
    }

    #[rstest]
    fn missing_rows_become_query_errors() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(err, CategoryRepositoryError::Query { .. }));
    }
}
