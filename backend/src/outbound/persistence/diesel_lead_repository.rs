//! PostgreSQL-backed `LeadRepository`.
//!
//! Reads translate a [`LeadFilter`] into a boxed query. Writes first confirm
//! the lead is inside the caller's [`RecordScope`] and then update it by id,
//! both inside one transaction.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{LeadRepository, LeadRepositoryError};
use crate::domain::{
    AgentFilter, AgentId, CategoryFilter, CategoryId, Lead, LeadFields, LeadFilter, LeadId,
    NewLead, RecordScope,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{LeadRow, LeadUpdate, NewLeadRow};
use super::pool::{DbPool, PoolError};
use super::schema::leads;

/// Diesel implementation of [`LeadRepository`].
#[derive(Clone)]
pub struct DieselLeadRepository {
    pool: DbPool,
}

impl DieselLeadRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LeadRepositoryError {
    map_basic_pool_error(error, LeadRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LeadRepositoryError {
    map_basic_diesel_error(
        error,
        LeadRepositoryError::query,
        LeadRepositoryError::connection,
    )
}

fn into_lead(row: LeadRow) -> Result<Lead, LeadRepositoryError> {
    row.into_lead().map_err(LeadRepositoryError::query)
}

/// Boxed `SELECT` over the leads admitted by `filter`.
fn filtered(filter: &LeadFilter) -> leads::BoxedQuery<'static, Pg> {
    let mut query = leads::table
        .filter(leads::organisation_id.eq(filter.scope.organisation_id().get()))
        .into_boxed();
    if let Some(agent_id) = filter.scope.agent_id() {
        query = query.filter(leads::agent_id.eq(agent_id.get()));
    }
    query = match filter.agent {
        AgentFilter::Any => query,
        AgentFilter::Assigned => query.filter(leads::agent_id.is_not_null()),
        AgentFilter::Unassigned => query.filter(leads::agent_id.is_null()),
    };
    match filter.category {
        CategoryFilter::Any => query,
        CategoryFilter::Categorised => query.filter(leads::category_id.is_not_null()),
        CategoryFilter::Uncategorised => query.filter(leads::category_id.is_null()),
        CategoryFilter::Only(id) => query.filter(leads::category_id.eq(id.get())),
    }
}

/// Id of the lead if `scope` admits it.
async fn visible_id(
    conn: &mut AsyncPgConnection,
    scope: RecordScope,
    id: LeadId,
) -> QueryResult<Option<i64>> {
    filtered(&LeadFilter::visible(scope))
        .filter(leads::id.eq(id.get()))
        .select(leads::id)
        .first(conn)
        .await
        .optional()
}

#[async_trait]
impl LeadRepository for DieselLeadRepository {
    async fn list(&self, filter: &LeadFilter) -> Result<Vec<Lead>, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LeadRow> = filtered(filter)
            .order(leads::id.asc())
            .select(LeadRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(into_lead).collect()
    }

    async fn count(&self, filter: &LeadFilter) -> Result<u64, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(total).map_err(|err| LeadRepositoryError::query(err.to_string()))
    }

    async fn find(
        &self,
        scope: &RecordScope,
        id: LeadId,
    ) -> Result<Option<Lead>, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<LeadRow> = filtered(&LeadFilter::visible(*scope))
            .filter(leads::id.eq(id.get()))
            .select(LeadRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(into_lead).transpose()
    }

    async fn insert(&self, lead: &NewLead) -> Result<Lead, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: LeadRow = diesel::insert_into(leads::table)
            .values(&NewLeadRow::from_domain(lead))
            .returning(LeadRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_lead(row)
    }

    async fn update(
        &self,
        scope: &RecordScope,
        id: LeadId,
        fields: &LeadFields,
        agent_id: Option<AgentId>,
    ) -> Result<Option<Lead>, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let scope = *scope;
        let changes = LeadUpdate::from_domain(fields, agent_id);
        let row = conn
            .transaction(|conn| {
                async move {
                    let Some(lead_id) = visible_id(conn, scope, id).await? else {
                        return Ok(None);
                    };
                    diesel::update(leads::table.find(lead_id))
                        .set(&changes)
                        .returning(LeadRow::as_returning())
                        .get_result(conn)
                        .await
                        .map(Some)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        row.map(into_lead).transpose()
    }

    async fn assign_agent(
        &self,
        scope: &RecordScope,
        id: LeadId,
        agent_id: AgentId,
    ) -> Result<Option<Lead>, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let scope = *scope;
        let row = conn
            .transaction(|conn| {
                async move {
                    let Some(lead_id) = visible_id(conn, scope, id).await? else {
                        return Ok(None);
                    };
                    diesel::update(leads::table.find(lead_id))
                        .set(leads::agent_id.eq(agent_id.get()))
                        .returning(LeadRow::as_returning())
                        .get_result(conn)
                        .await
                        .map(Some)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        row.map(into_lead).transpose()
    }

    async fn set_category(
        &self,
        scope: &RecordScope,
        id: LeadId,
        category_id: Option<CategoryId>,
    ) -> Result<Option<Lead>, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let scope = *scope;
        let row = conn
            .transaction(|conn| {
                async move {
                    let Some(lead_id) = visible_id(conn, scope, id).await? else {
                        return Ok(None);
                    };
                    diesel::update(leads::table.find(lead_id))
                        .set(leads::category_id.eq(category_id.map(CategoryId::get)))
                        .returning(LeadRow::as_returning())
                        .get_result(conn)
                        .await
                        .map(Some)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        row.map(into_lead).transpose()
    }

    async fn delete(&self, scope: &RecordScope, id: LeadId) -> Result<bool, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let scope = *scope;
        let deleted = conn
            .transaction(|conn| {
                async move {
                    let Some(lead_id) = visible_id(conn, scope, id).await? else {
                        return Ok(0);
                    };
                    diesel::delete(leads::table.find(lead_id)).execute(conn).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrganisationId;
    use crate::test_support::fixtures::agent_caller;
    use diesel::debug_query;
    use rstest::rstest;

    fn sql(filter: &LeadFilter) -> String {
        debug_query::<Pg, _>(&filtered(filter)).to_string()
    }

    #[rstest]
    fn organisation_scope_filters_by_organisation_only() {
        let query = sql(&LeadFilter::visible(RecordScope::organisation(
            OrganisationId::new(10),
        )));
        assert!(query.contains("\"organisation_id\" = $1"), "{query}");
        assert!(!query.contains("\"agent_id\" ="), "{query}");
    }

    #[rstest]
    #[case(AgentFilter::Assigned, "\"agent_id\" IS NOT NULL")]
    #[case(AgentFilter::Unassigned, "\"agent_id\" IS NULL")]
    fn agent_filters_add_null_checks(#[case] agent: AgentFilter, #[case] expected: &str) {
        let filter = LeadFilter::visible(RecordScope::organisation(OrganisationId::new(10)))
            .with_agent(agent);
        let query = sql(&filter);
        assert!(query.contains(expected), "{query}");
    }

    #[rstest]
    fn agent_scope_and_category_are_combined() {
        let scope = RecordScope::for_caller(&agent_caller(2, 5, 10));
        let filter =
            LeadFilter::visible(scope).with_category(CategoryFilter::Only(CategoryId::new(7)));
        let query = sql(&filter);
        assert!(query.contains("\"agent_id\" = $2"), "{query}");
        assert!(query.contains("\"category_id\" = $3"), "{query}");
        assert_eq!(scope.agent_id(), Some(AgentId::new(5)));
    }

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let err = map_pool_error(PoolError::checkout("refused"));
        assert!(matches!(err, LeadRepositoryError::Connection { .. }));
    }
}
