//! PostgreSQL-backed `AgentRepository`.
//!
//! Every query joins `agents` to `users` so an [`Agent`] always carries its
//! account. Writes touching both tables run in a transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{AgentRepository, AgentRepositoryError};
use crate::domain::{Agent, AgentId, NewUser, OrganisationId, PersonalDetails, UserId};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{AgentRow, NewUserRow, UserDetailsUpdate, UserRow, agent_from_rows};
use super::pool::{DbPool, PoolError};
use super::schema::{agents, users};

/// Diesel implementation of [`AgentRepository`].
#[derive(Clone)]
pub struct DieselAgentRepository {
    pool: DbPool,
}

impl DieselAgentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AgentRepositoryError {
    map_basic_pool_error(error, AgentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AgentRepositoryError {
    map_basic_diesel_error(
        error,
        AgentRepositoryError::query,
        AgentRepositoryError::connection,
    )
}

fn map_write_error(error: diesel::result::Error, username: &str) -> AgentRepositoryError {
    if is_unique_violation(&error) {
        AgentRepositoryError::username_taken(username)
    } else {
        map_diesel_error(error)
    }
}

fn into_agents(rows: Vec<(AgentRow, UserRow)>) -> Result<Vec<Agent>, AgentRepositoryError> {
    rows.into_iter()
        .map(|(agent, user)| agent_from_rows(agent, user).map_err(AgentRepositoryError::query))
        .collect()
}

fn into_agent(row: Option<(AgentRow, UserRow)>) -> Result<Option<Agent>, AgentRepositoryError> {
    row.map(|(agent, user)| agent_from_rows(agent, user).map_err(AgentRepositoryError::query))
        .transpose()
}

/// Agent in `organisation_id` with its user row.
async fn find_in_organisation(
    conn: &mut AsyncPgConnection,
    organisation_id: OrganisationId,
    id: AgentId,
) -> QueryResult<Option<(AgentRow, UserRow)>> {
    agents::table
        .inner_join(users::table)
        .filter(agents::id.eq(id.get()))
        .filter(agents::organisation_id.eq(organisation_id.get()))
        .select((AgentRow::as_select(), UserRow::as_select()))
        .first(conn)
        .await
        .optional()
}

#[async_trait]
impl AgentRepository for DieselAgentRepository {
    async fn list(&self, organisation_id: OrganisationId) -> Result<Vec<Agent>, AgentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = agents::table
            .inner_join(users::table)
            .filter(agents::organisation_id.eq(organisation_id.get()))
            .order(agents::id.asc())
            .select((AgentRow::as_select(), UserRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_agents(rows)
    }

    async fn find(
        &self,
        organisation_id: OrganisationId,
        id: AgentId,
    ) -> Result<Option<Agent>, AgentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = find_in_organisation(&mut conn, organisation_id, id)
            .await
            .map_err(map_diesel_error)?;
        into_agent(row)
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Agent>, AgentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = agents::table
            .inner_join(users::table)
            .filter(agents::user_id.eq(user_id.get()))
            .select((AgentRow::as_select(), UserRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        into_agent(row)
    }

    async fn create(
        &self,
        organisation_id: OrganisationId,
        user: &NewUser,
    ) -> Result<Agent, AgentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow::from_domain(user);

        let (agent_row, user_row) = conn
            .transaction(|conn| {
                async move {
                    let user_row: UserRow = diesel::insert_into(users::table)
                        .values(&row)
                        .returning(UserRow::as_returning())
                        .get_result(conn)
                        .await?;
                    let agent_row: AgentRow = diesel::insert_into(agents::table)
                        .values((
                            agents::user_id.eq(user_row.id),
                            agents::organisation_id.eq(organisation_id.get()),
                        ))
                        .returning(AgentRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>((agent_row, user_row))
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_write_error(err, user.details().username().as_str()))?;

        agent_from_rows(agent_row, user_row).map_err(AgentRepositoryError::query)
    }

    async fn update(
        &self,
        organisation_id: OrganisationId,
        id: AgentId,
        details: &PersonalDetails,
    ) -> Result<Option<Agent>, AgentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserDetailsUpdate::from_domain(details);

        let updated = conn
            .transaction(|conn| {
                async move {
                    let Some((agent_row, user_row)) =
                        find_in_organisation(conn, organisation_id, id).await?
                    else {
                        return Ok(None);
                    };
                    let user_row: UserRow = diesel::update(users::table.find(user_row.id))
                        .set(&changes)
                        .returning(UserRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>(Some((agent_row, user_row)))
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_write_error(err, details.username().as_str()))?;

        into_agent(updated)
    }

    async fn delete(
        &self,
        organisation_id: OrganisationId,
        id: AgentId,
    ) -> Result<bool, AgentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            agents::table
                .filter(agents::id.eq(id.get()))
                .filter(agents::organisation_id.eq(organisation_id.get())),
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
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert!(matches!(err, AgentRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn lookup_failures_become_query_errors() {
        let err = map_write_error(diesel::result::Error::NotFound, "sam");
        assert!(matches!(err, AgentRepositoryError::Query { .. }));
    }
}
