//! PostgreSQL-backed `AccountRepository`.
//!
//! Organisor sign-up inserts the user and its organisation in one
//! transaction; a unique violation on `users.username` surfaces as
//! [`AccountRepositoryError::UsernameTaken`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{AccountRepository, AccountRepositoryError, StoredCredentials};
use crate::domain::{NewUser, OrganisationId, PasswordHash, User, UserId, Username};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{organisations, users};

/// Diesel implementation of [`AccountRepository`].
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    map_basic_pool_error(error, AccountRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    map_basic_diesel_error(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

fn map_insert_error(error: diesel::result::Error, username: &str) -> AccountRepositoryError {
    if is_unique_violation(&error) {
        AccountRepositoryError::username_taken(username)
    } else {
        map_diesel_error(error)
    }
}

fn into_user(row: UserRow) -> Result<User, AccountRepositoryError> {
    row.into_user().map_err(AccountRepositoryError::query)
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn create_organisor(
        &self,
        user: &NewUser,
    ) -> Result<(User, OrganisationId), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow::from_domain(user);

        let (user_row, organisation_id) = conn
            .transaction(|conn| {
                async move {
                    let user_row: UserRow = diesel::insert_into(users::table)
                        .values(&row)
                        .returning(UserRow::as_returning())
                        .get_result(conn)
                        .await?;
                    let organisation_id: i64 = diesel::insert_into(organisations::table)
                        .values(organisations::user_id.eq(user_row.id))
                        .returning(organisations::id)
                        .get_result(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>((user_row, organisation_id))
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_insert_error(err, user.details().username().as_str()))?;

        Ok((into_user(user_row)?, OrganisationId::new(organisation_id)))
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Option<(i64, String)> = users::table
            .filter(users::username.eq(username.as_str()))
            .select((users::id, users::password_hash))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(found.map(|(id, hash)| StoredCredentials {
            user_id: UserId::new(id),
            password_hash: PasswordHash::new(hash),
        }))
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(into_user).transpose()
    }

    async fn find_organisation(
        &self,
        owner: UserId,
    ) -> Result<Option<OrganisationId>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id: Option<i64> = organisations::table
            .filter(organisations::user_id.eq(owner.get()))
            .select(organisations::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(id.map(OrganisationId::new))
    }
}
