//! Port for persisting user accounts and their organisations.
use async_trait::async_trait;

use crate::domain::{Error, NewUser, OrganisationId, PasswordHash, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// The username is already registered.
        UsernameTaken { username: String } => "username {username} is already taken",
    }
}

impl From<AccountRepositoryError> for Error {
    fn from(value: AccountRepositoryError) -> Self {
        match value {
            AccountRepositoryError::Connection { message } => Self::service_unavailable(message),
            AccountRepositoryError::Query { message } => Self::internal(message),
            AccountRepositoryError::UsernameTaken { username } => {
                Self::conflict(format!("username {username} is already taken"))
            }
        }
    }
}

/// Stored credentials looked up at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user_id: UserId,
    pub password_hash: PasswordHash,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert an organisor user and its organisation in one transaction.
    async fn create_organisor(
        &self,
        user: &NewUser,
    ) -> Result<(User, OrganisationId), AccountRepositoryError>;

    /// Fetch the password hash for a username.
    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_user(&self, id: UserId) -> Result<Option<User>, AccountRepositoryError>;

    /// Fetch the organisation owned by a user.
    async fn find_organisation(
        &self,
        owner: UserId,
    ) -> Result<Option<OrganisationId>, AccountRepositoryError>;
}
