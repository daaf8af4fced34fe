//! Driving port for account registration and login.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, SignUp, User, UserId};

#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Register an organisor together with their organisation.
    async fn sign_up(&self, sign_up: SignUp) -> Result<User, Error>;

    /// Check credentials, returning the user id to store in the session.
    async fn login(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}
