//! Account registration, login and caller resolution.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountRepository, AccountsCommand, AgentRepository, CallerQuery, PasswordHasher,
};
use crate::domain::{
    Caller, Error, LoginCredentials, NewUser, PasswordHash, SignUp, User, UserId, Username,
};

/// Implements [`AccountsCommand`] and [`CallerQuery`] over the account and
/// agent repositories.
#[derive(Clone)]
pub struct AccountService<R, A> {
    accounts: Arc<R>,
    agents: Arc<A>,
    hasher: Arc<dyn PasswordHasher>,
}

impl<R, A> AccountService<R, A> {
    pub fn new(accounts: Arc<R>, agents: Arc<A>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            accounts,
            agents,
            hasher,
        }
    }

    async fn reject_unknown_user(&self, password: &str) -> Error {
        let unmatchable = PasswordHash::new(UNMATCHABLE_HASH);
        if let Err(err) = self.hasher.verify(password, &unmatchable).await {
            warn!(error = %err, "placeholder verification failed");
        }
        invalid_credentials()
    }
}

/// Well-formed Argon2id hash that matches no password. Verified against
/// when the username is unknown so every failed login pays one hash.
const UNMATCHABLE_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$AQIDBAUGBwgJCgsMDQ4PEA$AQIDBAUGBwgJCgsMDQ4PEBESExQVFhcYGRobHB0eHyA";

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

#[async_trait]
impl<R, A> AccountsCommand for AccountService<R, A>
where
    R: AccountRepository,
    A: AgentRepository,
{
    async fn sign_up(&self, sign_up: SignUp) -> Result<User, Error> {
        let (details, password) = sign_up.into_parts();
        let hash = self.hasher.hash(password.expose()).await?;
        let (user, organisation_id) = self
            .accounts
            .create_organisor(&NewUser::organisor(details, hash))
            .await?;
        info!(
            user_id = %user.id(),
            organisation_id = %organisation_id,
            "organisor signed up"
        );
        Ok(user)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Ok(username) = Username::new(credentials.username()) else {
            return Err(self.reject_unknown_user(credentials.password()).await);
        };
        let Some(stored) = self.accounts.find_credentials(&username).await? else {
            return Err(self.reject_unknown_user(credentials.password()).await);
        };
        if self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await?
        {
            Ok(stored.user_id)
        } else {
            Err(invalid_credentials())
        }
    }
}

#[async_trait]
impl<R, A> CallerQuery for AccountService<R, A>
where
    R: AccountRepository,
    A: AgentRepository,
{
    async fn resolve_caller(&self, user_id: UserId) -> Result<Caller, Error> {
        let Some(user) = self.accounts.find_user(user_id).await? else {
            warn!(%user_id, "session refers to a missing user");
            return Err(Error::unauthorized("login required"));
        };

        if user.is_organisor() {
            let organisation_id = self
                .accounts
                .find_organisation(user_id)
                .await?
                .ok_or_else(|| Error::forbidden("user has no organisation"))?;
            return Ok(Caller::Organisor {
                user,
                organisation_id,
            });
        }

        if user.is_agent() {
            let agent = self
                .agents
                .find_by_user(user_id)
                .await?
                .ok_or_else(|| Error::forbidden("user has no agent profile"))?;
            return Ok(Caller::Agent {
                organisation_id: agent.organisation_id(),
                agent_id: agent.id(),
                user,
            });
        }

        Err(Error::forbidden("user has no role"))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
