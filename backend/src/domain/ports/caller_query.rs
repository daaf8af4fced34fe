//! Driving port resolving a session user into a [`Caller`].

use async_trait::async_trait;

use crate::domain::{Caller, Error, UserId};

#[async_trait]
pub trait CallerQuery: Send + Sync {
    /// Resolve the role and organisation of the session user.
    ///
    /// Unknown users yield `unauthorized`; users without an organisation or
    /// agent profile yield `forbidden`.
    async fn resolve_caller(&self, user_id: UserId) -> Result<Caller, Error>;
}
