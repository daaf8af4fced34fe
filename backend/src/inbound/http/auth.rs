//! Caller resolution shared by the authenticated handlers.
//!
//! Keeps the session lookup and role resolution in one place so every
//! handler starts from the same [`Caller`].

use actix_web::web;

use crate::domain::{Caller, Error};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Resolve the signed-in user into a [`Caller`].
///
/// No session yields `401`; a session whose user has neither an organisation
/// nor an agent profile yields `403`.
pub async fn current_caller(
    state: &web::Data<HttpState>,
    session: &SessionContext,
) -> Result<Caller, Error> {
    let user_id = session.require_user_id()?;
    state.callers.resolve_caller(user_id).await
}
