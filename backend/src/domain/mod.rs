//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed CRM entities (users, organisations, agents,
//! leads, categories), the access rules that scope every lookup, and the
//! services implementing the driving ports. Types validate on construction so
//! adapters never hold an invalid value.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.
//! - [`Caller`] / [`RecordScope`] / [`LeadFilter`]: role-based visibility.
//! - [`AccountService`], [`LeadService`], [`CategoryService`],
//!   [`AgentService`]: use-case implementations over the [`ports`].

pub mod access;
pub mod account_service;
pub mod agent;
pub mod agent_service;
pub mod auth;
pub mod category;
pub mod category_service;
pub mod error;
pub(crate) mod fields;
pub mod ids;
pub mod lead;
pub mod lead_service;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::access::{
    AgentFilter, Caller, CategoryFilter, LeadFilter, RecordScope, require_anonymous,
};
pub use self::account_service::AccountService;
pub use self::agent::Agent;
pub use self::agent_service::{AgentService, GENERATED_PASSWORD_LEN};
pub use self::auth::{
    LoginCredentials, NewPassword, PASSWORD_MIN_LEN, PasswordHash, SignUp, SignUpDraft,
};
pub use self::category::{CATEGORY_NAME_MAX, Category, CategoryName};
pub use self::category_service::CategoryService;
pub use self::error::{Error, ErrorCode, FieldError};
pub use self::ids::{AgentId, CategoryId, LeadId, OrganisationId, UserId};
pub use self::lead::{
    DESCRIPTION_MAX, LEAD_AGE_MAX, LEAD_NAME_MAX, Lead, LeadFields, LeadFieldsDraft, NewLead,
    PHONE_NUMBER_MAX,
};
pub use self::lead_service::LeadService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EMAIL_MAX, EmailAddress, NewUser, PersonalDetails, PersonalDetailsDraft, USER_NAME_PART_MAX,
    USERNAME_MAX, User, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use crm::domain::{ApiResult, Error};
///
/// fn guard(allowed: bool) -> ApiResult<()> {
///     if allowed { Ok(()) } else { Err(Error::forbidden("nope")) }
/// }
///
/// assert!(guard(false).is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
