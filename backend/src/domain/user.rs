//! User identities and the personal details shared by organisors and agents.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::fields::{optional_text, required_text};
use super::{FieldError, PasswordHash, UserId};

/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 150;
/// Maximum length for first and last names on a user.
pub const USER_NAME_PART_MAX: usize = 150;
/// Maximum email length in characters.
pub const EMAIL_MAX: usize = 254;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9@.+_-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Login name: 1..=150 letters, digits and `@.+-_`.
///
/// # Examples
/// ```
/// use crm::domain::Username;
///
/// assert!(Username::new("jane.doe+crm@example").is_ok());
/// assert!(Username::new("jane doe").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a username.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, FieldError> {
        let value = required_text("username", raw.as_ref(), USERNAME_MAX)?;
        if !username_regex().is_match(&value) {
            return Err(FieldError::new(
                "username",
                "invalid_characters",
                "username may only contain letters, digits and @/./+/-/_",
            ));
        }
        Ok(Self(value))
    }

    /// Borrow the username.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// Email address shaped like `local@domain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate an email address for the named field.
    pub fn parse(field: &'static str, raw: &str) -> Result<Self, FieldError> {
        let value = required_text(field, raw, EMAIL_MAX)?;
        if !email_regex().is_match(&value) {
            return Err(FieldError::new(
                field,
                "invalid_email",
                format!("{field} must be a valid email address"),
            ));
        }
        Ok(Self(value))
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse("email", &value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Unvalidated personal details as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalDetailsDraft {
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

/// Validated personal details of a user account.
///
/// ## Invariants
/// - `username` satisfies [`Username`] rules.
/// - `first_name` and `last_name` are trimmed and at most 150 characters;
///   either may be blank.
/// - A blank email is stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalDetails {
    username: Username,
    email: Option<EmailAddress>,
    first_name: String,
    last_name: String,
}

impl PersonalDetails {
    /// Validate a draft.
    ///
    /// # Examples
    /// ```
    /// use crm::domain::{PersonalDetails, PersonalDetailsDraft};
    ///
    /// let details = PersonalDetails::try_new(PersonalDetailsDraft {
    ///     username: "sam".into(),
    ///     email: Some("  ".into()),
    ///     first_name: "Sam".into(),
    ///     last_name: String::new(),
    /// })
    /// .expect("valid details");
    /// assert!(details.email().is_none());
    /// ```
    pub fn try_new(draft: PersonalDetailsDraft) -> Result<Self, FieldError> {
        let PersonalDetailsDraft {
            username,
            email,
            first_name,
            last_name,
        } = draft;
        let email = match email.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(EmailAddress::parse("email", raw)?),
        };
        Ok(Self {
            username: Username::new(username)?,
            email,
            first_name: optional_text("firstName", &first_name, USER_NAME_PART_MAX)?,
            last_name: optional_text("lastName", &last_name, USER_NAME_PART_MAX)?,
        })
    }

    /// Require an email address, as agent invitations are addressed by email.
    pub fn require_email(self) -> Result<Self, FieldError> {
        if self.email.is_none() {
            return Err(FieldError::new(
                "email",
                "required",
                "email must not be empty",
            ));
        }
        Ok(self)
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }
}

/// Persisted user account.
///
/// The role flags mirror the database columns; [`super::Caller`] resolution
/// decides which one wins when both are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    details: PersonalDetails,
    is_organisor: bool,
    is_agent: bool,
}

impl User {
    pub fn new(id: UserId, details: PersonalDetails, is_organisor: bool, is_agent: bool) -> Self {
        Self {
            id,
            details,
            is_organisor,
            is_agent,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn details(&self) -> &PersonalDetails {
        &self.details
    }

    pub fn username(&self) -> &Username {
        self.details.username()
    }

    pub fn is_organisor(&self) -> bool {
        self.is_organisor
    }

    pub fn is_agent(&self) -> bool {
        self.is_agent
    }

    /// Replace the personal details, keeping identity and role flags.
    #[must_use]
    pub fn with_details(mut self, details: PersonalDetails) -> Self {
        self.details = details;
        self
    }
}

/// A user account ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    details: PersonalDetails,
    password_hash: PasswordHash,
    is_organisor: bool,
    is_agent: bool,
}

impl NewUser {
    /// Account for a self-registered organisor.
    pub fn organisor(details: PersonalDetails, password_hash: PasswordHash) -> Self {
        Self {
            details,
            password_hash,
            is_organisor: true,
            is_agent: false,
        }
    }

    /// Account for an agent created by an organisor.
    pub fn agent(details: PersonalDetails, password_hash: PasswordHash) -> Self {
        Self {
            details,
            password_hash,
            is_organisor: false,
            is_agent: true,
        }
    }

    pub fn details(&self) -> &PersonalDetails {
        &self.details
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn is_organisor(&self) -> bool {
        self.is_organisor
    }

    pub fn is_agent(&self) -> bool {
        self.is_agent
    }

    /// The persisted user this account becomes once assigned an id.
    pub fn into_user(self, id: UserId) -> User {
        User::new(id, self.details, self.is_organisor, self.is_agent)
    }
}
