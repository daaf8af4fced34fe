//! Authentication primitives: login credentials, password policy and sign-up.
//!
//! Passwords are held in [`Zeroizing`] buffers so they are wiped once the
//! request that carried them is done.

use std::fmt;

use zeroize::Zeroizing;

use super::{FieldError, PersonalDetails, PersonalDetailsDraft, Username};

/// Minimum password length accepted at sign-up.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Frequently breached passwords long enough to pass the length rule.
/// Compared after trimming and lower-casing.
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password12",
    "password123",
    "passw0rd",
    "p@ssw0rd",
    "iloveyou",
    "sunshine",
    "princess",
    "football",
    "baseball",
    "welcome1",
    "welcome123",
    "letmein1",
    "trustno1",
    "superman",
    "starwars",
    "whatever",
    "qwertyuiop",
    "qwerty123",
    "1q2w3e4r",
    "1qaz2wsx",
    "zaq12wsx",
    "abc12345",
    "abcd1234",
    "asdfghjkl",
    "charlie1",
    "michelle",
    "jennifer",
    "computer",
    "internet",
    "mustang1",
    "changeme",
    "administrator",
];

fn is_common_password(password: &str) -> bool {
    let normalized = password.trim().to_lowercase();
    COMMON_PASSWORDS.contains(&normalized.as_str())
}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use crm::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" owner ", "s3cret-pass").unwrap();
/// assert_eq!(creds.username(), "owner");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, FieldError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(FieldError::new(
                "username",
                "required",
                "username must not be empty",
            ));
        }
        if password.is_empty() {
            return Err(FieldError::new(
                "password",
                "required",
                "password must not be empty",
            ));
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// A PHC-format password hash as stored in the `users` table.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// A plaintext password that passed the sign-up policy.
///
/// Policy: the confirmation matches, it has at least [`PASSWORD_MIN_LEN`]
/// characters, it is not entirely numeric, it is not a well-known common
/// password and it differs from the username (case-insensitively).
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    /// Apply the password policy for the account named `username`.
    pub fn try_new(
        password: &str,
        confirmation: &str,
        username: &Username,
    ) -> Result<Self, FieldError> {
        if password != confirmation {
            return Err(FieldError::new(
                "passwordConfirmation",
                "password_mismatch",
                "the two password fields didn't match",
            ));
        }
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(FieldError::new(
                "password",
                "password_too_short",
                format!("password must contain at least {PASSWORD_MIN_LEN} characters"),
            ));
        }
        if password.chars().all(|c| c.is_ascii_digit()) {
            return Err(FieldError::new(
                "password",
                "password_entirely_numeric",
                "password can't be entirely numeric",
            ));
        }
        if is_common_password(password) {
            return Err(FieldError::new(
                "password",
                "password_too_common",
                "this password is too common",
            ));
        }
        if password.eq_ignore_ascii_case(username.as_str()) {
            return Err(FieldError::new(
                "password",
                "password_too_similar",
                "password is too similar to the username",
            ));
        }
        Ok(Self(Zeroizing::new(password.to_owned())))
    }

    /// Wrap a generated password; generated values bypass the policy.
    pub(crate) fn generated(password: String) -> Self {
        Self(Zeroizing::new(password))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(..)")
    }
}

/// Raw sign-up submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpDraft {
    pub details: PersonalDetailsDraft,
    pub password: String,
    pub password_confirmation: String,
}

/// A validated organisor registration.
#[derive(Debug, Clone)]
pub struct SignUp {
    details: PersonalDetails,
    password: NewPassword,
}

impl SignUp {
    /// Validate the personal details, then the password against them.
    pub fn try_new(draft: SignUpDraft) -> Result<Self, FieldError> {
        let SignUpDraft {
            details,
            password,
            password_confirmation,
        } = draft;
        let password = Zeroizing::new(password);
        let password_confirmation = Zeroizing::new(password_confirmation);
        let details = PersonalDetails::try_new(details)?;
        let password = NewPassword::try_new(&password, &password_confirmation, details.username())?;
        Ok(Self { details, password })
    }

    pub fn details(&self) -> &PersonalDetails {
        &self.details
    }

    pub fn password(&self) -> &NewPassword {
        &self.password
    }

    pub fn into_parts(self) -> (PersonalDetails, NewPassword) {
        (self.details, self.password)
    }
}
