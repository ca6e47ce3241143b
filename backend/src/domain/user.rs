//! User data model.
//!
//! Users are keyed by their username. Each user carries the family code that
//! decides which tasks they can see; the code is mutable and never frozen
//! into the tasks they author.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username shorter than [`USERNAME_MIN`].
    #[error("username must be at least {min} characters")]
    UsernameTooShort { min: usize },
    /// Username longer than [`USERNAME_MAX`].
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    /// Username contains characters outside the allowed set.
    #[error("username may only contain letters, numbers, '.', '-' or '_'")]
    UsernameInvalidCharacters,
    /// Family code is not six digits in the range 100000..=999999.
    #[error("family code must be a six-digit number between 100000 and 999999")]
    InvalidFamilyCode,
    /// Stored password hash was blank.
    #[error("password hash must not be empty")]
    EmptyPasswordHash,
}

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 32;

/// Unique, case-sensitive account name.
///
/// ## Invariants
/// - Surrounding whitespace is trimmed before validation.
/// - Length is within [`USERNAME_MIN`]..=[`USERNAME_MAX`] characters.
/// - Only ASCII letters, digits, `.`, `-` and `_` are accepted.
///
/// # Examples
/// ```
/// use taskboard::domain::Username;
///
/// let name = Username::new("  alice ").expect("valid username");
/// assert_eq!(name.as_ref(), "alice");
/// assert!(Username::new("a b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }

        let length = trimmed.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }

        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_');
        if !trimmed.chars().all(allowed) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }

        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Smallest family code that can be issued or chosen.
pub const FAMILY_CODE_MIN: u32 = 100_000;
/// Largest family code that can be issued or chosen.
pub const FAMILY_CODE_MAX: u32 = 999_999;

/// Six-digit token shared by users who see each other's tasks.
///
/// Codes are not unique per family: anyone who knows or happens to generate
/// the same value joins the same group.
///
/// # Examples
/// ```
/// use taskboard::domain::FamilyCode;
///
/// let code = FamilyCode::new("482913").expect("valid code");
/// assert_eq!(code.value(), 482_913);
/// assert!(FamilyCode::new("012345").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FamilyCode(u32);

impl FamilyCode {
    /// Parse a family code from user input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.len() != 6 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(UserValidationError::InvalidFamilyCode);
        }
        let value = trimmed
            .parse::<u32>()
            .map_err(|_| UserValidationError::InvalidFamilyCode)?;
        Self::from_value(value)
    }

    /// Construct a family code from its numeric value.
    pub fn from_value(value: u32) -> Result<Self, UserValidationError> {
        if (FAMILY_CODE_MIN..=FAMILY_CODE_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(UserValidationError::InvalidFamilyCode)
        }
    }

    /// Draw a uniformly distributed code from `rng`.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(FAMILY_CODE_MIN..=FAMILY_CODE_MAX))
    }

    /// Numeric value of the code.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FamilyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<FamilyCode> for String {
    fn from(value: FamilyCode) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for FamilyCode {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque PHC-format password hash as stored by persistence adapters.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash string.
    pub fn new(encoded: impl Into<String>) -> Result<Self, UserValidationError> {
        let encoded = encoded.into();
        if encoded.trim().is_empty() {
            return Err(UserValidationError::EmptyPasswordHash);
        }
        Ok(Self(encoded))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Registered account.
///
/// ## Invariants
/// - `username` is unique across all users.
/// - `family_code` reflects the current membership; changing it re-scopes
///   visibility of every task the user ever authored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    username: Username,
    password_hash: PasswordHash,
    family_code: FamilyCode,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(username: Username, password_hash: PasswordHash, family_code: FamilyCode) -> Self {
        Self {
            username,
            password_hash,
            family_code,
        }
    }

    /// Account name and identity key.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Stored credential hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Current family code.
    pub fn family_code(&self) -> FamilyCode {
        self.family_code
    }

    /// Return a copy of the user moved to another family.
    #[must_use]
    pub fn with_family_code(mut self, family_code: FamilyCode) -> Self {
        self.family_code = family_code;
        self
    }
}
