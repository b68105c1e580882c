//! Users, roles, and identifier validation
//!
//! Usernames, repository names, branch names, and tag names all share one
//! character class: `[A-Za-z0-9._-]+`. Usernames additionally carry a
//! 3..=32 length rule. The first user ever registered becomes admin.

use crate::error::{Error, Result};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 32;
pub const PASSWORD_MIN_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Unknown role strings degrade to the unprivileged role.
    pub fn parse(value: &str) -> Role {
        match value {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered user. The verifier is an opaque credential string; the
/// engine never sees a plaintext password after registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub verifier: String,
    pub role: Role,
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_'
}

pub fn is_valid_identifier(value: &str) -> bool {
    !value.is_empty() && value.chars().all(is_identifier_char)
}

/// Validate a username: identifier class plus the 3..=32 length rule.
pub fn validate_username(value: &str) -> Result<()> {
    if value.len() < USERNAME_MIN_LEN || value.len() > USERNAME_MAX_LEN {
        return Err(Error::InvalidIdentifier(value.to_string()));
    }
    validate_identifier(value)
}

/// Validate a repository, branch, or tag name.
pub fn validate_identifier(value: &str) -> Result<()> {
    if is_valid_identifier(value) {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier(value.to_string()))
    }
}
