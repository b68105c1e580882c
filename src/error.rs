//! Engine error taxonomy
//!
//! Every public operation returns `Result<T>` with a closed set of error
//! variants. Errors are values the caller can present; the engine never
//! panics on a recoverable failure.

use std::path::PathBuf;
use thiserror::Error;

/// The access level a denied operation required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denied {
    /// Repository is private and the actor is neither collaborator nor admin
    Read,
    /// Actor is not the owner, a collaborator, or an admin
    Write,
    /// Operation is reserved to admins
    AdminOnly,
    /// Operation is reserved to the owner (or an admin)
    OwnerOnly,
}

impl std::fmt::Display for Denied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Denied::Read => "read access required",
            Denied::Write => "write access required",
            Denied::AdminOnly => "admin privileges required",
            Denied::OwnerOnly => "only the owner or an admin may do this",
        };
        write!(f, "{}", reason)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("not logged in")]
    NotLoggedIn,

    #[error("{} is not a glite repository", .0.display())]
    NotARepository(PathBuf),

    #[error("repository '{owner}/{name}' not found")]
    RepoNotFound { owner: String, name: String },

    #[error("repository '{0}' already exists")]
    RepoExists(String),

    #[error("branch '{0}' already exists")]
    BranchExists(String),

    #[error("tag '{0}' already exists")]
    TagExists(String),

    #[error("branch '{0}' not found")]
    BranchNotFound(String),

    #[error("commit {0} not found")]
    CommitNotFound(String),

    #[error("'{0}' is not staged")]
    FileNotStaged(String),

    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("permission denied: {0}")]
    PermissionDenied(Denied),

    #[error("{0}")]
    Conflict(String),

    #[error("filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    #[error("credential subsystem error: {0}")]
    Hashing(String),
}

impl Error {
    /// Shorthand for conflict errors, which carry a free-form reason.
    pub fn conflict(reason: impl Into<String>) -> Self {
        Error::Conflict(reason.into())
    }

    /// Wrap malformed on-disk data as an `InvalidData` filesystem error.
    pub fn corrupt(what: impl Into<String>) -> Self {
        Error::Filesystem(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            what.into(),
        ))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
