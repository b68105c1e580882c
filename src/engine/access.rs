//! Access policy
//!
//! Write access to `(owner, repo)`: the actor is an admin, is the owner,
//! or appears in the collaborator set. Read access additionally covers
//! public repositories. Visibility changes and transfers are reserved to
//! the owner or an admin; collaborators can push but not repoint the
//! repository's policy.

use crate::engine::{Engine, Session};
use crate::error::{Denied, Error, Result};

impl Engine {
    pub(crate) fn has_write_access(
        &self,
        session: &Session,
        owner: &str,
        repo: &str,
    ) -> Result<bool> {
        if session.role.is_admin() || session.username == owner {
            return Ok(true);
        }
        let permissions = self.storage().load_permissions()?;
        Ok(permissions.is_collaborator(owner, repo, &session.username))
    }

    pub(crate) fn has_read_access(
        &self,
        session: &Session,
        owner: &str,
        repo: &str,
    ) -> Result<bool> {
        if self.has_write_access(session, owner, repo)? {
            return Ok(true);
        }
        Ok(self.storage().get_visibility(owner, repo)?.is_public())
    }

    pub(crate) fn check_write(&self, owner: &str, repo: &str) -> Result<Session> {
        let session = self.require_session()?.clone();
        if !self.has_write_access(&session, owner, repo)? {
            return Err(Error::PermissionDenied(Denied::Write));
        }
        Ok(session)
    }

    pub(crate) fn check_read(&self, owner: &str, repo: &str) -> Result<Session> {
        let session = self.require_session()?.clone();
        if !self.has_read_access(&session, owner, repo)? {
            return Err(Error::PermissionDenied(Denied::Read));
        }
        Ok(session)
    }

    pub(crate) fn check_owner(&self, owner: &str) -> Result<Session> {
        let session = self.require_session()?.clone();
        if !session.role.is_admin() && session.username != owner {
            return Err(Error::PermissionDenied(Denied::OwnerOnly));
        }
        Ok(session)
    }

    pub(crate) fn check_admin(&self) -> Result<Session> {
        let session = self.require_session()?.clone();
        if !session.role.is_admin() {
            return Err(Error::PermissionDenied(Denied::AdminOnly));
        }
        Ok(session)
    }
}
