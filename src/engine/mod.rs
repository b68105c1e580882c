//! Multi-user engine
//!
//! The engine ties the storage layout, the credential subsystem, and the
//! permission policy together behind one handle. It owns at most one
//! active session; operations that need an identity fail with
//! `NotLoggedIn` when none is active.
//!
//! The workspace root is an explicit handle (nothing here consults the
//! current directory), and the credential subsystem is a trait object so
//! tests can swap in a deterministic stub.

mod access;

use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

use crate::areas::repository::{Repository, GLITE_DIR, WORKSPACE_DIR};
use crate::error::{Error, Result};
use crate::hashing::Credentials;
use crate::identity::{validate_identifier, validate_username, Role, User, PASSWORD_MIN_LEN};
use crate::ops::mirror::copy_tree;
use crate::storage::config::Visibility;
use crate::storage::Storage;

/// An authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

pub struct Engine {
    storage: Storage,
    credentials: Box<dyn Credentials>,
    session: Option<Session>,
}

impl Engine {
    pub fn new(storage: Storage, credentials: Box<dyn Credentials>) -> Self {
        Engine {
            storage,
            credentials,
            session: None,
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub(crate) fn require_session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(Error::NotLoggedIn)
    }

    // ---- identity ----------------------------------------------------

    /// Register a new user. The first user ever registered becomes admin.
    pub fn register(&mut self, username: &str, password: &str) -> Result<User> {
        validate_username(username)?;
        if password.len() < PASSWORD_MIN_LEN {
            return Err(Error::conflict(format!(
                "password must be at least {PASSWORD_MIN_LEN} characters"
            )));
        }

        let mut users = self.storage.load_users()?;
        if users.iter().any(|user| user.username == username) {
            return Err(Error::conflict(format!(
                "username '{username}' already exists"
            )));
        }

        let role = if users.is_empty() {
            Role::Admin
        } else {
            Role::User
        };
        let user = User {
            username: username.to_string(),
            verifier: self.credentials.make(password)?,
            role,
        };
        users.push(user.clone());
        self.storage.save_users(&users)?;
        self.storage.ensure_user_folder(username)?;

        info!(username, role = %role, "registered user");
        Ok(user)
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<Session> {
        let Some(user) = self.storage.find_user(username)? else {
            return Err(Error::conflict("invalid username or password"));
        };
        if !self.credentials.verify(&user.verifier, password)? {
            return Err(Error::conflict("invalid username or password"));
        }
        let session = Session {
            username: user.username,
            role: user.role,
        };
        self.session = Some(session.clone());
        Ok(session)
    }

    pub fn logout(&mut self) {
        self.session = None;
    }

    /// Promote a user to admin. Admin only.
    pub fn make_admin(&self, username: &str) -> Result<()> {
        self.check_admin()?;
        self.update_role(username, Role::Admin)
    }

    /// Demote an admin to a regular user. Admin only; self-demotion is
    /// forbidden so the engine never runs out of admins.
    pub fn remove_admin(&self, username: &str) -> Result<()> {
        let session = self.check_admin()?;
        if session.username == username {
            return Err(Error::conflict("cannot demote yourself"));
        }
        self.update_role(username, Role::User)
    }

    fn update_role(&self, username: &str, role: Role) -> Result<()> {
        let mut users = self.storage.load_users()?;
        let user = users
            .iter_mut()
            .find(|user| user.username == username)
            .ok_or_else(|| Error::conflict(format!("user '{username}' not found")))?;
        user.role = role;
        self.storage.save_users(&users)?;
        info!(username, role = %role, "changed role");
        Ok(())
    }

    pub fn list_users(&self) -> Result<Vec<(String, Role)>> {
        Ok(self
            .storage
            .load_users()?
            .into_iter()
            .map(|user| (user.username, user.role))
            .collect())
    }

    fn user_exists(&self, username: &str) -> Result<bool> {
        Ok(self.storage.find_user(username)?.is_some())
    }

    // ---- repositories ------------------------------------------------

    /// Create a repository in the session user's namespace.
    pub fn create_repo(&self, name: &str) -> Result<()> {
        let session = self.require_session()?;
        validate_identifier(name)?;
        self.storage.create_repo(&session.username, name)
    }

    /// Delete a repository and its permission-map entry. Requires write
    /// access.
    pub fn delete_repo(&self, owner: &str, name: &str) -> Result<()> {
        self.ensure_repo(owner, name)?;
        self.check_write(owner, name)?;
        self.storage.delete_repo(owner, name)?;

        let mut permissions = self.storage.load_permissions()?;
        permissions.remove_repo(owner, name);
        self.storage.save_permissions(&permissions)?;
        info!(repo = %format!("{owner}/{name}"), "deleted repository");
        Ok(())
    }

    /// Open a repository for reading (public, collaborator, owner, admin).
    pub fn open_repo_for_read(&self, owner: &str, name: &str) -> Result<Repository> {
        self.ensure_repo(owner, name)?;
        self.check_read(owner, name)?;
        self.storage.open_repo(owner, name)
    }

    /// Open a repository for mutation (owner, collaborator, admin).
    pub fn open_repo_for_write(&self, owner: &str, name: &str) -> Result<Repository> {
        self.ensure_repo(owner, name)?;
        self.check_write(owner, name)?;
        self.storage.open_repo(owner, name)
    }

    /// Toggle visibility. Collaborators can push, but only the owner or an
    /// admin may repoint the repository's policy.
    pub fn set_visibility(&self, owner: &str, name: &str, visibility: Visibility) -> Result<()> {
        self.ensure_repo(owner, name)?;
        self.check_owner(owner)?;
        self.storage.set_visibility(owner, name, visibility)?;
        info!(repo = %format!("{owner}/{name}"), visibility = %visibility, "set visibility");
        Ok(())
    }

    pub fn get_visibility(&self, owner: &str, name: &str) -> Result<Visibility> {
        self.storage.get_visibility(owner, name)
    }

    // ---- collaborators -----------------------------------------------

    pub fn add_collaborator(&self, owner: &str, name: &str, username: &str) -> Result<()> {
        self.ensure_repo(owner, name)?;
        self.check_write(owner, name)?;
        if !self.user_exists(username)? {
            return Err(Error::conflict(format!("user '{username}' not found")));
        }
        if username == owner {
            return Err(Error::conflict("owner already has access"));
        }

        let mut permissions = self.storage.load_permissions()?;
        permissions.grant(owner, name, username);
        self.storage.save_permissions(&permissions)?;
        info!(repo = %format!("{owner}/{name}"), username, "added collaborator");
        Ok(())
    }

    pub fn remove_collaborator(&self, owner: &str, name: &str, username: &str) -> Result<()> {
        self.ensure_repo(owner, name)?;
        self.check_write(owner, name)?;
        let mut permissions = self.storage.load_permissions()?;
        permissions.revoke(owner, name, username);
        self.storage.save_permissions(&permissions)?;
        Ok(())
    }

    pub fn list_collaborators(&self, owner: &str, name: &str) -> Result<BTreeSet<String>> {
        self.ensure_repo(owner, name)?;
        self.check_read(owner, name)?;
        Ok(self.storage.load_permissions()?.collaborators(owner, name))
    }

    // ---- mirrors, forks, transfers -----------------------------------

    /// Push a repository to its mirror under `_remotes/`.
    pub fn push_repo(&self, owner: &str, name: &str) -> Result<()> {
        let repo = self.open_repo_for_write(owner, name)?;
        repo.push(&self.storage.remote_path(owner, name))
    }

    /// Pull a repository back from its mirror.
    pub fn pull_repo(&self, owner: &str, name: &str) -> Result<()> {
        let repo = self.open_repo_for_write(owner, name)?;
        repo.pull(&self.storage.remote_path(owner, name))
    }

    /// Fork an accessible repository into the session user's namespace as
    /// `<name>-fork`, probing `<name>-fork1`, `<name>-fork2`, … on
    /// collision. Returns the new repository name.
    pub fn fork(&self, owner: &str, name: &str) -> Result<String> {
        self.ensure_repo(owner, name)?;
        let session = self.check_read(owner, name)?;

        let base = format!("{name}-fork");
        let mut fork_name = base.clone();
        let mut attempt = 0;
        while self.storage.repo_exists(&session.username, &fork_name) {
            attempt += 1;
            if attempt > 100 {
                return Err(Error::conflict("could not find a free fork name"));
            }
            fork_name = format!("{base}{attempt}");
        }
        self.storage.create_repo(&session.username, &fork_name)?;

        let fork = self.storage.open_repo(&session.username, &fork_name)?;
        fork.pull(&self.storage.repo_path(owner, name))?;
        info!(
            from = %format!("{owner}/{name}"),
            to = %format!("{}/{fork_name}", session.username),
            "forked repository"
        );
        Ok(fork_name)
    }

    /// Move a repository to another user's namespace, rewriting its
    /// permission-map key. Owner or admin only.
    pub fn transfer(&self, owner: &str, name: &str, new_owner: &str) -> Result<()> {
        self.ensure_repo(owner, name)?;
        self.check_owner(owner)?;
        if !self.user_exists(new_owner)? {
            return Err(Error::conflict(format!("user '{new_owner}' not found")));
        }
        if self.storage.repo_exists(new_owner, name) {
            return Err(Error::conflict(format!(
                "repository '{name}' already exists for user '{new_owner}'"
            )));
        }

        self.storage.ensure_user_folder(new_owner)?;
        std::fs::rename(
            self.storage.repo_path(owner, name),
            self.storage.repo_path(new_owner, name),
        )?;

        let mut permissions = self.storage.load_permissions()?;
        permissions.rename_repo(owner, new_owner, name);
        self.storage.save_permissions(&permissions)?;
        info!(
            repo = name,
            from = owner,
            to = new_owner,
            "transferred repository"
        );
        Ok(())
    }

    /// Copy an accessible repository into a fresh directory outside the
    /// workspace root.
    pub fn clone_repo(&self, owner: &str, name: &str, destination: &Path) -> Result<()> {
        self.ensure_repo(owner, name)?;
        self.check_read(owner, name)?;
        if destination.exists() {
            return Err(Error::conflict(format!(
                "destination '{}' already exists",
                destination.display()
            )));
        }
        let source = self.storage.repo_path(owner, name);
        std::fs::create_dir_all(destination)?;
        copy_tree(&source.join(GLITE_DIR), &destination.join(GLITE_DIR))?;
        copy_tree(
            &source.join(WORKSPACE_DIR),
            &destination.join(WORKSPACE_DIR),
        )?;
        Ok(())
    }

    /// Admin listing of every repository with its visibility.
    pub fn list_all_repos_with_visibility(&self) -> Result<Vec<(String, String, Visibility)>> {
        self.check_admin()?;
        let mut listing = Vec::new();
        for (owner, repo) in self.storage.list_all_repos()? {
            let visibility = self.storage.get_visibility(&owner, &repo)?;
            listing.push((owner, repo, visibility));
        }
        Ok(listing)
    }

    fn ensure_repo(&self, owner: &str, name: &str) -> Result<()> {
        if !self.storage.repo_exists(owner, name) {
            return Err(Error::RepoNotFound {
                owner: owner.to_string(),
                name: name.to_string(),
            });
        }
        Ok(())
    }
}
