//! Multi-tenant storage layout
//!
//! The workspace root holds everything the engine persists:
//!
//! ```text
//! ROOT/
//!   users.tsv            # username \t verifier \t role
//!   permissions.tsv      # owner/repo \t collaborator,collaborator,...
//!   <username>/<repo>/   # one directory per user, one per repository
//!   _remotes/            # mirror trees; any _-prefixed name is reserved
//! ```
//!
//! `Storage` is an explicit handle on that root; nothing in the engine
//! discovers paths from the current directory.

pub mod config;
pub mod permissions;
pub mod users;

use chrono::Local;
use std::path::{Path, PathBuf};

use crate::areas::repository::{Repository, GLITE_DIR, WORKSPACE_DIR};
use crate::error::{Error, Result};
use crate::objects::commit::TIMESTAMP_FORMAT;
use crate::storage::config::Visibility;

pub const USERS_FILE: &str = "users.tsv";
pub const PERMISSIONS_FILE: &str = "permissions.tsv";
pub const REMOTES_DIR: &str = "_remotes";
const RESERVED_PREFIX: char = '_';

#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Open the workspace root, creating the registry files and the mirror
    /// directory on first use.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        std::fs::create_dir_all(root.join(REMOTES_DIR))?;
        for file in [USERS_FILE, PERMISSIONS_FILE] {
            let path = root.join(file);
            if !path.exists() {
                std::fs::write(&path, "")?;
            }
        }
        Ok(Storage { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn users_path(&self) -> PathBuf {
        self.root.join(USERS_FILE)
    }

    pub fn permissions_path(&self) -> PathBuf {
        self.root.join(PERMISSIONS_FILE)
    }

    pub fn repo_path(&self, owner: &str, repo: &str) -> PathBuf {
        self.root.join(owner).join(repo)
    }

    /// Where a repository's mirror lives (`ROOT/_remotes/<owner>/<repo>`).
    pub fn remote_path(&self, owner: &str, repo: &str) -> PathBuf {
        self.root.join(REMOTES_DIR).join(owner).join(repo)
    }

    pub fn repo_exists(&self, owner: &str, repo: &str) -> bool {
        self.repo_path(owner, repo).is_dir()
    }

    pub fn ensure_user_folder(&self, username: &str) -> Result<()> {
        std::fs::create_dir_all(self.root.join(username))?;
        Ok(())
    }

    /// Create a repository skeleton. The directory must not exist yet.
    pub fn create_repo(&self, owner: &str, repo: &str) -> Result<()> {
        let repo_root = self.repo_path(owner, repo);
        if repo_root.exists() {
            return Err(Error::RepoExists(format!("{owner}/{repo}")));
        }

        let glite = repo_root.join(GLITE_DIR);
        std::fs::create_dir_all(glite.join("objects"))?;
        std::fs::create_dir_all(glite.join("refs").join("heads"))?;
        std::fs::create_dir_all(glite.join("refs").join("tags"))?;
        std::fs::create_dir_all(repo_root.join(WORKSPACE_DIR))?;

        std::fs::write(glite.join("HEAD"), "ref: main\n")?;
        std::fs::write(glite.join("refs").join("heads").join("main"), "")?;
        std::fs::write(glite.join("index"), "")?;
        std::fs::write(glite.join("log"), "")?;
        let created = Local::now().format(TIMESTAMP_FORMAT);
        std::fs::write(
            glite.join("config"),
            format!("name={repo}\nowner={owner}\nvisibility=private\ncreated={created}\n"),
        )?;
        Ok(())
    }

    pub fn delete_repo(&self, owner: &str, repo: &str) -> Result<()> {
        if !self.repo_exists(owner, repo) {
            return Err(Error::RepoNotFound {
                owner: owner.to_string(),
                name: repo.to_string(),
            });
        }
        std::fs::remove_dir_all(self.repo_path(owner, repo))?;
        Ok(())
    }

    pub fn open_repo(&self, owner: &str, repo: &str) -> Result<Repository> {
        if !self.repo_exists(owner, repo) {
            return Err(Error::RepoNotFound {
                owner: owner.to_string(),
                name: repo.to_string(),
            });
        }
        Repository::open(self.repo_path(owner, repo))
    }

    /// Repository names under one user's directory, sorted.
    pub fn list_user_repos(&self, username: &str) -> Result<Vec<String>> {
        let user_path = self.root.join(username);
        if !user_path.exists() {
            return Ok(Vec::new());
        }
        let mut repos = Vec::new();
        for entry in std::fs::read_dir(user_path)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                repos.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        repos.sort();
        Ok(repos)
    }

    /// Every `(owner, repo)` pair in the root, sorted. Reserved directories
    /// (leading underscore) are never treated as users.
    pub fn list_all_repos(&self) -> Result<Vec<(String, String)>> {
        let mut repos = Vec::new();
        for user_entry in std::fs::read_dir(&self.root)? {
            let user_entry = user_entry?;
            if !user_entry.file_type()?.is_dir() {
                continue;
            }
            let username = user_entry.file_name().to_string_lossy().to_string();
            if username.starts_with(RESERVED_PREFIX) {
                continue;
            }
            for repo_entry in std::fs::read_dir(user_entry.path())? {
                let repo_entry = repo_entry?;
                if repo_entry.file_type()?.is_dir() {
                    repos.push((
                        username.clone(),
                        repo_entry.file_name().to_string_lossy().to_string(),
                    ));
                }
            }
        }
        repos.sort();
        Ok(repos)
    }

    pub fn set_visibility(&self, owner: &str, repo: &str, visibility: Visibility) -> Result<()> {
        if !self.repo_exists(owner, repo) {
            return Err(Error::RepoNotFound {
                owner: owner.to_string(),
                name: repo.to_string(),
            });
        }
        let config = self.open_repo(owner, repo)?.config();
        config.set("visibility", visibility.as_str())
    }

    /// Missing config files or unknown values read as private.
    pub fn get_visibility(&self, owner: &str, repo: &str) -> Result<Visibility> {
        if !self.repo_exists(owner, repo) {
            return Ok(Visibility::Private);
        }
        let config = self.open_repo(owner, repo)?.config();
        Ok(config
            .get("visibility")?
            .map(|value| Visibility::parse(&value))
            .unwrap_or(Visibility::Private))
    }

    // Registry saves replace the whole file; writing to a temp file and
    // renaming keeps a crash from truncating the registry.
    pub(crate) fn write_atomic(&self, path: &Path, content: &str) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::corrupt(format!("no parent for {}", path.display())))?;
        let name = path
            .file_name()
            .ok_or_else(|| Error::corrupt(format!("no file name in {}", path.display())))?;
        let temp = parent.join(format!(".{}.tmp", name.to_string_lossy()));
        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, path)?;
        Ok(())
    }
}
