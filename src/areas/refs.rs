//! References: branch heads, tags, HEAD
//!
//! All references are plain text files:
//!
//! - `HEAD` holds exactly `ref: <branch>\n`, a symbolic pointer to the
//!   current branch;
//! - `refs/heads/<branch>` holds the branch's head commit id, or nothing
//!   for a branch with no commits yet;
//! - `refs/tags/<tag>` holds a frozen commit id.

use derive_new::new;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::objects::object_id::ObjectId;

pub const DEFAULT_BRANCH: &str = "main";

/// Reference manager rooted at a repository's `.glite` directory.
#[derive(Debug, new)]
pub struct Refs {
    path: Box<Path>,
}

impl Refs {
    pub fn head_path(&self) -> PathBuf {
        self.path.join("HEAD")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.path.join("refs").join("heads")
    }

    pub fn tags_path(&self) -> PathBuf {
        self.path.join("refs").join("tags")
    }

    fn branch_path(&self, name: &str) -> PathBuf {
        self.heads_path().join(name)
    }

    /// The branch HEAD points at. A missing or malformed HEAD reads as the
    /// default branch.
    pub fn current_branch(&self) -> Result<String> {
        let content = match std::fs::read_to_string(self.head_path()) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(DEFAULT_BRANCH.to_string());
            }
            Err(e) => return Err(e.into()),
        };
        let line = content.lines().next().unwrap_or("").trim();
        match line.strip_prefix("ref:") {
            Some(branch) => Ok(branch.trim().to_string()),
            None => Ok(DEFAULT_BRANCH.to_string()),
        }
    }

    /// Point HEAD at a branch. The caller checks the branch exists; this
    /// only rewrites the pointer.
    pub fn set_current_branch(&self, name: &str) -> Result<()> {
        std::fs::write(self.head_path(), format!("ref: {name}\n"))?;
        Ok(())
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        self.branch_path(name).exists()
    }

    /// Read a branch's head commit id. `Ok(None)` means the branch exists
    /// but has no commits; a missing ref file is an error.
    pub fn branch_head(&self, name: &str) -> Result<Option<ObjectId>> {
        let path = self.branch_path(name);
        if !path.exists() {
            return Err(Error::BranchNotFound(name.to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let line = content.trim();
        if line.is_empty() {
            Ok(None)
        } else {
            Ok(Some(ObjectId::try_parse(line)?))
        }
    }

    pub fn update_branch(&self, name: &str, id: &ObjectId) -> Result<()> {
        std::fs::create_dir_all(self.heads_path())?;
        std::fs::write(self.branch_path(name), format!("{id}\n"))?;
        Ok(())
    }

    /// Create a branch rooted at the given head (empty until its first
    /// commit when `None`).
    pub fn create_branch(&self, name: &str, head: Option<&ObjectId>) -> Result<()> {
        let path = self.branch_path(name);
        if path.exists() {
            return Err(Error::BranchExists(name.to_string()));
        }
        std::fs::create_dir_all(self.heads_path())?;
        let content = match head {
            Some(id) => format!("{id}\n"),
            None => "\n".to_string(),
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn delete_branch(&self, name: &str) -> Result<()> {
        let path = self.branch_path(name);
        if !path.exists() {
            return Err(Error::BranchNotFound(name.to_string()));
        }
        std::fs::remove_file(path)?;
        Ok(())
    }

    pub fn rename_branch(&self, old: &str, new: &str) -> Result<()> {
        let old_path = self.branch_path(old);
        let new_path = self.branch_path(new);
        if !old_path.exists() {
            return Err(Error::BranchNotFound(old.to_string()));
        }
        if new_path.exists() {
            return Err(Error::BranchExists(new.to_string()));
        }
        std::fs::rename(old_path, new_path)?;
        if self.current_branch()? == old {
            self.set_current_branch(new)?;
        }
        Ok(())
    }

    /// All branches with their heads, sorted by branch name.
    pub fn list_branches(&self) -> Result<Vec<(String, Option<ObjectId>)>> {
        let dir = self.heads_path();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut branches = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            let head = self.branch_head(&name)?;
            branches.push((name, head));
        }
        branches.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(branches)
    }

    pub fn create_tag(&self, name: &str, id: &ObjectId) -> Result<()> {
        let dir = self.tags_path();
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(name);
        if path.exists() {
            return Err(Error::TagExists(name.to_string()));
        }
        std::fs::write(path, format!("{id}\n"))?;
        Ok(())
    }

    /// Tag names in directory order; ordering is the caller's concern.
    pub fn list_tags(&self) -> Result<Vec<String>> {
        let dir = self.tags_path();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut tags = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                tags.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        Ok(tags)
    }

    pub fn tag_target(&self, name: &str) -> Result<Option<ObjectId>> {
        let path = self.tags_path().join(name);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let line = content.trim();
        if line.is_empty() {
            Ok(None)
        } else {
            Ok(Some(ObjectId::try_parse(line)?))
        }
    }
}
