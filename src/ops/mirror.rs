//! Mirror push/pull
//!
//! The "remote" is a sibling directory tree on the same filesystem. Push
//! and pull destroy and recreate the target's `.glite` and `workspace`
//! subtrees; the mirror is a copy, not a branching peer, so there is
//! nothing to merge.

use std::path::Path;
use tracing::info;
use walkdir::WalkDir;

use crate::areas::repository::{Repository, GLITE_DIR, WORKSPACE_DIR};
use crate::error::{Error, Result};

/// Recursively copy a directory, replacing the target wholesale. A missing
/// source is a no-op, matching the copy-what-exists contract of pull.
pub(crate) fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Ok(());
    }
    if to.exists() {
        std::fs::remove_dir_all(to)?;
    }
    std::fs::create_dir_all(to)?;
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(|e| {
            Error::Filesystem(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::other("walkdir loop detected")
            }))
        })?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|_| Error::corrupt("walked entry outside copy root"))?;
        if relative.as_os_str().is_empty() {
            continue;
        }
        let target = to.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

impl Repository {
    /// Replace the mirror with this repository's current state.
    pub fn push(&self, remote_root: &Path) -> Result<()> {
        if remote_root.exists() {
            std::fs::remove_dir_all(remote_root)?;
        }
        std::fs::create_dir_all(remote_root)?;
        copy_tree(
            &self.path().join(GLITE_DIR),
            &remote_root.join(GLITE_DIR),
        )?;
        copy_tree(
            &self.path().join(WORKSPACE_DIR),
            &remote_root.join(WORKSPACE_DIR),
        )?;
        info!(remote = %remote_root.display(), "pushed to mirror");
        Ok(())
    }

    /// Replace this repository's state with the mirror's. Fails when the
    /// mirror does not exist.
    pub fn pull(&self, remote_root: &Path) -> Result<()> {
        if !remote_root.exists() {
            return Err(Error::NotARepository(remote_root.to_path_buf()));
        }
        copy_tree(
            &remote_root.join(GLITE_DIR),
            &self.path().join(GLITE_DIR),
        )?;
        copy_tree(
            &remote_root.join(WORKSPACE_DIR),
            &self.path().join(WORKSPACE_DIR),
        )?;
        info!(remote = %remote_root.display(), "pulled from mirror");
        Ok(())
    }
}
