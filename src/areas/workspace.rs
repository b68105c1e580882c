use bytes::Bytes;
use derive_new::new;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// The user-visible working tree of a repository (`<repo>/workspace`).
#[derive(Debug, new)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve a workspace-relative path, rejecting anything that would
    /// escape the working tree (`..`, absolute paths, drive prefixes).
    pub fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let candidate = Path::new(relative);
        let escapes = candidate.components().any(|component| {
            !matches!(component, Component::Normal(_) | Component::CurDir)
        });
        if relative.is_empty() || escapes {
            return Err(Error::InvalidIdentifier(relative.to_string()));
        }
        Ok(self.path.join(candidate))
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.resolve(relative).map(|p| p.exists()).unwrap_or(false)
    }

    pub fn read_file(&self, relative: &str) -> Result<Bytes> {
        let path = self.resolve(relative)?;
        Ok(std::fs::read(path)?.into())
    }

    pub fn write_file(&self, relative: &str, content: &[u8]) -> Result<()> {
        let path = self.resolve(relative)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Delete a working-tree file if present. Missing files are fine; the
    /// index is the authority on what is tracked.
    pub fn remove_file(&self, relative: &str) -> Result<()> {
        let path = self.resolve(relative)?;
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}
