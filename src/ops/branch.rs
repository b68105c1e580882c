use tracing::debug;

use crate::areas::repository::Repository;
use crate::error::{Error, Result};
use crate::identity::validate_identifier;
use crate::objects::object_id::ObjectId;

impl Repository {
    /// Create a branch rooted at the current branch's head. The new branch
    /// may start empty when the current branch has no commits yet.
    pub fn create_branch(&self, name: &str) -> Result<()> {
        validate_identifier(name)?;
        let current = self.refs().current_branch()?;
        let head = self.refs().branch_head(&current)?;
        self.refs().create_branch(name, head.as_ref())?;
        debug!(branch = name, "created branch");
        Ok(())
    }

    /// Rewrite HEAD to another branch. The working tree is left exactly as
    /// it was; this engine does not materialize snapshots on checkout.
    pub fn set_current_branch(&self, name: &str) -> Result<()> {
        if !self.refs().branch_exists(name) {
            return Err(Error::BranchNotFound(name.to_string()));
        }
        self.refs().set_current_branch(name)
    }

    pub fn current_branch(&self) -> Result<String> {
        self.refs().current_branch()
    }

    /// All branches with their heads, sorted by name.
    pub fn list_branches_with_head(&self) -> Result<Vec<(String, Option<ObjectId>)>> {
        self.refs().list_branches()
    }

    pub fn rename_branch(&self, old: &str, new: &str) -> Result<()> {
        validate_identifier(new)?;
        self.refs().rename_branch(old, new)
    }

    /// Delete a branch. The current branch cannot be deleted.
    pub fn delete_branch(&self, name: &str) -> Result<()> {
        if self.refs().current_branch()? == name {
            return Err(Error::conflict("cannot delete the current branch"));
        }
        self.refs().delete_branch(name)
    }
}
