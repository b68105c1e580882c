use tracing::info;

use crate::areas::repository::Repository;
use crate::error::{Error, Result};
use crate::objects::commit::{local_timestamp, CommitRecord};
use crate::objects::object_id::ObjectId;

/// Author recorded on merge commits.
pub const MERGE_AUTHOR: &str = "merge";

impl Repository {
    /// Merge another branch into the current one.
    ///
    /// The merge commit's file list is the other branch head's list
    /// verbatim ("theirs" resolution); there is no three-way reconciliation.
    pub fn merge_branch(&self, other: &str) -> Result<CommitRecord> {
        let current = self.refs().current_branch()?;
        let other_head = self.mergeable_head(&current, other)?;
        let current_head = self.refs().branch_head(&current)?;

        let other_record = self.database().load_commit(&other_head)?;
        let record = CommitRecord::build(
            current_head,
            MERGE_AUTHOR.to_string(),
            local_timestamp(),
            current.clone(),
            format!("Merge branch '{other}' into '{current}'"),
            other_record.files().to_vec(),
        );

        self.database().store_commit(&record)?;
        self.refs().update_branch(&current, record.id())?;
        self.append_log(&record)?;

        info!(from = other, into = %current, "merged branch");
        Ok(record)
    }

    /// Point the current branch at the other branch's head. No commits are
    /// rewritten or created; history unique to the current branch becomes
    /// unreachable from it.
    pub fn rebase_branch(&self, other: &str) -> Result<()> {
        let current = self.refs().current_branch()?;
        let other_head = self.mergeable_head(&current, other)?;
        self.refs().update_branch(&current, &other_head)?;
        info!(onto = other, branch = %current, "rebased branch");
        Ok(())
    }

    fn mergeable_head(&self, current: &str, other: &str) -> Result<ObjectId> {
        if current == other {
            return Err(Error::conflict(format!(
                "cannot merge branch '{other}' into itself"
            )));
        }
        self.refs()
            .branch_head(other)?
            .ok_or_else(|| Error::conflict(format!("branch '{other}' has no commits")))
    }
}
