use tracing::info;

use crate::areas::repository::Repository;
use crate::error::{Error, Result};
use crate::objects::commit::{local_timestamp, CommitRecord};

impl Repository {
    /// Turn the index into a commit on the current branch.
    ///
    /// The write order is a contract, not an atomicity guarantee: the
    /// object file must exist before the ref moves, so a crash in between
    /// leaves an unreferenced object rather than a dangling ref. The index
    /// is cleared after the ref update, then the log line is appended.
    pub fn commit(&self, author: &str, message: &str) -> Result<CommitRecord> {
        let entries = self.index().load()?;
        if entries.is_empty() {
            return Err(Error::conflict("nothing to commit (index empty)"));
        }

        let branch = self.refs().current_branch()?;
        let parent = self.refs().branch_head(&branch)?;
        let files = entries
            .into_iter()
            .map(|entry| (entry.path, entry.oid))
            .collect();

        let record = CommitRecord::build(
            parent,
            author.to_string(),
            local_timestamp(),
            branch.clone(),
            message.to_string(),
            files,
        );

        self.database().store_commit(&record)?;
        self.refs().update_branch(&branch, record.id())?;
        self.index().clear()?;
        self.append_log(&record)?;

        info!(
            branch = %branch,
            commit = %record.id().to_short_oid(),
            "created commit"
        );
        Ok(record)
    }
}
