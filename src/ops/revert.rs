use tracing::info;

use crate::areas::repository::Repository;
use crate::error::Result;
use crate::objects::commit::{local_timestamp, CommitRecord};
use crate::objects::object_id::ObjectId;

impl Repository {
    /// Create a commit that restores the snapshot preceding `commit_id`.
    ///
    /// The revert commit's files are those of the reverted commit's parent
    /// (empty when reverting a root commit); its parent is the current
    /// branch head.
    pub fn revert_commit(&self, commit_id: &ObjectId, author: &str) -> Result<CommitRecord> {
        let original = self.database().load_commit(commit_id)?;
        let files = match original.parent() {
            Some(parent) => self.database().load_commit(parent)?.files().to_vec(),
            None => Vec::new(),
        };

        let branch = self.refs().current_branch()?;
        let current_head = self.refs().branch_head(&branch)?;
        let record = CommitRecord::build(
            current_head,
            author.to_string(),
            local_timestamp(),
            branch.clone(),
            format!("Revert: {}", original.message()),
            files,
        );

        self.database().store_commit(&record)?;
        self.refs().update_branch(&branch, record.id())?;
        self.append_log(&record)?;

        info!(
            reverted = %commit_id.to_short_oid(),
            commit = %record.id().to_short_oid(),
            "reverted commit"
        );
        Ok(record)
    }
}
