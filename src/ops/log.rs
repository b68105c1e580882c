use crate::areas::repository::Repository;
use crate::error::Result;
use crate::objects::commit::CommitRecord;
use crate::objects::object_id::ObjectId;

impl Repository {
    /// Walk the parent chain from a branch head, newest first, yielding up
    /// to `limit` records. The walk ends quietly at a root commit or at an
    /// id whose object is missing.
    pub fn history(&self, branch: &str, limit: usize) -> Result<Vec<CommitRecord>> {
        let mut records = Vec::new();
        let mut cursor = self.refs().branch_head(branch)?;

        while records.len() < limit {
            let Some(id) = cursor else { break };
            if !self.database().commit_exists(&id) {
                break;
            }
            let record = self.database().load_commit(&id)?;
            cursor = record.parent().cloned();
            records.push(record);
        }

        Ok(records)
    }

    pub fn get_commit(&self, commit_id: &ObjectId) -> Result<CommitRecord> {
        self.database().load_commit(commit_id)
    }
}
