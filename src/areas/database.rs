//! Object database
//!
//! Content-addressable storage for blobs and commit records. The object
//! directory is flat: each object lives at `.glite/objects/<id>` where the
//! id is the SHA-256 of the object's bytes (for blobs) or of the commit
//! body (for commit records). Writing an object that already exists is a
//! no-op, which is what deduplicates identical file content.

use bytes::Bytes;
use derive_new::new;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::objects::blob::Blob;
use crate::objects::commit::CommitRecord;
use crate::objects::object_id::ObjectId;

/// Handle on a repository's object directory (`.glite/objects`).
#[derive(Debug, new)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.path.join(id.as_ref())
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.object_path(id).exists()
    }

    /// Store a blob, returning its id. Existing objects are left untouched.
    pub fn store_blob(&self, blob: &Blob) -> Result<ObjectId> {
        let id = blob.object_id();
        self.write_if_absent(&id, blob.content())?;
        Ok(id)
    }

    /// Store a commit record under its id.
    pub fn store_commit(&self, record: &CommitRecord) -> Result<()> {
        self.write_if_absent(record.id(), record.serialize().as_bytes())
    }

    pub fn load(&self, id: &ObjectId) -> Result<Bytes> {
        Ok(std::fs::read(self.object_path(id))?.into())
    }

    pub fn load_commit(&self, id: &ObjectId) -> Result<CommitRecord> {
        let path = self.object_path(id);
        if !path.exists() {
            return Err(Error::CommitNotFound(id.to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        CommitRecord::deserialize(&text)
    }

    pub fn commit_exists(&self, id: &ObjectId) -> bool {
        self.contains(id)
    }

    // Writes go through a temp file followed by a rename so a crashed write
    // never leaves a half-object under a valid id.
    fn write_if_absent(&self, id: &ObjectId, content: &[u8]) -> Result<()> {
        let object_path = self.object_path(id);
        if object_path.exists() {
            return Ok(());
        }
        std::fs::create_dir_all(&self.path)?;
        let temp_path = self.path.join(format!("tmp-obj-{}", id.to_short_oid()));
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &object_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::commit::{local_timestamp, CommitRecord};
    use pretty_assertions::assert_eq;

    fn database_in(dir: &tempfile::TempDir) -> Database {
        Database::new(dir.path().join("objects").into_boxed_path())
    }

    #[test]
    fn stored_blob_lands_at_its_digest() {
        let dir = tempfile::tempdir().unwrap();
        let db = database_in(&dir);
        let blob = Blob::from_bytes(&b"hi\n"[..]);
        let id = db.store_blob(&blob).unwrap();

        let on_disk = std::fs::read(dir.path().join("objects").join(id.as_ref())).unwrap();
        assert_eq!(on_disk, b"hi\n");
    }

    #[test]
    fn storing_the_same_content_twice_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let db = database_in(&dir);
        let blob = Blob::from_bytes(&b"same"[..]);
        let first = db.store_blob(&blob).unwrap();
        let second = db.store_blob(&blob).unwrap();
        assert_eq!(first, second);

        let count = std::fs::read_dir(dir.path().join("objects")).unwrap().count();
        assert_eq!(count, 1);
    }

    #[test]
    fn commit_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let db = database_in(&dir);
        let record = CommitRecord::build(
            None,
            "alice".into(),
            local_timestamp(),
            "main".into(),
            "c1".into(),
            vec![],
        );
        db.store_commit(&record).unwrap();
        let loaded = db.load_commit(record.id()).unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn loading_a_missing_commit_fails() {
        let dir = tempfile::tempdir().unwrap();
        let db = database_in(&dir);
        let id = Blob::from_bytes(&b"nothing"[..]).object_id();
        assert!(matches!(
            db.load_commit(&id),
            Err(Error::CommitNotFound(_))
        ));
    }
}
