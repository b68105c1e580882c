use tracing::debug;

use crate::areas::index::IndexEntry;
use crate::areas::repository::Repository;
use crate::error::Result;
use crate::objects::blob::Blob;
use crate::objects::object_id::ObjectId;

pub const IGNORE_FILE: &str = ".gliteignore";

impl Repository {
    /// Stage a workspace file: hash it, store the blob (deduplicated by
    /// content), and upsert the index entry in place.
    pub fn add_file(&self, relative: &str) -> Result<ObjectId> {
        let content = self.workspace().read_file(relative)?;
        let blob = Blob::from_bytes(content);
        let oid = self.database().store_blob(&blob)?;
        self.index().upsert(relative, oid.clone())?;
        debug!(path = relative, oid = %oid.to_short_oid(), "staged file");
        Ok(oid)
    }

    /// The staged entries in their stored order.
    pub fn status(&self) -> Result<Vec<IndexEntry>> {
        self.index().load()
    }

    /// Unstage a path and delete the working-tree file if present.
    pub fn remove_file(&self, relative: &str) -> Result<()> {
        self.index().remove(relative)?;
        self.workspace().remove_file(relative)
    }

    /// Unstage a path; the working tree is untouched.
    pub fn reset_file(&self, relative: &str) -> Result<()> {
        self.index().remove(relative)
    }

    /// A listing of the staged paths. True content diff is out of scope.
    pub fn get_diff(&self) -> Result<String> {
        let entries = self.index().load()?;
        if entries.is_empty() {
            return Ok("No changes staged.".to_string());
        }
        let mut out = String::from("Staged changes:\n");
        for entry in entries {
            out.push_str(&format!("  {}\n", entry.path));
        }
        Ok(out)
    }

    /// Append a pattern to `.gliteignore`. The file is written here and read
    /// by consumers; `add_file` does not consult it.
    pub fn add_ignore_pattern(&self, pattern: &str) -> Result<()> {
        use std::io::Write;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path().join(IGNORE_FILE))?;
        writeln!(file, "{pattern}")?;
        Ok(())
    }
}
