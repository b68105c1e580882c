//! Staging area (index)
//!
//! The index is an ordered sequence of `(path, blob_id)` entries stored as
//! TSV, one entry per line. Order is stored order: a re-add of an existing
//! path replaces its entry in place, everything else keeps its position.
//! Committing consumes the index and writes it empty.

use derive_new::new;
use std::path::Path;

use crate::error::{Error, Result};
use crate::objects::object_id::ObjectId;

/// One staged file: workspace-relative path plus the blob it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub path: String,
    pub oid: ObjectId,
}

/// Handle on a repository's index file (`.glite/index`).
///
/// The index is re-read from disk on every operation; the engine holds no
/// long-lived caches.
#[derive(Debug, new)]
pub struct Index {
    path: Box<Path>,
}

impl Index {
    pub fn load(&self) -> Result<Vec<IndexEntry>> {
        let content = std::fs::read_to_string(&self.path)?;
        let mut entries = Vec::new();
        for line in content.lines() {
            if line.is_empty() {
                continue;
            }
            let Some((path, oid)) = line.split_once('\t') else {
                continue;
            };
            entries.push(IndexEntry {
                path: path.to_string(),
                oid: ObjectId::try_parse(oid)?,
            });
        }
        Ok(entries)
    }

    pub fn save(&self, entries: &[IndexEntry]) -> Result<()> {
        let mut content = String::new();
        for entry in entries {
            content.push_str(&format!("{}\t{}\n", entry.path, entry.oid));
        }
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Stage a path. Replaces an existing entry in place; appends otherwise.
    pub fn upsert(&self, path: &str, oid: ObjectId) -> Result<()> {
        let mut entries = self.load()?;
        match entries.iter_mut().find(|entry| entry.path == path) {
            Some(entry) => entry.oid = oid,
            None => entries.push(IndexEntry {
                path: path.to_string(),
                oid,
            }),
        }
        self.save(&entries)
    }

    /// Drop a path from the index. Fails if the path is not staged.
    pub fn remove(&self, path: &str) -> Result<()> {
        let mut entries = self.load()?;
        let before = entries.len();
        entries.retain(|entry| entry.path != path);
        if entries.len() == before {
            return Err(Error::FileNotStaged(path.to_string()));
        }
        self.save(&entries)
    }

    pub fn clear(&self) -> Result<()> {
        self.save(&[])
    }
}
