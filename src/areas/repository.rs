//! Per-repository handle
//!
//! A `Repository` coordinates the four areas of one repository directory:
//! workspace, index, object database, and refs. It is a cheap handle;
//! opening one re-reads nothing, and each operation loads exactly the
//! state it needs from disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::error::{Error, Result};
use crate::objects::commit::CommitRecord;
use crate::storage::config::RepoConfig;

pub const GLITE_DIR: &str = ".glite";
pub const WORKSPACE_DIR: &str = "workspace";

pub struct Repository {
    path: PathBuf,
    workspace: Workspace,
    index: Index,
    database: Database,
    refs: Refs,
}

impl Repository {
    /// Open an existing repository. Fails when the `.glite` skeleton is
    /// missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let glite = path.join(GLITE_DIR);
        if !glite.is_dir() {
            return Err(Error::NotARepository(path));
        }

        let workspace = Workspace::new(path.join(WORKSPACE_DIR).into_boxed_path());
        let index = Index::new(glite.join("index").into_boxed_path());
        let database = Database::new(glite.join("objects").into_boxed_path());
        let refs = Refs::new(glite.clone().into_boxed_path());

        Ok(Repository {
            path,
            workspace,
            index,
            database,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn config(&self) -> RepoConfig {
        RepoConfig::new(self.path.join(GLITE_DIR).join("config").into_boxed_path())
    }

    pub fn log_path(&self) -> PathBuf {
        self.path.join(GLITE_DIR).join("log")
    }

    /// Append one line to the commit log: `<id>\t<branch>\t<ts>\t<message>`.
    pub fn append_log(&self, record: &CommitRecord) -> Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path())?;
        writeln!(
            file,
            "{}\t{}\t{}\t{}",
            record.id(),
            record.branch(),
            record.formatted_timestamp(),
            record.message()
        )?;
        Ok(())
    }
}
