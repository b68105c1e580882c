//! # glite
//!
//! A local, multi-user, git-like version control engine. Everything lives
//! under one workspace root on disk: a user registry, a permission map,
//! per-user repository directories, and a `_remotes/` tree of mirrors.
//!
//! The crate is organized as a three-layer stack:
//!
//! - `hashing` + `storage`: content fingerprints, credential verification,
//!   and the on-disk layout of users and repositories;
//! - `areas` + `objects` + `ops`: one repository's workspace, index,
//!   object database, and refs, with the operations over them;
//! - `engine`: sessions, role- and collaborator-based authorization, and
//!   the cross-user operations (fork, transfer, visibility).
//!
//! ## Library usage
//!
//! ```rust,ignore
//! use glite::engine::Engine;
//! use glite::hashing::ArgonCredentials;
//! use glite::storage::Storage;
//!
//! let storage = Storage::open("./storage")?;
//! let mut engine = Engine::new(storage, Box::new(ArgonCredentials::new()));
//! engine.register("alice", "secret1")?;
//! engine.login("alice", "secret1")?;
//! engine.create_repo("proj")?;
//! ```

pub mod areas;
pub mod engine;
pub mod error;
pub mod hashing;
pub mod identity;
pub mod objects;
pub mod ops;
pub mod storage;

pub use engine::{Engine, Session};
pub use error::{Error, Result};
