//! Object artifacts
//!
//! The building blocks stored in a repository's object directory:
//!
//! - `object_id`: content fingerprints (SHA-256, 64 hex chars)
//! - `blob`: byte-identical file snapshots
//! - `commit`: commit records with a full tree snapshot per commit

pub mod blob;
pub mod commit;
pub mod object_id;

pub const OBJECT_ID_LENGTH: usize = 64;
