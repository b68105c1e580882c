//! Repository service operations
//!
//! Each file extends `Repository` with one group of operations, the way a
//! porcelain layer sits over plumbing:
//!
//! - `add`: staging, unstaging, status, diff, ignore patterns
//! - `branch`: branch lifecycle and HEAD switching
//! - `commit`: turning the index into a commit record
//! - `log`: history walks and single-commit lookup
//! - `merge`: merge and rebase
//! - `mirror`: push/pull against the local remote tree
//! - `revert`: inverse commits
//! - `tag`: frozen references

pub mod add;
pub mod branch;
pub mod commit;
pub mod log;
pub mod merge;
pub mod mirror;
pub mod revert;
pub mod tag;
