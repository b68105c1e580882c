//! Per-repository config file
//!
//! `.glite/config` is a flat `key=value` store with one pair per line.
//! Lines without `=` are skipped on read; writes are whole-file rewrites
//! with keys in sorted order.

use derive_new::new;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }

    /// Unknown values read as private.
    pub fn parse(value: &str) -> Visibility {
        match value {
            "public" => Visibility::Public,
            _ => Visibility::Private,
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, new)]
pub struct RepoConfig {
    path: Box<Path>,
}

impl RepoConfig {
    pub fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let mut values = BTreeMap::new();
        for line in content.lines() {
            if let Some((key, value)) = line.split_once('=') {
                values.insert(key.to_string(), value.to_string());
            }
        }
        Ok(values)
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let mut content = String::new();
        for (key, value) in values {
            content.push_str(&format!("{key}={value}\n"));
        }
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_preserves_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(&path, "name=proj\nowner=alice\nvisibility=private\n").unwrap();
        let config = RepoConfig::new(path.into_boxed_path());

        config.set("visibility", "public").unwrap();

        assert_eq!(config.get("visibility").unwrap().unwrap(), "public");
        assert_eq!(config.get("name").unwrap().unwrap(), "proj");
        assert_eq!(config.get("owner").unwrap().unwrap(), "alice");
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(&path, "name=proj\ngarbage line\n\n").unwrap();
        let config = RepoConfig::new(path.into_boxed_path());
        assert_eq!(config.load().unwrap().len(), 1);
    }

    #[test]
    fn unknown_visibility_parses_as_private() {
        assert_eq!(Visibility::parse("internal"), Visibility::Private);
        assert_eq!(Visibility::parse("public"), Visibility::Public);
    }
}
