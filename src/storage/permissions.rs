//! Permission map (`permissions.tsv`)
//!
//! Maps `"<owner>/<repo>"` keys to collaborator sets. The owner is never
//! listed; ownership is derived from the directory path. One line per
//! repository: `owner/repo \t user1,user2`.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;
use crate::storage::Storage;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionMap {
    entries: BTreeMap<String, BTreeSet<String>>,
}

pub fn repo_key(owner: &str, repo: &str) -> String {
    format!("{owner}/{repo}")
}

impl PermissionMap {
    pub fn collaborators(&self, owner: &str, repo: &str) -> BTreeSet<String> {
        self.entries
            .get(&repo_key(owner, repo))
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_collaborator(&self, owner: &str, repo: &str, username: &str) -> bool {
        self.entries
            .get(&repo_key(owner, repo))
            .is_some_and(|set| set.contains(username))
    }

    pub fn grant(&mut self, owner: &str, repo: &str, username: &str) {
        self.entries
            .entry(repo_key(owner, repo))
            .or_default()
            .insert(username.to_string());
    }

    pub fn revoke(&mut self, owner: &str, repo: &str, username: &str) {
        if let Some(set) = self.entries.get_mut(&repo_key(owner, repo)) {
            set.remove(username);
        }
    }

    /// Drop the repository's entry entirely (repo deleted).
    pub fn remove_repo(&mut self, owner: &str, repo: &str) {
        self.entries.remove(&repo_key(owner, repo));
    }

    /// Rewrite a key after a transfer, carrying the collaborator set over.
    pub fn rename_repo(&mut self, old_owner: &str, new_owner: &str, repo: &str) {
        if let Some(set) = self.entries.remove(&repo_key(old_owner, repo)) {
            self.entries.insert(repo_key(new_owner, repo), set);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }
}

impl Storage {
    pub fn load_permissions(&self) -> Result<PermissionMap> {
        let content = std::fs::read_to_string(self.permissions_path())?;
        let mut entries = BTreeMap::new();
        for line in content.lines() {
            if line.is_empty() {
                continue;
            }
            let (key, collaborators) = line.split_once('\t').unwrap_or((line, ""));
            let set: BTreeSet<String> = collaborators
                .split(',')
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            entries.insert(key.to_string(), set);
        }
        Ok(PermissionMap { entries })
    }

    pub fn save_permissions(&self, map: &PermissionMap) -> Result<()> {
        let mut content = String::new();
        for (key, set) in &map.entries {
            let joined: Vec<&str> = set.iter().map(String::as_str).collect();
            content.push_str(&format!("{key}\t{}\n", joined.join(",")));
        }
        self.write_atomic(&self.permissions_path(), &content)
    }
}
