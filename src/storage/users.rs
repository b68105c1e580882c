//! User registry (`users.tsv`)
//!
//! One user per line: `username \t verifier \t role`. Blank lines are
//! tolerated on read; saves replace the whole file atomically.

use crate::error::Result;
use crate::identity::{Role, User};
use crate::storage::Storage;

impl Storage {
    pub fn load_users(&self) -> Result<Vec<User>> {
        let content = std::fs::read_to_string(self.users_path())?;
        let mut users = Vec::new();
        for line in content.lines() {
            if line.is_empty() {
                continue;
            }
            let mut fields = line.splitn(3, '\t');
            let (Some(username), Some(verifier), Some(role)) =
                (fields.next(), fields.next(), fields.next())
            else {
                continue;
            };
            users.push(User {
                username: username.to_string(),
                verifier: verifier.to_string(),
                role: Role::parse(role),
            });
        }
        Ok(users)
    }

    pub fn save_users(&self, users: &[User]) -> Result<()> {
        let mut content = String::new();
        for user in users {
            content.push_str(&format!(
                "{}\t{}\t{}\n",
                user.username, user.verifier, user.role
            ));
        }
        self.write_atomic(&self.users_path(), &content)
    }

    pub fn find_user(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .load_users()?
            .into_iter()
            .find(|user| user.username == username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_users() -> Vec<User> {
        vec![
            User {
                username: "alice".into(),
                verifier: "$argon2id$stub".into(),
                role: Role::Admin,
            },
            User {
                username: "bob".into(),
                verifier: "$argon2id$stub2".into(),
                role: Role::User,
            },
        ]
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path().join("storage")).unwrap();
        let users = sample_users();
        storage.save_users(&users).unwrap();
        assert_eq!(storage.load_users().unwrap(), users);
    }

    #[test]
    fn blank_lines_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path().join("storage")).unwrap();
        std::fs::write(
            storage.users_path(),
            "alice\thash\tadmin\n\nbob\thash2\tuser\n",
        )
        .unwrap();
        let users = storage.load_users().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].role, Role::Admin);
        assert_eq!(users[1].role, Role::User);
    }

    #[test]
    fn find_user_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path().join("storage")).unwrap();
        storage.save_users(&sample_users()).unwrap();
        assert_eq!(
            storage.find_user("bob").unwrap().unwrap().username,
            "bob"
        );
        assert!(storage.find_user("carol").unwrap().is_none());
    }
}
