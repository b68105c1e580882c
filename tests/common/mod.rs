#![allow(dead_code)]

use assert_fs::TempDir;

use glite::engine::Engine;
use glite::hashing::PlaintextCredentials;
use glite::storage::Storage;

/// A fresh engine over a temp storage root, with deterministic credentials.
pub fn fresh_engine() -> (TempDir, Engine) {
    let dir = TempDir::new().unwrap();
    let storage = Storage::open(dir.path().join("storage")).unwrap();
    let engine = Engine::new(storage, Box::new(PlaintextCredentials));
    (dir, engine)
}

/// Register and log in a user in one step.
pub fn login_as(engine: &mut Engine, username: &str, password: &str) {
    engine.register(username, password).unwrap();
    engine.login(username, password).unwrap();
}

/// Write a file into a repository's working tree.
pub fn write_workspace_file(
    engine: &Engine,
    owner: &str,
    repo: &str,
    relative: &str,
    content: &str,
) {
    let repository = engine.storage().open_repo(owner, repo).unwrap();
    repository
        .workspace()
        .write_file(relative, content.as_bytes())
        .unwrap();
}

/// Stage a file and commit it, returning the commit id as a string.
pub fn stage_and_commit(
    engine: &Engine,
    owner: &str,
    repo: &str,
    relative: &str,
    message: &str,
) -> String {
    let repository = engine.open_repo_for_write(owner, repo).unwrap();
    repository.add_file(relative).unwrap();
    repository
        .commit(owner, message)
        .unwrap()
        .id()
        .to_string()
}
