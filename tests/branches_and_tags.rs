use glite::error::Error;
use glite::ops::merge::MERGE_AUTHOR;
use pretty_assertions::assert_eq;

mod common;
use common::{fresh_engine, login_as, stage_and_commit, write_workspace_file};

#[test]
fn branch_and_merge_takes_the_other_branches_snapshot() {
    let (_dir, mut engine) = fresh_engine();
    login_as(&mut engine, "alice", "secret1");
    engine.create_repo("proj").unwrap();

    write_workspace_file(&engine, "alice", "proj", "a.txt", "hi\n");
    stage_and_commit(&engine, "alice", "proj", "a.txt", "c1");
    write_workspace_file(&engine, "alice", "proj", "a.txt", "hi2\n");
    let c2 = stage_and_commit(&engine, "alice", "proj", "a.txt", "c2");

    let repo = engine.open_repo_for_write("alice", "proj").unwrap();
    repo.create_branch("feature").unwrap();
    repo.set_current_branch("feature").unwrap();

    write_workspace_file(&engine, "alice", "proj", "b.txt", "feature work\n");
    repo.add_file("b.txt").unwrap();
    let feature_tip = repo.commit("alice", "feature commit").unwrap();

    repo.set_current_branch("main").unwrap();
    let merge = repo.merge_branch("feature").unwrap();

    assert_eq!(merge.parent().unwrap().to_string(), c2);
    assert_eq!(merge.author(), MERGE_AUTHOR);
    assert_eq!(merge.message(), "Merge branch 'feature' into 'main'");
    assert_eq!(merge.files(), feature_tip.files());
    assert_eq!(
        repo.refs().branch_head("main").unwrap().unwrap(),
        *merge.id()
    );
}

#[test]
fn a_new_branch_starts_at_the_current_head() {
    let (_dir, mut engine) = fresh_engine();
    login_as(&mut engine, "alice", "secret1");
    engine.create_repo("proj").unwrap();

    write_workspace_file(&engine, "alice", "proj", "a.txt", "hi\n");
    let c1 = stage_and_commit(&engine, "alice", "proj", "a.txt", "c1");

    let repo = engine.open_repo_for_write("alice", "proj").unwrap();
    repo.create_branch("feature").unwrap();
    assert_eq!(
        repo.refs().branch_head("feature").unwrap().unwrap().to_string(),
        c1
    );
}

#[test]
fn a_branch_created_before_any_commit_is_empty() {
    let (_dir, mut engine) = fresh_engine();
    login_as(&mut engine, "alice", "secret1");
    engine.create_repo("proj").unwrap();

    let repo = engine.open_repo_for_write("alice", "proj").unwrap();
    repo.create_branch("feature").unwrap();
    assert_eq!(repo.refs().branch_head("feature").unwrap(), None);
}

#[test]
fn duplicate_and_invalid_branch_names_are_rejected() {
    let (_dir, mut engine) = fresh_engine();
    login_as(&mut engine, "alice", "secret1");
    engine.create_repo("proj").unwrap();

    let repo = engine.open_repo_for_write("alice", "proj").unwrap();
    repo.create_branch("feature").unwrap();
    assert!(matches!(
        repo.create_branch("feature"),
        Err(Error::BranchExists(_))
    ));
    assert!(matches!(
        repo.create_branch("bad name"),
        Err(Error::InvalidIdentifier(_))
    ));
}

#[test]
fn checkout_switches_head_but_leaves_the_working_tree() {
    let (_dir, mut engine) = fresh_engine();
    login_as(&mut engine, "alice", "secret1");
    engine.create_repo("proj").unwrap();

    write_workspace_file(&engine, "alice", "proj", "a.txt", "main content\n");
    stage_and_commit(&engine, "alice", "proj", "a.txt", "c1");

    let repo = engine.open_repo_for_write("alice", "proj").unwrap();
    repo.create_branch("feature").unwrap();
    repo.set_current_branch("feature").unwrap();

    assert_eq!(repo.current_branch().unwrap(), "feature");
    // No snapshot materialization on checkout: the tree is untouched.
    assert_eq!(
        repo.workspace().read_file("a.txt").unwrap().as_ref(),
        b"main content\n"
    );
}

#[test]
fn checkout_of_a_missing_branch_fails() {
    let (_dir, mut engine) = fresh_engine();
    login_as(&mut engine, "alice", "secret1");
    engine.create_repo("proj").unwrap();

    let repo = engine.open_repo_for_write("alice", "proj").unwrap();
    assert!(matches!(
        repo.set_current_branch("ghost"),
        Err(Error::BranchNotFound(_))
    ));
}

#[test]
fn rename_branch_follows_head_and_rejects_collisions() {
    let (_dir, mut engine) = fresh_engine();
    login_as(&mut engine, "alice", "secret1");
    engine.create_repo("proj").unwrap();

    let repo = engine.open_repo_for_write("alice", "proj").unwrap();
    repo.create_branch("feature").unwrap();

    assert!(matches!(
        repo.rename_branch("main", "feature"),
        Err(Error::BranchExists(_))
    ));
    assert!(matches!(
        repo.rename_branch("ghost", "elsewhere"),
        Err(Error::BranchNotFound(_))
    ));

    repo.rename_branch("main", "trunk").unwrap();
    assert_eq!(repo.current_branch().unwrap(), "trunk");

    // Renaming a non-current branch leaves HEAD alone.
    repo.rename_branch("feature", "topic").unwrap();
    assert_eq!(repo.current_branch().unwrap(), "trunk");
}

#[test]
fn the_current_branch_cannot_be_deleted() {
    let (_dir, mut engine) = fresh_engine();
    login_as(&mut engine, "alice", "secret1");
    engine.create_repo("proj").unwrap();

    let repo = engine.open_repo_for_write("alice", "proj").unwrap();
    repo.create_branch("feature").unwrap();

    assert!(matches!(
        repo.delete_branch("main"),
        Err(Error::Conflict(_))
    ));
    assert!(matches!(
        repo.delete_branch("ghost"),
        Err(Error::BranchNotFound(_))
    ));
    repo.delete_branch("feature").unwrap();
    assert!(!repo.refs().branch_exists("feature"));
}

#[test]
fn branches_are_listed_sorted_with_their_heads() {
    let (_dir, mut engine) = fresh_engine();
    login_as(&mut engine, "alice", "secret1");
    engine.create_repo("proj").unwrap();

    write_workspace_file(&engine, "alice", "proj", "a.txt", "hi\n");
    let c1 = stage_and_commit(&engine, "alice", "proj", "a.txt", "c1");

    let repo = engine.open_repo_for_write("alice", "proj").unwrap();
    repo.create_branch("zeta").unwrap();
    repo.create_branch("alpha").unwrap();

    let branches = repo.list_branches_with_head().unwrap();
    let names: Vec<&str> = branches.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "main", "zeta"]);
    for (_, head) in &branches {
        assert_eq!(head.as_ref().unwrap().to_string(), c1);
    }
}

#[test]
fn rebase_force_resets_the_current_branch() {
    let (_dir, mut engine) = fresh_engine();
    login_as(&mut engine, "alice", "secret1");
    engine.create_repo("proj").unwrap();

    write_workspace_file(&engine, "alice", "proj", "a.txt", "base\n");
    stage_and_commit(&engine, "alice", "proj", "a.txt", "base");

    let repo = engine.open_repo_for_write("alice", "proj").unwrap();
    repo.create_branch("feature").unwrap();
    repo.set_current_branch("feature").unwrap();
    write_workspace_file(&engine, "alice", "proj", "b.txt", "feature\n");
    repo.add_file("b.txt").unwrap();
    let feature_tip = repo.commit("alice", "feature work").unwrap();

    repo.set_current_branch("main").unwrap();
    write_workspace_file(&engine, "alice", "proj", "c.txt", "main\n");
    repo.add_file("c.txt").unwrap();
    repo.commit("alice", "main work").unwrap();

    // Rebase discards main's unique head and points it at feature's.
    repo.rebase_branch("feature").unwrap();
    assert_eq!(
        repo.refs().branch_head("main").unwrap().unwrap(),
        *feature_tip.id()
    );
}

#[test]
fn merge_and_rebase_reject_self_and_empty_sources() {
    let (_dir, mut engine) = fresh_engine();
    login_as(&mut engine, "alice", "secret1");
    engine.create_repo("proj").unwrap();

    let repo = engine.open_repo_for_write("alice", "proj").unwrap();
    repo.create_branch("empty").unwrap();

    assert!(matches!(
        repo.merge_branch("main"),
        Err(Error::Conflict(_))
    ));
    assert!(matches!(
        repo.merge_branch("empty"),
        Err(Error::Conflict(_))
    ));
    assert!(matches!(
        repo.rebase_branch("main"),
        Err(Error::Conflict(_))
    ));
    assert!(matches!(
        repo.rebase_branch("empty"),
        Err(Error::Conflict(_))
    ));
    assert!(matches!(
        repo.merge_branch("ghost"),
        Err(Error::BranchNotFound(_))
    ));
}

#[test]
fn merge_commits_satisfy_content_addressing() {
    let (_dir, mut engine) = fresh_engine();
    login_as(&mut engine, "alice", "secret1");
    engine.create_repo("proj").unwrap();

    write_workspace_file(&engine, "alice", "proj", "a.txt", "hi\n");
    stage_and_commit(&engine, "alice", "proj", "a.txt", "c1");

    let repo = engine.open_repo_for_write("alice", "proj").unwrap();
    repo.create_branch("feature").unwrap();
    repo.set_current_branch("feature").unwrap();
    write_workspace_file(&engine, "alice", "proj", "b.txt", "feature\n");
    repo.add_file("b.txt").unwrap();
    repo.commit("alice", "feature work").unwrap();
    repo.set_current_branch("main").unwrap();

    let merge = repo.merge_branch("feature").unwrap();

    // The stored merge object parses back to the same record, and its id
    // is the digest of its body like any other commit.
    let loaded = repo.get_commit(merge.id()).unwrap();
    assert_eq!(loaded, merge);
    assert_eq!(
        glite::hashing::hash_bytes(loaded.body().as_bytes()),
        merge.id().to_string()
    );
}

#[test]
fn tags_freeze_the_current_head() {
    let (_dir, mut engine) = fresh_engine();
    login_as(&mut engine, "alice", "secret1");
    engine.create_repo("proj").unwrap();

    let repo = engine.open_repo_for_write("alice", "proj").unwrap();
    // Tagging with no commits fails.
    assert!(matches!(repo.create_tag("v0"), Err(Error::Conflict(_))));

    write_workspace_file(&engine, "alice", "proj", "a.txt", "hi\n");
    let c1 = stage_and_commit(&engine, "alice", "proj", "a.txt", "c1");

    repo.create_tag("v1.0").unwrap();
    assert!(matches!(
        repo.create_tag("v1.0"),
        Err(Error::TagExists(_))
    ));

    // A later commit does not move the tag.
    write_workspace_file(&engine, "alice", "proj", "a.txt", "hi2\n");
    stage_and_commit(&engine, "alice", "proj", "a.txt", "c2");

    let mut tags = repo.list_tags().unwrap();
    tags.sort();
    assert_eq!(tags, vec!["v1.0"]);
    assert_eq!(
        repo.refs().tag_target("v1.0").unwrap().unwrap().to_string(),
        c1
    );
}
