use echo_core::{EntryPatch, EntryRepository, RepoError, SqliteKvStore};
use std::collections::HashSet;
use uuid::Uuid;

fn fresh_repo() -> EntryRepository<SqliteKvStore> {
    let store = SqliteKvStore::open_in_memory().expect("in-memory store opens");
    EntryRepository::load(store)
}

#[test]
fn create_inserts_empty_entry_at_head() {
    let mut repo = fresh_repo();

    let first = repo.create().id;
    let second = repo.create().id;

    let entries = repo.list();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, second, "newest entry sits at the head");
    assert_eq!(entries[1].id, first);
    assert!(entries[0].title.is_empty());
    assert!(entries[0].content.is_empty());
    assert_eq!(entries[0].created_at, entries[0].updated_at);
}

#[test]
fn created_ids_are_unique() {
    let mut repo = fresh_repo();
    let mut seen = HashSet::new();
    for _ in 0..100 {
        assert!(seen.insert(repo.create().id), "id collision");
    }
}

#[test]
fn update_replaces_only_provided_fields_and_bumps_updated_at() {
    let mut repo = fresh_repo();
    let id = repo.create().id;

    repo.update(id, &EntryPatch::full("day one", "it rained"))
        .expect("update succeeds");

    let title_only = EntryPatch {
        title: Some("day one, revised".to_string()),
        content: None,
    };
    repo.update(id, &title_only).expect("update succeeds");

    let entry = repo.find_by_id(id).expect("entry exists");
    assert_eq!(entry.title, "day one, revised");
    assert_eq!(entry.content, "it rained");
    assert!(entry.updated_at >= entry.created_at);
}

#[test]
fn update_unknown_id_leaves_collection_unchanged() {
    let mut repo = fresh_repo();
    repo.create();
    let before: Vec<_> = repo.list().to_vec();

    let missing = Uuid::now_v7();
    let err = repo
        .update(missing, &EntryPatch::full("x", "y"))
        .expect_err("unknown id must fail");
    assert_eq!(err, RepoError::NotFound(missing));
    assert_eq!(repo.list(), before.as_slice());
}

#[test]
fn delete_removes_entry_and_unknown_id_has_no_side_effects() {
    let mut repo = fresh_repo();
    let keep = repo.create().id;
    let doomed = repo.create().id;

    repo.delete(doomed).expect("delete succeeds");
    assert_eq!(repo.list().len(), 1);
    assert!(repo.find_by_id(doomed).is_none());
    assert!(repo.find_by_id(keep).is_some());

    let err = repo.delete(doomed).expect_err("second delete must fail");
    assert_eq!(err, RepoError::NotFound(doomed));
    assert_eq!(repo.list().len(), 1);
}

/// Runs a fixed mutation script and returns the surviving (title, content)
/// pairs in collection order.
fn run_script(repo: &mut EntryRepository<SqliteKvStore>) -> Vec<(String, String)> {
    let a = repo.create().id;
    let b = repo.create().id;
    repo.update(a, &EntryPatch::full("alpha", "first body"))
        .expect("update succeeds");
    repo.update(b, &EntryPatch::full("beta", "second body"))
        .expect("update succeeds");
    repo.delete(a).expect("delete succeeds");
    let c = repo.create().id;
    repo.update(c, &EntryPatch::full("gamma", ""))
        .expect("update succeeds");

    repo.list()
        .iter()
        .map(|entry| (entry.title.clone(), entry.content.clone()))
        .collect()
}

#[test]
fn mutation_sequences_replay_identically() {
    // The same script against two empty collections leaves the same visible
    // state: no lost or duplicated mutations.
    let mut first = fresh_repo();
    let mut second = fresh_repo();
    assert_eq!(run_script(&mut first), run_script(&mut second));
    assert_eq!(first.list().len(), 2);
}

#[test]
fn persist_failures_start_at_zero() {
    let mut repo = fresh_repo();
    repo.create();
    assert_eq!(repo.persist_failures(), 0);
}
