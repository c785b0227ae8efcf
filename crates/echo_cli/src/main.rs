//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `echo_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use echo_core::{filter_entries, EntryPatch, EntryRepository, SqliteKvStore};

fn main() {
    println!("echo_core version={}", echo_core::core_version());

    let store = match SqliteKvStore::open_in_memory() {
        Ok(store) => store,
        Err(err) => {
            eprintln!("store open failed: {err}");
            std::process::exit(1);
        }
    };

    let mut repo = EntryRepository::load(store);
    let id = repo.create().id;
    if let Err(err) = repo.update(id, &EntryPatch::full("smoke", "journal core wired")) {
        eprintln!("update failed: {err}");
        std::process::exit(1);
    }

    let hits = filter_entries(repo.list(), "wired");
    println!("entries={} search_hits={}", repo.list().len(), hits.len());
}
