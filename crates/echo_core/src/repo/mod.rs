//! Repository layer over the key/value store.
//!
//! # Responsibility
//! - Define the in-memory entry collection and its persistence mirror.
//! - Return semantic errors (`NotFound`) distinct from storage transport
//!   failures, which stay inside the best-effort policy.
//!
//! # Invariants
//! - Every successful mutation persists the full collection before returning.
//! - Storage failures never abort a mutation; they are logged and counted.

pub mod entry_repo;
