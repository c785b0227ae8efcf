//! Domain model for journal entries.
//!
//! # Responsibility
//! - Define the canonical entry record shared by store, search and view code.
//! - Own timestamp semantics for entry lifecycle events.
//!
//! # Invariants
//! - Every entry is identified by a stable `EntryId`.
//! - `updated_at` never moves behind `created_at`.

pub mod entry;
