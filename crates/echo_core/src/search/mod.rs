//! Entry search and display-order projections.
//!
//! # Responsibility
//! - Provide pure, non-persisted projections over the entry collection.
//!
//! # Invariants
//! - Projections never mutate entries, selection state, or the store.

pub mod filter;
