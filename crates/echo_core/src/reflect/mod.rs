//! Streaming reflection over an external inference engine.
//!
//! # Responsibility
//! - Define the engine collaborator boundary (chat messages, fragments,
//!   load progress).
//! - Own the session state machine: lazy one-time model load, single
//!   in-flight cancellable generation.
//!
//! # Invariants
//! - The model is loaded at most once per process and never unloaded.
//! - At most one generation is logically in flight at a time.
//! - After cancellation no further fragments reach the caller.

pub mod engine;
pub mod session;
