//! Application orchestration services.
//!
//! # Responsibility
//! - Bind user actions to repository mutations and renderer updates.
//! - Keep UI hosts decoupled from storage and engine details.
//!
//! # Invariants
//! - Every collection or selection mutation is followed by a re-render.

pub mod journal_service;
