//! Domain model for notes and their owners.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own write-time validation rules for note fields.
//!
//! # Invariants
//! - Every note has exactly one owner, fixed at creation.
//! - Persisted titles and contents are non-empty after trimming.

pub mod note;
pub mod user;
