//! Text analysis helpers for notes.
//!
//! # Responsibility
//! - Deterministic keyword/string heuristics (category suggestion, summary,
//!   hints, content touch-up, title generation).
//! - An engine that optionally consults an external model and always falls
//!   back to the heuristics when the model path is off or fails.
//!
//! # Invariants
//! - Nothing in this module touches the note store.
//! - Heuristic functions are pure and total for any string input.

pub mod engine;
pub mod heuristics;
pub mod model;
