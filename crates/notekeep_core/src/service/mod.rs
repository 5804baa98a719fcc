//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep HTTP/binding layers decoupled from storage details.

pub mod note_service;
pub mod user_service;
