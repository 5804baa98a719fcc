//! Core domain logic for notekeep.
//! This crate is the single source of truth for business invariants.

pub mod assist;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use assist::engine::{AssistConfig, AssistEngine, DEFAULT_MODEL_TIMEOUT};
pub use assist::heuristics::{AnalysisResult, AnalysisSource, Enhancement};
pub use assist::model::{ModelBackend, ModelError, ModelPrompt};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::note::{Category, Note, NoteDraft, NoteId, NotePatch, NoteValidationError};
pub use model::user::{RegisteredUser, User, UserId};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use search::filter::{resolve_notes, CategoryFilter, NoteQuery};
pub use service::note_service::{NoteService, NoteServiceError};
pub use service::user_service::{UserService, UserServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
