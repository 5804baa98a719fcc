//! Note use-case service.
//!
//! # Responsibility
//! - Provide owner-scoped create/get/list/update/toggle/delete APIs.
//! - Route list requests through the category/search resolver.
//!
//! # Invariants
//! - A note owned by someone else is reported exactly like a missing note.
//! - Validation failures are reported before any storage access.
//! - Log events carry ids and counts only, never note text.

use crate::model::note::{Note, NoteDraft, NoteId, NotePatch, NoteValidationError};
use crate::model::user::UserId;
use crate::repo::note_repo::NoteRepository;
use crate::repo::RepoError;
use crate::search::filter::{resolve_notes, NoteQuery};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Payload failed write-time validation.
    Validation(NoteValidationError),
    /// Target note does not exist or belongs to another owner.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NoteNotFound(_) => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one note owned by `owner`.
    pub fn create_note(&self, owner: UserId, draft: NoteDraft) -> Result<Note, NoteServiceError> {
        let draft = draft.normalized()?;
        let note = self.repo.create_note(owner, &draft)?;
        info!(
            "event=note_create module=service status=ok owner_id={} note_id={}",
            owner, note.id
        );
        Ok(note)
    }

    /// Gets one of `owner`'s notes.
    pub fn get_note(&self, owner: UserId, id: NoteId) -> Result<Note, NoteServiceError> {
        self.repo
            .get_note(owner, id)?
            .ok_or(NoteServiceError::NoteNotFound(id))
    }

    /// Lists `owner`'s notes matching `query` in default order.
    pub fn list_notes(&self, owner: UserId, query: &NoteQuery) -> Result<Vec<Note>, NoteServiceError> {
        let notes = resolve_notes(&self.repo, owner, query)?;
        debug!(
            "event=note_list module=service status=ok owner_id={} filter={:?} search={} count={}",
            owner,
            query.category,
            query.search_term().is_some(),
            notes.len()
        );
        Ok(notes)
    }

    /// Applies a partial update to one of `owner`'s notes.
    pub fn update_note(
        &self,
        owner: UserId,
        id: NoteId,
        patch: NotePatch,
    ) -> Result<Note, NoteServiceError> {
        let patch = patch.normalized()?;
        let note = self.repo.update_note(owner, id, &patch)?;
        info!(
            "event=note_update module=service status=ok owner_id={} note_id={}",
            owner, id
        );
        Ok(note)
    }

    /// Flips the favorite flag and returns the updated note.
    pub fn toggle_favorite(&self, owner: UserId, id: NoteId) -> Result<Note, NoteServiceError> {
        let note = self.repo.toggle_favorite(owner, id)?;
        info!(
            "event=note_toggle module=service status=ok flag=favorite owner_id={} note_id={} value={}",
            owner, id, note.is_favorite
        );
        Ok(note)
    }

    /// Flips the archived flag and returns the updated note.
    pub fn toggle_archive(&self, owner: UserId, id: NoteId) -> Result<Note, NoteServiceError> {
        let note = self.repo.toggle_archived(owner, id)?;
        info!(
            "event=note_toggle module=service status=ok flag=archived owner_id={} note_id={} value={}",
            owner, id, note.is_archived
        );
        Ok(note)
    }

    /// Permanently deletes one of `owner`'s notes.
    pub fn delete_note(&self, owner: UserId, id: NoteId) -> Result<(), NoteServiceError> {
        self.repo.delete_note(owner, id)?;
        info!(
            "event=note_delete module=service status=ok owner_id={} note_id={}",
            owner, id
        );
        Ok(())
    }
}
