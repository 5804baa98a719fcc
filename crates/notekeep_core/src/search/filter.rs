//! Category/search filtering for note listings.
//!
//! # Invariants
//! - The base set is always a single owner's notes.
//! - Category narrowing is applied before search narrowing; both must hold.
//! - Search is a case-insensitive substring match on title OR content.
//! - Result order is the repository default order; no pagination or cap.

use crate::model::note::Note;
use crate::model::user::UserId;
use crate::repo::note_repo::NoteRepository;
use crate::repo::RepoResult;

const FILTER_ALL: &str = "all";
const FILTER_FAVORITES: &str = "favorites";
const FILTER_ARCHIVED: &str = "archived";

/// Category narrowing selected by the `category` request parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// No narrowing (parameter absent, empty, or `all`).
    #[default]
    All,
    /// Only notes with `is_favorite = true`, whatever their category.
    Favorites,
    /// Only notes with `is_archived = true`.
    Archived,
    /// Exact match on the category label. Unknown labels match nothing.
    Category(String),
}

impl CategoryFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") | Some(FILTER_ALL) => Self::All,
            Some(FILTER_FAVORITES) => Self::Favorites,
            Some(FILTER_ARCHIVED) => Self::Archived,
            Some(label) => Self::Category(label.to_string()),
        }
    }

    /// In-memory equivalent of the SQL narrowing.
    pub fn matches(&self, note: &Note) -> bool {
        match self {
            Self::All => true,
            Self::Favorites => note.is_favorite,
            Self::Archived => note.is_archived,
            Self::Category(label) => note
                .category
                .is_some_and(|category| category.as_str() == label),
        }
    }
}

/// Typed list query: category narrowing plus optional search term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
    pub category: CategoryFilter,
    /// Lower-cased search needle; `None` when absent or empty.
    search: Option<String>,
}

impl NoteQuery {
    /// Builds a query from raw request parameters.
    pub fn from_params(category: Option<&str>, search: Option<&str>) -> Self {
        Self {
            category: CategoryFilter::parse(category),
            search: search
                .filter(|term| !term.is_empty())
                .map(str::to_lowercase),
        }
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Returns whether `note` passes the search narrowing.
    pub fn matches_search(&self, note: &Note) -> bool {
        match self.search.as_deref() {
            None => true,
            Some(needle) => {
                note.title.to_lowercase().contains(needle)
                    || note.content.to_lowercase().contains(needle)
            }
        }
    }

    /// Returns whether `note` passes both narrowings.
    pub fn matches(&self, note: &Note) -> bool {
        self.category.matches(note) && self.matches_search(note)
    }
}

/// Resolves the ordered set of `owner`'s notes satisfying `query`.
pub fn resolve_notes<R: NoteRepository + ?Sized>(
    repo: &R,
    owner: UserId,
    query: &NoteQuery,
) -> RepoResult<Vec<Note>> {
    let mut notes = repo.list_notes(owner, &query.category)?;
    if query.search.is_some() {
        notes.retain(|note| query.matches_search(note));
    }
    Ok(notes)
}
