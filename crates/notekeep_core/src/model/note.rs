//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its category enumeration.
//! - Validate and normalize create/update payloads before persistence.
//!
//! # Invariants
//! - `title` is stored trimmed and is never empty.
//! - `content` is stored as given but must contain non-whitespace text.
//! - `owner_id` and `created_at` never change after creation.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::model::user::UserId;

/// System-assigned note identifier.
pub type NoteId = i64;

/// Maximum accepted title length, in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// Fixed category enumeration a note may be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Work,
    Personal,
    Ideas,
    Project,
    Meeting,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 5] = [
        Category::Work,
        Category::Personal,
        Category::Ideas,
        Category::Project,
        Category::Meeting,
    ];

    /// Storage/wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Ideas => "ideas",
            Self::Project => "project",
            Self::Meeting => "meeting",
        }
    }

    /// Parses an exact (case-sensitive) label.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = NoteValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| NoteValidationError::UnknownCategory(value.to_string()))
    }
}

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub owner_id: UserId,
    pub title: String,
    pub content: String,
    pub category: Option<Category>,
    pub is_favorite: bool,
    pub is_archived: bool,
    /// Unix epoch milliseconds, set once.
    pub created_at: i64,
    /// Unix epoch milliseconds, strictly increasing per mutation.
    pub updated_at: i64,
}

/// Write-time validation failure for note payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    TitleTooLong { max: usize, actual: usize },
    EmptyContent,
    UnknownCategory(String),
}

impl NoteValidationError {
    /// Payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyContent => "content",
            Self::UnknownCategory(_) => "category",
        }
    }
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Title cannot be empty."),
            Self::TitleTooLong { max, .. } => {
                write!(f, "Ensure this field has no more than {max} characters.")
            }
            Self::EmptyContent => write!(f, "Content cannot be empty."),
            Self::UnknownCategory(value) => write!(f, "\"{value}\" is not a valid choice."),
        }
    }
}

impl Error for NoteValidationError {}

/// Input for creating one note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub category: Option<Category>,
    pub is_favorite: bool,
    pub is_archived: bool,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Validates the draft and returns it with a trimmed title.
    pub fn normalized(mut self) -> Result<Self, NoteValidationError> {
        self.title = normalize_title(&self.title)?;
        validate_content(&self.content)?;
        Ok(self)
    }
}

/// Partial update; `None` leaves the field untouched.
///
/// `category: Some(None)` clears the category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<Option<Category>>,
    pub is_favorite: Option<bool>,
    pub is_archived: Option<bool>,
}

impl NotePatch {
    /// Validates provided fields and trims the title when present.
    pub fn normalized(mut self) -> Result<Self, NoteValidationError> {
        if let Some(title) = self.title.as_deref() {
            self.title = Some(normalize_title(title)?);
        }
        if let Some(content) = self.content.as_deref() {
            validate_content(content)?;
        }
        Ok(self)
    }

    /// Full replacement patch built from a draft.
    pub fn replace_with(draft: NoteDraft) -> Self {
        Self {
            title: Some(draft.title),
            content: Some(draft.content),
            category: Some(draft.category),
            is_favorite: Some(draft.is_favorite),
            is_archived: Some(draft.is_archived),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.is_favorite.is_none()
            && self.is_archived.is_none()
    }
}

fn normalize_title(title: &str) -> Result<String, NoteValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(NoteValidationError::EmptyTitle);
    }
    let actual = trimmed.chars().count();
    if actual > TITLE_MAX_CHARS {
        return Err(NoteValidationError::TitleTooLong {
            max: TITLE_MAX_CHARS,
            actual,
        });
    }
    Ok(trimmed.to_string())
}

fn validate_content(content: &str) -> Result<(), NoteValidationError> {
    if content.trim().is_empty() {
        return Err(NoteValidationError::EmptyContent);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Category, NoteDraft, NotePatch, NoteValidationError};

    #[test]
    fn draft_trims_title_but_keeps_content() {
        let draft = NoteDraft::new("  Groceries  ", "  milk\n").normalized().unwrap();
        assert_eq!(draft.title, "Groceries");
        assert_eq!(draft.content, "  milk\n");
    }

    #[test]
    fn draft_rejects_blank_fields() {
        let err = NoteDraft::new("   ", "body").normalized().unwrap_err();
        assert_eq!(err, NoteValidationError::EmptyTitle);
        assert_eq!(err.field(), "title");

        let err = NoteDraft::new("title", "\t\n").normalized().unwrap_err();
        assert_eq!(err, NoteValidationError::EmptyContent);
    }

    #[test]
    fn draft_rejects_overlong_title() {
        let err = NoteDraft::new("x".repeat(201), "body")
            .normalized()
            .unwrap_err();
        assert!(matches!(
            err,
            NoteValidationError::TitleTooLong { max: 200, actual: 201 }
        ));
    }

    #[test]
    fn patch_only_validates_present_fields() {
        let patch = NotePatch {
            is_favorite: Some(true),
            ..NotePatch::default()
        };
        assert!(patch.normalized().is_ok());

        let patch = NotePatch {
            content: Some(" ".to_string()),
            ..NotePatch::default()
        };
        assert_eq!(
            patch.normalized().unwrap_err(),
            NoteValidationError::EmptyContent
        );
    }

    #[test]
    fn category_parse_is_exact() {
        assert_eq!(Category::parse("meeting"), Some(Category::Meeting));
        assert_eq!(Category::parse("Meeting"), None);
        assert!("nope".parse::<Category>().is_err());
    }
}
