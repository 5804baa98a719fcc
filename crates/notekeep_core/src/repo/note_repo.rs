//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-scoped CRUD and flag toggles over the `notes` table.
//! - Push category narrowing into SQL for list queries.
//!
//! # Invariants
//! - Every statement is constrained by `owner_id`; a foreign note behaves
//!   exactly like a missing one.
//! - Each mutation is one SQL statement, so concurrent writers on the same
//!   note serialize inside SQLite and cannot lose updates.
//! - `updated_at` strictly increases on every mutation of a note.
//! - List order is `updated_at DESC, created_at DESC, id DESC`.

use crate::db::now_epoch_ms;
use crate::model::note::{Category, Note, NoteDraft, NoteId, NotePatch};
use crate::model::user::UserId;
use crate::repo::{bool_to_int, ensure_table_ready, int_to_bool, RepoError, RepoResult};
use crate::search::filter::CategoryFilter;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const NOTE_COLUMNS: &str = "id,
    owner_id,
    title,
    content,
    category,
    is_favorite,
    is_archived,
    created_at,
    updated_at";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "owner_id",
    "title",
    "content",
    "category",
    "is_favorite",
    "is_archived",
    "created_at",
    "updated_at",
];

/// Repository interface for owner-scoped note operations.
pub trait NoteRepository {
    /// Inserts one note owned by `owner` and returns the stored record.
    fn create_note(&self, owner: UserId, draft: &NoteDraft) -> RepoResult<Note>;
    /// Gets one note when it exists and belongs to `owner`.
    fn get_note(&self, owner: UserId, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists all of `owner`'s notes narrowed by `filter`, in default order.
    fn list_notes(&self, owner: UserId, filter: &CategoryFilter) -> RepoResult<Vec<Note>>;
    /// Applies a partial update and returns the stored record.
    fn update_note(&self, owner: UserId, id: NoteId, patch: &NotePatch) -> RepoResult<Note>;
    /// Flips `is_favorite` and returns the stored record.
    fn toggle_favorite(&self, owner: UserId, id: NoteId) -> RepoResult<Note>;
    /// Flips `is_archived` and returns the stored record.
    fn toggle_archived(&self, owner: UserId, id: NoteId) -> RepoResult<Note>;
    /// Deletes one note permanently.
    fn delete_note(&self, owner: UserId, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "notes", REQUIRED_COLUMNS)?;
        Ok(Self { conn })
    }

    fn toggle_flag(&self, owner: UserId, id: NoteId, column: &'static str) -> RepoResult<Note> {
        let sql = format!(
            "UPDATE notes
             SET
                {column} = 1 - {column},
                updated_at = MAX(updated_at + 1, ?3)
             WHERE id = ?1
               AND owner_id = ?2
             RETURNING {NOTE_COLUMNS};"
        );
        self.conn
            .query_row(&sql, params![id, owner, now_epoch_ms()], read_note_row)
            .optional()?
            .ok_or(RepoError::NotFound(id))?
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, owner: UserId, draft: &NoteDraft) -> RepoResult<Note> {
        let draft = draft.clone().normalized()?;
        let now = now_epoch_ms();

        self.conn.query_row(
            &format!(
                "INSERT INTO notes (
                    owner_id,
                    title,
                    content,
                    category,
                    is_favorite,
                    is_archived,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                RETURNING {NOTE_COLUMNS};"
            ),
            params![
                owner,
                draft.title.as_str(),
                draft.content.as_str(),
                draft.category.map(Category::as_str),
                bool_to_int(draft.is_favorite),
                bool_to_int(draft.is_archived),
                now,
            ],
            read_note_row,
        )?
    }

    fn get_note(&self, owner: UserId, id: NoteId) -> RepoResult<Option<Note>> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {NOTE_COLUMNS}
                     FROM notes
                     WHERE id = ?1
                       AND owner_id = ?2;"
                ),
                params![id, owner],
                read_note_row,
            )
            .optional()?;
        row.transpose()
    }

    fn list_notes(&self, owner: UserId, filter: &CategoryFilter) -> RepoResult<Vec<Note>> {
        let mut sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE owner_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Integer(owner)];

        match filter {
            CategoryFilter::All => {}
            CategoryFilter::Favorites => sql.push_str(" AND is_favorite = 1"),
            CategoryFilter::Archived => sql.push_str(" AND is_archived = 1"),
            CategoryFilter::Category(label) => {
                sql.push_str(" AND category = ?");
                bind_values.push(Value::Text(label.clone()));
            }
        }

        sql.push_str(" ORDER BY updated_at DESC, created_at DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }

    fn update_note(&self, owner: UserId, id: NoteId, patch: &NotePatch) -> RepoResult<Note> {
        let patch = patch.clone().normalized()?;
        let (category_set, category_value) = match patch.category {
            Some(category) => (1_i64, category.map(Category::as_str)),
            None => (0_i64, None),
        };

        self.conn
            .query_row(
                &format!(
                    "UPDATE notes
                     SET
                        title = COALESCE(?3, title),
                        content = COALESCE(?4, content),
                        category = CASE WHEN ?5 = 1 THEN ?6 ELSE category END,
                        is_favorite = COALESCE(?7, is_favorite),
                        is_archived = COALESCE(?8, is_archived),
                        updated_at = MAX(updated_at + 1, ?9)
                     WHERE id = ?1
                       AND owner_id = ?2
                     RETURNING {NOTE_COLUMNS};"
                ),
                params![
                    id,
                    owner,
                    patch.title.as_deref(),
                    patch.content.as_deref(),
                    category_set,
                    category_value,
                    patch.is_favorite.map(bool_to_int),
                    patch.is_archived.map(bool_to_int),
                    now_epoch_ms(),
                ],
                read_note_row,
            )
            .optional()?
            .ok_or(RepoError::NotFound(id))?
    }

    fn toggle_favorite(&self, owner: UserId, id: NoteId) -> RepoResult<Note> {
        self.toggle_flag(owner, id, "is_favorite")
    }

    fn toggle_archived(&self, owner: UserId, id: NoteId) -> RepoResult<Note> {
        self.toggle_flag(owner, id, "is_archived")
    }

    fn delete_note(&self, owner: UserId, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM notes WHERE id = ?1 AND owner_id = ?2;",
            params![id, owner],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

// Row decoding errors are domain errors, so they are carried inside the
// rusqlite `Ok` and unwrapped by the caller.
fn read_note_row(row: &Row<'_>) -> rusqlite::Result<RepoResult<Note>> {
    Ok(parse_note_row(row))
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let category = match row.get::<_, Option<String>>("category")? {
        Some(value) => Some(Category::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid category `{value}` in notes.category"))
        })?),
        None => None,
    };

    Ok(Note {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        category,
        is_favorite: int_to_bool(row.get("is_favorite")?, "notes.is_favorite")?,
        is_archived: int_to_bool(row.get("is_archived")?, "notes.is_archived")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
