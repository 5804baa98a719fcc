//! Notes REST API: owner-scoped CRUD, toggles and the filtered list.

use crate::auth::authenticate;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, SecondsFormat, Utc};
use notekeep_core::{
    Category, Note, NoteDraft, NoteId, NotePatch, NoteQuery, NoteService, SqliteNoteRepository,
    User,
};
use rusqlite::Connection;
use serde::{Deserialize, Deserializer, Serialize};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/notes/")
            .route(web::get().to(list_notes))
            .route(web::post().to(create_note)),
    );
    cfg.service(web::resource("/notes/delete/{id}/").route(web::delete().to(delete_note)));
    cfg.service(
        web::resource("/notes/{id}/")
            .route(web::get().to(get_note))
            .route(web::patch().to(patch_note))
            .route(web::put().to(replace_note))
            .route(web::delete().to(delete_note)),
    );
    cfg.service(web::resource("/notes/{id}/favorite/").route(web::patch().to(toggle_favorite)));
    cfg.service(web::resource("/notes/{id}/archive/").route(web::patch().to(toggle_archive)));
}

/// Wire form of a note.
#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub category: Option<Category>,
    pub created_at: String,
    pub updated_at: String,
    pub is_favorite: bool,
    pub is_archived: bool,
    pub author: String,
}

impl NoteResponse {
    fn new(note: Note, author: &User) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            category: note.category,
            created_at: rfc3339(note.created_at),
            updated_at: rfc3339(note.updated_at),
            is_favorite: note.is_favorite,
            is_archived: note.is_archived,
            author: author.username.clone(),
        }
    }
}

fn rfc3339(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    category: Option<String>,
    search: Option<String>,
}

/// Create/update body. Read-only fields in the body are ignored.
#[derive(Debug, Default, Deserialize)]
struct NotePayload {
    title: Option<String>,
    content: Option<String>,
    #[serde(default, deserialize_with = "present_field")]
    category: Option<Option<String>>,
    is_favorite: Option<bool>,
    is_archived: Option<bool>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field.
fn present_field<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl NotePayload {
    fn into_draft(self) -> Result<NoteDraft, ApiError> {
        Ok(NoteDraft {
            title: self.title.ok_or_else(|| ApiError::required("title"))?,
            content: self.content.ok_or_else(|| ApiError::required("content"))?,
            category: parse_category(self.category.flatten())?,
            is_favorite: self.is_favorite.unwrap_or(false),
            is_archived: self.is_archived.unwrap_or(false),
        })
    }

    fn into_patch(self) -> Result<NotePatch, ApiError> {
        Ok(NotePatch {
            title: self.title,
            content: self.content,
            category: self.category.map(parse_category).transpose()?,
            is_favorite: self.is_favorite,
            is_archived: self.is_archived,
        })
    }
}

fn parse_category(raw: Option<String>) -> Result<Option<Category>, ApiError> {
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(label) => Ok(Some(label.parse::<Category>()?)),
    }
}

fn note_service(conn: &Connection) -> Result<NoteService<SqliteNoteRepository<'_>>, ApiError> {
    Ok(NoteService::new(SqliteNoteRepository::try_new(conn)?))
}

async fn list_notes(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&state, &req).await?;
    let ListQuery { category, search } = query.into_inner();
    let query = NoteQuery::from_params(category.as_deref(), search.as_deref());

    let owner = user.id;
    let notes = state
        .with_conn(move |conn| Ok(note_service(conn)?.list_notes(owner, &query)?))
        .await?;

    let body = notes
        .into_iter()
        .map(|note| NoteResponse::new(note, &user))
        .collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(body))
}

async fn create_note(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<NotePayload>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&state, &req).await?;
    let draft = payload.into_inner().into_draft()?;

    let owner = user.id;
    let note = state
        .with_conn(move |conn| Ok(note_service(conn)?.create_note(owner, draft)?))
        .await?;
    Ok(HttpResponse::Created().json(NoteResponse::new(note, &user)))
}

async fn get_note(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<NoteId>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&state, &req).await?;
    let (owner, id) = (user.id, path.into_inner());
    let note = state
        .with_conn(move |conn| Ok(note_service(conn)?.get_note(owner, id)?))
        .await?;
    Ok(HttpResponse::Ok().json(NoteResponse::new(note, &user)))
}

async fn patch_note(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<NoteId>,
    payload: web::Json<NotePayload>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&state, &req).await?;
    let patch = payload.into_inner().into_patch()?;
    update(state, user, path.into_inner(), patch).await
}

async fn replace_note(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<NoteId>,
    payload: web::Json<NotePayload>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&state, &req).await?;
    let patch = NotePatch::replace_with(payload.into_inner().into_draft()?);
    update(state, user, path.into_inner(), patch).await
}

async fn update(
    state: web::Data<AppState>,
    user: User,
    id: NoteId,
    patch: NotePatch,
) -> Result<HttpResponse, ApiError> {
    let owner = user.id;
    let note = state
        .with_conn(move |conn| Ok(note_service(conn)?.update_note(owner, id, patch)?))
        .await?;
    Ok(HttpResponse::Ok().json(NoteResponse::new(note, &user)))
}

async fn delete_note(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<NoteId>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&state, &req).await?;
    let (owner, id) = (user.id, path.into_inner());
    state
        .with_conn(move |conn| Ok(note_service(conn)?.delete_note(owner, id)?))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn toggle_favorite(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<NoteId>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&state, &req).await?;
    let (owner, id) = (user.id, path.into_inner());
    let note = state
        .with_conn(move |conn| {
            note_service(conn)?
                .toggle_favorite(owner, id)
                .map_err(ApiError::for_toggle)
        })
        .await?;
    Ok(HttpResponse::Ok().json(NoteResponse::new(note, &user)))
}

async fn toggle_archive(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<NoteId>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&state, &req).await?;
    let (owner, id) = (user.id, path.into_inner());
    let note = state
        .with_conn(move |conn| {
            note_service(conn)?
                .toggle_archive(owner, id)
                .map_err(ApiError::for_toggle)
        })
        .await?;
    Ok(HttpResponse::Ok().json(NoteResponse::new(note, &user)))
}
