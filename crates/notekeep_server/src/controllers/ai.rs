//! Assist routes: analysis, enhancement and title suggestions.
//!
//! Model-backed calls may block for the configured timeout, so the engine
//! always runs on the blocking thread pool.

use crate::auth::authenticate;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use notekeep_core::{AnalysisResult, AnalysisSource, AssistEngine, Category, Enhancement};
use serde::{Deserialize, Serialize};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ai/analyze/").route(web::post().to(analyze)));
    cfg.service(web::resource("/ai/enhance/").route(web::post().to(enhance)));
    cfg.service(web::resource("/ai/title/").route(web::post().to(suggest_title)));
}

#[derive(Debug, Deserialize)]
struct AssistRequest {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl AssistRequest {
    /// Content is mandatory and must not be empty.
    fn content(&self) -> Result<String, ApiError> {
        self.content
            .clone()
            .filter(|content| !content.is_empty())
            .ok_or(ApiError::MissingContent)
    }
}

#[derive(Debug, Serialize)]
struct AnalysisBody {
    suggested_categories: Vec<Category>,
    summary: String,
    enhancements: Vec<String>,
    ai_powered: bool,
    source: AnalysisSource,
}

impl From<AnalysisResult> for AnalysisBody {
    fn from(result: AnalysisResult) -> Self {
        Self {
            ai_powered: result.ai_powered(),
            suggested_categories: result.suggested_categories,
            summary: result.summary,
            enhancements: result.enhancements,
            source: result.source,
        }
    }
}

#[derive(Debug, Serialize)]
struct EnhancementBody {
    enhanced_content: String,
    improvements: Vec<String>,
    ai_powered: bool,
    source: AnalysisSource,
}

impl From<Enhancement> for EnhancementBody {
    fn from(result: Enhancement) -> Self {
        Self {
            ai_powered: result.ai_powered(),
            enhanced_content: result.enhanced_content,
            improvements: result.improvements,
            source: result.source,
        }
    }
}

async fn run_assist<T, F>(state: &web::Data<AppState>, work: F) -> Result<T, ApiError>
where
    F: FnOnce(&AssistEngine) -> T + Send + 'static,
    T: Send + 'static,
{
    let engine = state.assist.clone();
    web::block(move || work(&engine))
        .await
        .map_err(|err| ApiError::Assist(err.to_string()))
}

async fn analyze(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<AssistRequest>,
) -> Result<HttpResponse, ApiError> {
    authenticate(&state, &req).await?;
    let content = payload.content()?;
    let title = payload.into_inner().title.unwrap_or_default();

    let result = run_assist(&state, move |engine| engine.analyze(&content, &title)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "ai_suggestions": AnalysisBody::from(result),
    })))
}

async fn enhance(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<AssistRequest>,
) -> Result<HttpResponse, ApiError> {
    authenticate(&state, &req).await?;
    let content = payload.content()?;

    let result = run_assist(&state, move |engine| engine.enhance(&content)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "enhancement": EnhancementBody::from(result),
    })))
}

async fn suggest_title(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<AssistRequest>,
) -> Result<HttpResponse, ApiError> {
    authenticate(&state, &req).await?;
    let content = payload.content()?;

    let title = state.assist.generate_title(&content);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "suggested_title": title,
    })))
}
