//! Registration route issuing bearer tokens.

use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use notekeep_core::{SqliteUserRepository, UserService};
use serde::Deserialize;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/users/").route(web::post().to(register)));
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    username: Option<String>,
    password: Option<String>,
}

async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let RegisterRequest { username, password } = payload.into_inner();
    let username = username.ok_or_else(|| ApiError::required("username"))?;
    let password = password.ok_or_else(|| ApiError::required("password"))?;

    let registered = state
        .with_conn(move |conn| {
            let users = UserService::new(SqliteUserRepository::try_new(conn)?);
            Ok(users.register(&username, &password)?)
        })
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "id": registered.user.id,
        "username": registered.user.username,
        "token": registered.api_token,
    })))
}
