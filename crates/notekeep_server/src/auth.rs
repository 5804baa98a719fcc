//! Bearer-token authentication for note and assist routes.

use crate::error::ApiError;
use crate::state::AppState;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, HttpRequest};
use notekeep_core::{SqliteUserRepository, User, UserService};

const TOKEN_SCHEMES: [&str; 2] = ["Bearer", "Token"];

/// Resolves the request's `Authorization` header to a registered user.
pub async fn authenticate(state: &web::Data<AppState>, req: &HttpRequest) -> Result<User, ApiError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(token_from_header)
        .ok_or(ApiError::NotAuthenticated)?
        .to_string();

    state
        .with_conn(move |conn| {
            let users = UserService::new(SqliteUserRepository::try_new(conn)?);
            Ok(users.authenticate(&token)?)
        })
        .await?
        .ok_or(ApiError::InvalidToken)
}

/// Extracts the token from `Bearer <token>` or `Token <token>`.
fn token_from_header(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    let known = TOKEN_SCHEMES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(scheme));
    (known && !token.is_empty()).then_some(token)
}
