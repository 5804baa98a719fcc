//! HTTP error mapping.
//!
//! # Invariants
//! - A note owned by another user maps to the same 404 as a missing note.
//! - Internal failures are logged here and reported without backtraces.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use notekeep_core::{NoteServiceError, NoteValidationError, RepoError, UserServiceError};
use serde_json::json;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ApiError {
    /// 400 `{"<field>": ["<message>"]}`.
    Validation { field: &'static str, message: String },
    /// 400 for a body that is not valid JSON for the route.
    MalformedBody(String),
    /// 400 from an assist route called without content.
    MissingContent,
    NotAuthenticated,
    InvalidToken,
    /// 404 on detail routes.
    NotFound,
    /// 404 on toggle routes.
    NoteNotFound,
    /// 500 with a plain error body.
    Internal(String),
    /// 500 on assist routes.
    Assist(String),
}

impl ApiError {
    pub fn required(field: &'static str) -> Self {
        Self::Validation {
            field,
            message: "This field is required.".to_string(),
        }
    }

    /// Toggle routes answer a missing note with their own body.
    pub fn for_toggle(err: NoteServiceError) -> Self {
        match Self::from(err) {
            Self::NotFound => Self::NoteNotFound,
            other => other,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { field, message } => write!(f, "{field}: {message}"),
            Self::MalformedBody(message) => write!(f, "malformed request body: {message}"),
            Self::MissingContent => write!(f, "Content is required"),
            Self::NotAuthenticated => write!(f, "Authentication credentials were not provided."),
            Self::InvalidToken => write!(f, "Invalid token."),
            Self::NotFound => write!(f, "Not found."),
            Self::NoteNotFound => write!(f, "Note not found"),
            Self::Internal(message) | Self::Assist(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::MalformedBody(_) | Self::MissingContent => {
                StatusCode::BAD_REQUEST
            }
            Self::NotAuthenticated | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::NotFound | Self::NoteNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) | Self::Assist(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::Validation { field, message } => json!({ *field: [message] }),
            Self::MalformedBody(message) => json!({ "detail": message }),
            Self::MissingContent => json!({ "success": false, "error": self.to_string() }),
            Self::NotAuthenticated | Self::InvalidToken | Self::NotFound => {
                json!({ "detail": self.to_string() })
            }
            Self::NoteNotFound => json!({ "error": self.to_string() }),
            Self::Internal(message) => {
                error!("event=http_error module=server status=error kind=internal error={message}");
                json!({ "error": message })
            }
            Self::Assist(message) => {
                error!("event=http_error module=server status=error kind=assist error={message}");
                json!({ "success": false, "error": message })
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<NoteValidationError> for ApiError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation {
            field: value.field(),
            message: value.to_string(),
        }
    }
}

impl From<NoteServiceError> for ApiError {
    fn from(value: NoteServiceError) -> Self {
        match value {
            NoteServiceError::Validation(err) => err.into(),
            NoteServiceError::NoteNotFound(_) => Self::NotFound,
            NoteServiceError::Repo(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<UserServiceError> for ApiError {
    fn from(value: UserServiceError) -> Self {
        match value.field() {
            Some(field) => Self::Validation {
                field,
                message: value.to_string(),
            },
            None => Self::Internal(value.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        NoteServiceError::from(value).into()
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(value: r2d2::Error) -> Self {
        Self::Internal(format!("database pool unavailable: {value}"))
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(value: actix_web::error::BlockingError) -> Self {
        Self::Internal(value.to_string())
    }
}
