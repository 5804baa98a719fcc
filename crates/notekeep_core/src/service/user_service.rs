//! Registration and bearer-token lookup for note owners.
//!
//! # Invariants
//! - Usernames are trimmed and limited to letters, digits and `@.+-_`.
//! - Passwords are stored as salted SHA-256 (`sha256$<salt>$<hex>`).
//! - Tokens are random UUID v4 strings issued once at registration.

use crate::model::user::{RegisteredUser, User, USERNAME_MAX_CHARS};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use log::info;
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PASSWORD_HASH_SCHEME: &str = "sha256";

/// Service error for user use-cases.
#[derive(Debug)]
pub enum UserServiceError {
    InvalidUsername(String),
    InvalidPassword(String),
    UsernameTaken(String),
    Repo(RepoError),
}

impl UserServiceError {
    /// Payload field the error refers to, when it is a validation error.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidUsername(_) | Self::UsernameTaken(_) => Some("username"),
            Self::InvalidPassword(_) => Some("password"),
            Self::Repo(_) => None,
        }
    }
}

impl Display for UserServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUsername(message) | Self::InvalidPassword(message) => {
                write!(f, "{message}")
            }
            Self::UsernameTaken(_) => write!(f, "A user with that username already exists."),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UserServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for UserServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Conflict(username) => Self::UsernameTaken(username),
            other => Self::Repo(other),
        }
    }
}

/// User service facade over repository implementations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a user and issues its bearer token.
    pub fn register(&self, username: &str, password: &str) -> Result<RegisteredUser, UserServiceError> {
        let username = normalize_username(username)?;
        if password.is_empty() {
            return Err(UserServiceError::InvalidPassword(
                "This field may not be blank.".to_string(),
            ));
        }

        let api_token = Uuid::new_v4().simple().to_string();
        let user = self
            .repo
            .create_user(&username, &hash_password(password), &api_token)?;
        info!(
            "event=user_register module=service status=ok user_id={}",
            user.id
        );
        Ok(RegisteredUser { user, api_token })
    }

    /// Resolves a bearer token to its user; unknown tokens yield `None`.
    pub fn authenticate(&self, api_token: &str) -> Result<Option<User>, UserServiceError> {
        let token = api_token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        Ok(self.repo.find_by_token(token)?)
    }
}

fn normalize_username(username: &str) -> Result<String, UserServiceError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(UserServiceError::InvalidUsername(
            "This field may not be blank.".to_string(),
        ));
    }
    if trimmed.chars().count() > USERNAME_MAX_CHARS {
        return Err(UserServiceError::InvalidUsername(format!(
            "Ensure this field has no more than {USERNAME_MAX_CHARS} characters."
        )));
    }
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !trimmed.chars().all(allowed) {
        return Err(UserServiceError::InvalidUsername(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(b"$")
        .chain_update(password.as_bytes())
        .finalize();
    format!("{PASSWORD_HASH_SCHEME}${salt}${}", hex::encode(digest))
}
