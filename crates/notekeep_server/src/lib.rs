//! HTTP surface for notekeep.
//!
//! # Responsibility
//! - Map REST routes onto `notekeep_core` services.
//! - Own process configuration, the connection pool and the model backend.

pub mod auth;
pub mod config;
pub mod controllers;
pub mod error;
pub mod openai;
pub mod state;

use actix_web::web;
use error::ApiError;

pub use config::ServerConfig;
pub use state::{build_pool, AppState, DbPool};

/// Registers every route.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .configure(controllers::health::config)
        .configure(controllers::users::config)
        .configure(controllers::notes::config)
        .configure(controllers::ai::config);
}

/// JSON extractor settings; malformed bodies get a JSON 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::MalformedBody(err.to_string()).into())
}
