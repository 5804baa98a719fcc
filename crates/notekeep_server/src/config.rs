//! Server configuration read from the environment.
//!
//! # Invariants
//! - Every variable has a default except `OPENAI_API_KEY`.
//! - Invalid values are reported as errors before the server binds.

use notekeep_core::logging::normalize_level;
use notekeep_core::LogTarget;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const BIND_ADDR: &str = "NOTEKEEP_BIND_ADDR";
    pub const PORT: &str = "NOTEKEEP_PORT";
    pub const DATABASE_PATH: &str = "NOTEKEEP_DATABASE_PATH";
    pub const LOG_LEVEL: &str = "NOTEKEEP_LOG_LEVEL";
    /// Absolute directory for rotated log files; unset logs to stderr.
    pub const LOG_DIR: &str = "NOTEKEEP_LOG_DIR";
    pub const AI_ENABLED: &str = "NOTEKEEP_AI_ENABLED";
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const AI_MODEL: &str = "NOTEKEEP_AI_MODEL";
    pub const AI_ENDPOINT: &str = "NOTEKEEP_AI_ENDPOINT";
    pub const AI_TIMEOUT_SECS: &str = "NOTEKEEP_AI_TIMEOUT_SECS";
}

/// Default values
pub mod defaults {
    pub const BIND_ADDR: &str = "127.0.0.1";
    pub const PORT: u16 = 8000;
    pub const DATABASE_PATH: &str = "./notekeep.sqlite3";
    pub const AI_MODEL: &str = "gpt-3.5-turbo";
    pub const AI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
    pub const AI_TIMEOUT_SECS: u64 = 10;
}

/// External model settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiSettings {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl AiSettings {
    /// The model path needs both the switch and a credential.
    pub fn model_ready(&self) -> bool {
        self.enabled && self.api_key.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub log_level: &'static str,
    pub log_target: LogTarget,
    pub ai: AiSettings,
}

impl ServerConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match get(env_vars::PORT) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| format!("{} must be a port number, got `{raw}`", env_vars::PORT))?,
            None => defaults::PORT,
        };

        let log_level = match get(env_vars::LOG_LEVEL) {
            Some(raw) => normalize_level(&raw)?,
            None => notekeep_core::default_log_level(),
        };
        let log_target = LogTarget::from_dir_setting(get(env_vars::LOG_DIR).as_deref())?;

        let timeout_secs = match get(env_vars::AI_TIMEOUT_SECS) {
            Some(raw) => raw.parse::<u64>().ok().filter(|secs| *secs > 0).ok_or_else(|| {
                format!(
                    "{} must be a positive number of seconds, got `{raw}`",
                    env_vars::AI_TIMEOUT_SECS
                )
            })?,
            None => defaults::AI_TIMEOUT_SECS,
        };

        Ok(Self {
            bind_addr: get(env_vars::BIND_ADDR).unwrap_or_else(|| defaults::BIND_ADDR.to_string()),
            port,
            database_path: PathBuf::from(
                get(env_vars::DATABASE_PATH).unwrap_or_else(|| defaults::DATABASE_PATH.to_string()),
            ),
            log_level,
            log_target,
            ai: AiSettings {
                enabled: get(env_vars::AI_ENABLED).is_some_and(|raw| parse_flag(&raw)),
                api_key: get(env_vars::OPENAI_API_KEY),
                model: get(env_vars::AI_MODEL).unwrap_or_else(|| defaults::AI_MODEL.to_string()),
                endpoint: get(env_vars::AI_ENDPOINT)
                    .unwrap_or_else(|| defaults::AI_ENDPOINT.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
