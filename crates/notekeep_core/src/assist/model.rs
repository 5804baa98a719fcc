//! External language-model seam.
//!
//! # Responsibility
//! - Define the backend contract the assist engine calls.
//! - Build prompts and decode model replies into typed results.
//!
//! # Invariants
//! - Every backend failure is a `ModelError` value; backends never panic on
//!   transport or decoding problems.
//! - Decoded analyses obey the same caps as the heuristic path.

use crate::assist::heuristics::{AnalysisResult, AnalysisSource, Enhancement};
use crate::model::note::Category;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

static JSON_OBJECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid json object regex"));

const ANALYZE_SYSTEM_PROMPT: &str = "You are a helpful AI assistant that analyzes notes and provides suggestions. \
Reply with a JSON object with the keys `suggested_categories` (array of work, personal, ideas, project, meeting), \
`summary` (string) and `enhancements` (array of short strings).";
const ENHANCE_SYSTEM_PROMPT: &str = "You are a writing assistant. Improve the given text while maintaining its original meaning and style.";
const ANALYZE_MAX_TOKENS: u32 = 500;
const ENHANCE_MAX_TOKENS: u32 = 300;

/// One chat-style completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPrompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    /// Hard deadline for the whole request.
    pub timeout: Duration,
}

impl ModelPrompt {
    pub fn analyze(content: &str, title: &str, timeout: Duration) -> Self {
        Self {
            system: ANALYZE_SYSTEM_PROMPT.to_string(),
            user: format!("Analyze this note and provide suggestions:\n\nTitle: {title}\nContent: {content}"),
            max_tokens: ANALYZE_MAX_TOKENS,
            timeout,
        }
    }

    pub fn enhance(content: &str, timeout: Duration) -> Self {
        Self {
            system: ENHANCE_SYSTEM_PROMPT.to_string(),
            user: format!("Improve this note content:\n\n{content}"),
            max_tokens: ENHANCE_MAX_TOKENS,
            timeout,
        }
    }
}

/// Failure of the external model path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Model path switched off or no backend configured.
    Disabled,
    Timeout,
    Transport(String),
    Status { code: u16, body: String },
    EmptyReply,
    MalformedReply(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "model path disabled"),
            Self::Timeout => write!(f, "model request timed out"),
            Self::Transport(message) => write!(f, "model transport error: {message}"),
            Self::Status { code, body } => write!(f, "model returned HTTP {code}: {body}"),
            Self::EmptyReply => write!(f, "model returned an empty reply"),
            Self::MalformedReply(message) => write!(f, "malformed model reply: {message}"),
        }
    }
}

impl Error for ModelError {}

/// Backend able to answer one completion request.
pub trait ModelBackend: Send + Sync {
    /// Short backend name for diagnostics.
    fn name(&self) -> &str;
    /// Returns the assistant's reply text.
    fn complete(&self, prompt: &ModelPrompt) -> Result<String, ModelError>;
}

#[derive(Debug, Deserialize)]
struct AnalysisReply {
    #[serde(default)]
    suggested_categories: Vec<String>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    enhancements: Vec<String>,
}

/// Decodes an analysis reply; tolerates prose or code fences around the JSON.
pub fn parse_analysis_reply(reply: &str) -> Result<AnalysisResult, ModelError> {
    let json = JSON_OBJECT_RE
        .find(reply)
        .ok_or_else(|| ModelError::MalformedReply("no JSON object in reply".to_string()))?;
    let parsed: AnalysisReply = serde_json::from_str(json.as_str())
        .map_err(|err| ModelError::MalformedReply(err.to_string()))?;

    let summary = parsed.summary.trim().to_string();
    if summary.is_empty() {
        return Err(ModelError::MalformedReply("missing summary".to_string()));
    }

    let mut suggested_categories = Vec::new();
    for label in &parsed.suggested_categories {
        if let Some(category) = Category::parse(label.trim().to_lowercase().as_str()) {
            if !suggested_categories.contains(&category) {
                suggested_categories.push(category);
            }
        }
    }
    suggested_categories.truncate(2);

    let mut enhancements = parsed
        .enhancements
        .into_iter()
        .map(|hint| hint.trim().to_string())
        .filter(|hint| !hint.is_empty())
        .collect::<Vec<_>>();
    enhancements.truncate(2);

    Ok(AnalysisResult {
        suggested_categories,
        summary,
        enhancements,
        source: AnalysisSource::Model,
    })
}

/// Decodes an enhancement reply: the trimmed reply is the new content.
pub fn parse_enhance_reply(reply: &str) -> Result<Enhancement, ModelError> {
    let enhanced_content = reply.trim();
    if enhanced_content.is_empty() {
        return Err(ModelError::EmptyReply);
    }
    Ok(Enhancement {
        enhanced_content: enhanced_content.to_string(),
        improvements: Vec::new(),
        source: AnalysisSource::Model,
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_analysis_reply, parse_enhance_reply, ModelError};
    use crate::assist::heuristics::AnalysisSource;
    use crate::model::note::Category;

    #[test]
    fn analysis_reply_inside_code_fence_is_decoded() {
        let reply = "Sure!\n```json\n{\"suggested_categories\": [\"Work\", \"space\", \"work\", \"meeting\", \"ideas\"], \
\"summary\": \" Ship it. \", \"enhancements\": [\"a\", \"\", \"b\", \"c\"]}\n```";
        let result = parse_analysis_reply(reply).unwrap();
        assert_eq!(
            result.suggested_categories,
            vec![Category::Work, Category::Meeting]
        );
        assert_eq!(result.summary, "Ship it.");
        assert_eq!(result.enhancements, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(result.source, AnalysisSource::Model);
    }

    #[test]
    fn analysis_reply_without_json_is_rejected() {
        let err = parse_analysis_reply("I cannot help with that").unwrap_err();
        assert!(matches!(err, ModelError::MalformedReply(_)));
    }

    #[test]
    fn enhance_reply_must_not_be_blank() {
        assert_eq!(parse_enhance_reply("  \n").unwrap_err(), ModelError::EmptyReply);
        assert_eq!(
            parse_enhance_reply(" Better text. ").unwrap().enhanced_content,
            "Better text."
        );
    }
}
