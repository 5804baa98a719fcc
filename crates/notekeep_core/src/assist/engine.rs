//! Assist engine: optional model path with mandatory heuristic fallback.
//!
//! # Invariants
//! - The model path runs only when `AssistConfig::model_enabled` is set and a
//!   backend was injected at construction.
//! - Any model failure degrades to the heuristic result; callers never see
//!   a model error.
//! - Title generation is always heuristic.

use crate::assist::heuristics::{self, AnalysisResult, Enhancement};
use crate::assist::model::{
    parse_analysis_reply, parse_enhance_reply, ModelBackend, ModelError, ModelPrompt,
};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

/// Default deadline for one model request.
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(10);

/// Engine configuration fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssistConfig {
    pub model_enabled: bool,
    pub model_timeout: Duration,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            model_enabled: false,
            model_timeout: DEFAULT_MODEL_TIMEOUT,
        }
    }
}

/// Text analysis entry point shared by request handlers.
#[derive(Clone)]
pub struct AssistEngine {
    config: AssistConfig,
    backend: Option<Arc<dyn ModelBackend>>,
}

impl AssistEngine {
    /// Engine that only ever runs the heuristics.
    pub fn heuristic_only() -> Self {
        Self::new(AssistConfig::default(), None)
    }

    pub fn new(config: AssistConfig, backend: Option<Arc<dyn ModelBackend>>) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> AssistConfig {
        self.config
    }

    /// Whether requests will try the external model first.
    pub fn model_active(&self) -> bool {
        self.config.model_enabled && self.backend.is_some()
    }

    /// Suggests categories, summary and hints for a note.
    pub fn analyze(&self, content: &str, title: &str) -> AnalysisResult {
        self.ask_model(
            "analyze",
            ModelPrompt::analyze(content, title, self.config.model_timeout),
            parse_analysis_reply,
        )
        .unwrap_or_else(|| heuristics::suggest(content, title))
    }

    /// Rewrites note content.
    pub fn enhance(&self, content: &str) -> Enhancement {
        self.ask_model(
            "enhance",
            ModelPrompt::enhance(content, self.config.model_timeout),
            parse_enhance_reply,
        )
        .unwrap_or_else(|| heuristics::enhance(content))
    }

    /// Derives a title from note content.
    pub fn generate_title(&self, content: &str) -> String {
        heuristics::generate_title(content)
    }

    /// Runs one model round trip; `None` means "use the fallback".
    fn ask_model<T>(
        &self,
        operation: &str,
        prompt: ModelPrompt,
        decode: fn(&str) -> Result<T, ModelError>,
    ) -> Option<T> {
        let outcome = self
            .active_backend()
            .and_then(|backend| backend.complete(&prompt))
            .and_then(|reply| decode(&reply));

        match outcome {
            Ok(value) => {
                debug!("event=assist_model module=assist status=ok operation={operation}");
                Some(value)
            }
            Err(ModelError::Disabled) => None,
            Err(err) => {
                warn!(
                    "event=assist_model module=assist status=fallback operation={} backend={} error={}",
                    operation,
                    self.backend.as_ref().map_or("none", |backend| backend.name()),
                    err
                );
                None
            }
        }
    }

    fn active_backend(&self) -> Result<&dyn ModelBackend, ModelError> {
        if !self.config.model_enabled {
            return Err(ModelError::Disabled);
        }
        self.backend.as_deref().ok_or(ModelError::Disabled)
    }
}
