//! Deterministic note analysis.
//!
//! Keyword sets and hint lists are evaluated in a fixed priority order and
//! truncated to the first two entries; the order decides what is dropped.

use crate::model::note::Category;
use serde::{Deserialize, Serialize};

const MAX_SUGGESTED_CATEGORIES: usize = 2;
const MAX_ENHANCEMENTS: usize = 2;
const SUMMARY_SENTENCES: usize = 3;
const SHORT_CONTENT_CHARS: usize = 50;
const TITLE_MAX_CHARS: usize = 50;
const TITLE_MAX_WORDS: usize = 8;

const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Meeting, &["meeting", "agenda", "discuss", "team"]),
    (Category::Work, &["project", "deadline", "task", "goal"]),
    (Category::Ideas, &["idea", "thought", "brainstorm", "concept"]),
    (Category::Personal, &["personal", "life", "family", "hobby"]),
];
const FALLBACK_CATEGORY: Category = Category::Ideas;

const TASK_KEYWORDS: &[&str] = &["todo", "task", "need to"];

pub const HINT_EXPAND: &str = "Consider expanding this note with more details or examples.";
pub const HINT_QUESTIONS: &str =
    "This note contains questions - consider adding answers or action items.";
pub const HINT_TASK: &str =
    "This looks like a task - consider adding a deadline or priority level.";

pub const IMPROVEMENT_GRAMMAR: &str = "Grammar corrections applied";
pub const IMPROVEMENT_STRUCTURE: &str = "Sentence structure improved";

const WORD_FIXES: &[(&str, &str)] = &[
    (" i ", " I "),
    (" im ", " I'm "),
    (" cant ", " can't "),
    (" dont ", " don't "),
    (" wont ", " won't "),
];
const SENTENCE_ENDINGS: &[char] = &['.', '!', '?'];

pub const UNTITLED: &str = "Untitled Note";
pub const QUICK_NOTE: &str = "Quick Note";

/// Where an analysis result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    /// Produced by the external language model.
    Model,
    /// Produced by the deterministic fallback.
    Heuristic,
}

/// Category suggestions, summary and hints for one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub suggested_categories: Vec<Category>,
    pub summary: String,
    pub enhancements: Vec<String>,
    pub source: AnalysisSource,
}

impl AnalysisResult {
    /// True only when a real external model produced this result.
    pub fn ai_powered(&self) -> bool {
        self.source == AnalysisSource::Model
    }
}

/// Touched-up note content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enhancement {
    pub enhanced_content: String,
    pub improvements: Vec<String>,
    pub source: AnalysisSource,
}

impl Enhancement {
    pub fn ai_powered(&self) -> bool {
        self.source == AnalysisSource::Model
    }
}

/// Suggests categories, a summary and improvement hints for a note.
pub fn suggest(content: &str, title: &str) -> AnalysisResult {
    let content_lower = content.to_lowercase();

    AnalysisResult {
        suggested_categories: suggest_categories(&content_lower),
        summary: summarize(content, title),
        enhancements: enhancement_hints(content, &content_lower),
        source: AnalysisSource::Heuristic,
    }
}

/// Applies literal word fixes and closes the final sentence.
///
/// Fixes match the padded substrings (`" i "`, `" dont "`, ...) anywhere in
/// the text, including inside longer tokens. The content is padded with one
/// space on each side while matching so the first and last words take part.
pub fn enhance(content: &str) -> Enhancement {
    let mut enhanced = format!(" {content} ");
    for (from, to) in WORD_FIXES {
        enhanced = enhanced.replace(from, to);
    }
    // Every pattern and replacement is space-delimited, so the padding survives.
    let mut enhanced = enhanced[1..enhanced.len() - 1].to_string();

    let trimmed_end = enhanced.trim_end();
    if !trimmed_end.trim_start().is_empty() && !trimmed_end.ends_with(SENTENCE_ENDINGS) {
        enhanced = format!("{trimmed_end}.");
    }

    Enhancement {
        enhanced_content: enhanced,
        improvements: vec![
            IMPROVEMENT_GRAMMAR.to_string(),
            IMPROVEMENT_STRUCTURE.to_string(),
        ],
        source: AnalysisSource::Heuristic,
    }
}

/// Derives a short title from the first sentence of `content`.
pub fn generate_title(content: &str) -> String {
    if content.is_empty() {
        return UNTITLED.to_string();
    }

    let first_sentence = content.split('.').next().unwrap_or_default().trim();
    if first_sentence.chars().count() > TITLE_MAX_CHARS {
        let words = first_sentence
            .split_whitespace()
            .take(TITLE_MAX_WORDS)
            .collect::<Vec<_>>();
        return format!("{}...", words.join(" "));
    }

    if first_sentence.is_empty() {
        QUICK_NOTE.to_string()
    } else {
        first_sentence.to_string()
    }
}

fn suggest_categories(content_lower: &str) -> Vec<Category> {
    let mut categories = CATEGORY_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|word| content_lower.contains(word)))
        .map(|(category, _)| *category)
        .collect::<Vec<_>>();

    if categories.is_empty() {
        categories.push(FALLBACK_CATEGORY);
    }
    categories.truncate(MAX_SUGGESTED_CATEGORIES);
    categories
}

fn summarize(content: &str, title: &str) -> String {
    let mut summary = content
        .split('.')
        .take(SUMMARY_SENTENCES)
        .collect::<Vec<_>>()
        .join(". ")
        .trim()
        .to_string();

    if summary.is_empty() {
        let topic = if title.is_empty() {
            "various topics"
        } else {
            title
        };
        return format!("Brief note about {topic}");
    }

    if !summary.ends_with('.') {
        summary.push('.');
    }
    summary
}

fn enhancement_hints(content: &str, content_lower: &str) -> Vec<String> {
    let mut hints = Vec::new();
    if content.chars().count() < SHORT_CONTENT_CHARS {
        hints.push(HINT_EXPAND.to_string());
    }
    if content.contains('?') {
        hints.push(HINT_QUESTIONS.to_string());
    }
    if TASK_KEYWORDS.iter().any(|word| content_lower.contains(word)) {
        hints.push(HINT_TASK.to_string());
    }
    hints.truncate(MAX_ENHANCEMENTS);
    hints
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_matches_sets_in_priority_order() {
        let result = suggest("Let's discuss the project deadline tomorrow.", "");
        assert_eq!(
            result.suggested_categories,
            vec![Category::Meeting, Category::Work]
        );
        assert_eq!(result.summary, "Let's discuss the project deadline tomorrow.");
        assert_eq!(result.source, AnalysisSource::Heuristic);
        assert!(!result.ai_powered());
    }

    #[test]
    fn suggest_keeps_only_first_two_categories() {
        let result = suggest("Team brainstorm about family goal", "");
        assert_eq!(
            result.suggested_categories,
            vec![Category::Meeting, Category::Work]
        );
    }

    #[test]
    fn suggest_falls_back_to_ideas() {
        let result = suggest("ok", "");
        assert_eq!(result.suggested_categories, vec![Category::Ideas]);
        assert!(result.enhancements.iter().any(|hint| hint == HINT_EXPAND));
    }

    #[test]
    fn suggest_matching_is_case_insensitive() {
        let result = suggest("MEETING NOTES", "");
        assert_eq!(result.suggested_categories, vec![Category::Meeting]);
    }

    #[test]
    fn summary_takes_first_three_sentences() {
        let result = suggest("One. Two. Three. Four.", "");
        assert_eq!(result.summary, "One.  Two.  Three.");
    }

    #[test]
    fn summary_appends_missing_period() {
        assert_eq!(suggest("no period here", "").summary, "no period here.");
    }

    #[test]
    fn summary_falls_back_to_title_or_default() {
        assert_eq!(suggest("   ", "Plans").summary, "Brief note about Plans");
        assert_eq!(suggest("...", "Plans").summary, ". .");
        assert_eq!(suggest("  ", "").summary, "Brief note about various topics");
    }

    #[test]
    fn hints_follow_fixed_order_and_cap() {
        let result = suggest("todo: fix it?", "");
        assert_eq!(
            result.enhancements,
            vec![HINT_EXPAND.to_string(), HINT_QUESTIONS.to_string()]
        );

        let long_task = format!("{} need to ship the release", "x".repeat(60));
        let result = suggest(&long_task, "");
        assert_eq!(result.enhancements, vec![HINT_TASK.to_string()]);
    }

    #[test]
    fn enhance_fixes_words_and_closes_sentence() {
        let result = enhance("i dont know");
        assert_eq!(result.enhanced_content, "I don't know.");
        assert_eq!(
            result.improvements,
            vec![
                IMPROVEMENT_GRAMMAR.to_string(),
                IMPROVEMENT_STRUCTURE.to_string()
            ]
        );
    }

    #[test]
    fn enhance_keeps_existing_terminator() {
        assert_eq!(enhance("wait im here!").enhanced_content, "wait I'm here!");
        assert_eq!(enhance("why cant we?").enhanced_content, "why can't we?");
    }

    #[test]
    fn enhance_reports_hints_even_without_changes() {
        let result = enhance("Already fine.");
        assert_eq!(result.enhanced_content, "Already fine.");
        assert_eq!(result.improvements.len(), 2);
    }

    #[test]
    fn enhance_strips_trailing_whitespace_before_period() {
        assert_eq!(enhance("we wont go  ").enhanced_content, "we won't go.");
    }

    #[test]
    fn enhance_leaves_blank_content_alone() {
        assert_eq!(enhance("").enhanced_content, "");
        assert_eq!(enhance("   ").enhanced_content, "   ");
    }

    #[test]
    fn title_defaults() {
        assert_eq!(generate_title(""), UNTITLED);
        assert_eq!(generate_title(". rest"), QUICK_NOTE);
        assert_eq!(generate_title("Hello world"), "Hello world");
        assert_eq!(generate_title("  Plan trip. Book hotel."), "Plan trip");
    }

    #[test]
    fn long_title_is_cut_to_eight_words() {
        let content = "alpha beta gamma delta epsilon zeta eta theta iota kappa lam";
        assert_eq!(content.chars().count(), 60);
        assert_eq!(
            generate_title(content),
            "alpha beta gamma delta epsilon zeta eta theta..."
        );
    }
}
